//! Fare segments and the fare resolver seam.

use std::collections::BTreeSet;

use serde::Serialize;

use super::edge::FeedId;
use super::leg::{Leg, PtLeg};

/// One transit ride as seen by the fare rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareSegment {
    pub feed_id: FeedId,
    pub route_id: String,
    /// Seconds between the itinerary's first transit departure and this ride's departure
    pub elapsed_secs: i64,
    pub origin_zone: Option<String>,
    pub destination_zone: Option<String>,
    /// Every zone any stop of the ride lies in
    pub zones: BTreeSet<String>,
}

/// Prices a sequence of transit rides.
///
/// Implementations own the fare tables. Returning `None` means no fare
/// product covers the segments.
pub trait FareResolver {
    fn cheapest_fare(&self, segments: &[FareSegment]) -> Option<f64>;
}

impl<T: FareResolver + ?Sized> FareResolver for &T {
    fn cheapest_fare(&self, segments: &[FareSegment]) -> Option<f64> {
        (**self).cheapest_fare(segments)
    }
}

/// Builds one fare segment per transit leg, in leg order.
///
/// Walk legs contribute nothing. Returns an empty list when there is no
/// transit leg.
pub fn fare_segments(legs: &[Leg]) -> Vec<FareSegment> {
    let mut rides = legs.iter().filter_map(Leg::as_pt).peekable();
    let Some(origin) = rides.peek().map(|first| first.departure_time()) else {
        return Vec::new();
    };

    rides
        .map(|pt| segment(pt, (pt.departure_time() - origin).num_seconds()))
        .collect()
}

fn segment(pt: &PtLeg, elapsed_secs: i64) -> FareSegment {
    let zones = pt
        .stops()
        .iter()
        .filter_map(|stop| stop.zone_id.clone())
        .collect();

    FareSegment {
        feed_id: pt.trip.feed_id.clone(),
        route_id: pt.trip.route_id.clone(),
        elapsed_secs,
        origin_zone: pt.board_stop().zone_id.clone(),
        destination_zone: pt.alight_stop().zone_id.clone(),
        zones,
    }
}
