//! Timetable and realtime collaborators.
//!
//! The builder never reads GTFS files or realtime feeds itself. It asks
//! these traits for the few facts it needs about a boarded trip: the
//! scheduled stop times, an optional trip update, and the stop catalogue.

mod descriptor;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use geo_types::Point;

use crate::domain::{EdgeLabel, FeedId, Transition};

pub use descriptor::{ScheduleRelationship, TripDescriptor, decode_descriptor};

/// One scheduled (or updated) visit of a trip to a stop.
///
/// Times are seconds after midnight of the service day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_time: i32,
    pub departure_time: i32,
}

impl StopTime {
    pub fn new(
        stop_id: impl Into<String>,
        stop_sequence: u32,
        arrival_time: i32,
        departure_time: i32,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_sequence,
            arrival_time,
            departure_time,
        }
    }
}

/// A trip's stop times with realtime updates applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripUpdate {
    pub trip_id: String,
    /// Updated stop times, in stop sequence order
    pub stop_times: Vec<StopTime>,
    /// Stop sequences whose arrival is cancelled
    pub cancelled_arrivals: HashSet<u32>,
    /// Stop sequences whose departure is cancelled
    pub cancelled_departures: HashSet<u32>,
}

impl TripUpdate {
    /// Returns the updated stop time for a stop sequence.
    pub fn stop_time(&self, stop_sequence: u32) -> Option<&StopTime> {
        self.stop_times
            .iter()
            .find(|stop_time| stop_time.stop_sequence == stop_sequence)
    }

    pub fn is_arrival_cancelled(&self, stop_sequence: u32) -> bool {
        self.cancelled_arrivals.contains(&stop_sequence)
    }

    pub fn is_departure_cancelled(&self, stop_sequence: u32) -> bool {
        self.cancelled_departures.contains(&stop_sequence)
    }
}

/// A stop from a feed's stop catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub stop_id: String,
    pub name: String,
    /// (longitude, latitude)
    pub location: Point<f64>,
    pub zone_id: Option<String>,
}

/// Realtime overlay over the time-expanded transit graph.
pub trait RealtimeFeed {
    /// Returns the stop sequence a BOARD, HOP or DWELL edge belongs to.
    fn stop_sequence(&self, edge: &EdgeLabel) -> u32;

    /// Returns the scheduled stop time of the boarded trip at `stop_sequence`.
    fn stop_time(
        &self,
        feed: &FeedId,
        descriptor: &TripDescriptor,
        transition: &Transition,
        board_time: DateTime<Utc>,
        stop_sequence: u32,
    ) -> Option<StopTime>;

    /// Returns the current trip update for the boarded trip, if any.
    fn trip_update(
        &self,
        feed: &FeedId,
        descriptor: &TripDescriptor,
        transition: &Transition,
        board_time: DateTime<Utc>,
    ) -> Option<TripUpdate>;

    /// Returns the serialized trip descriptor stored for a boarding edge.
    fn trip_descriptor(&self, edge: &EdgeLabel) -> Vec<u8>;
}

/// Static timetable lookups.
pub trait TransitSchedule {
    fn stop(&self, feed: &FeedId, stop_id: &str) -> Option<StopInfo>;

    /// Returns how many stop times the timetable has for a trip once
    /// missing times are interpolated.
    fn interpolated_stop_time_count(&self, feed: &FeedId, trip_id: &str) -> Option<usize>;
}
