//! Itinerary leg types.
//!
//! A `Leg` is either a walk over the road network or one ride on a
//! transit vehicle. Transit legs validate their stops at construction, so
//! `departure_time()` and `arrival_time()` never fail.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::edge::FeedId;
use super::error::ItineraryError;
use super::geometry::LegGeometry;
use super::instruction::{Instruction, PathDetails};
use super::stop::Stop;
use super::time::{TimeError, millis};

/// A walk over the road network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkLeg {
    /// Display label of the walk's origin
    pub departure_location: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub geometry: LegGeometry,
    /// Distance in metres
    pub distance: f64,
    pub instructions: Vec<Instruction>,
    /// Index ranges into this leg's own instruction points
    pub details: PathDetails,
}

impl WalkLeg {
    /// Returns how long the walk takes.
    pub fn duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }

    /// Returns the number of points covered by this leg's instructions.
    pub fn point_count(&self) -> usize {
        self.instructions.iter().map(|i| i.points.len()).sum()
    }

    /// Moves the walk so it ends at `arrival`, keeping its duration.
    ///
    /// The leg is left untouched if the new departure is not representable.
    pub fn arrive_at(&mut self, arrival: DateTime<Utc>) -> Result<(), TimeError> {
        let duration = self.duration();
        let departure = arrival
            .checked_sub_signed(duration)
            .ok_or(TimeError::ShiftOverflow {
                base: arrival,
                shift_ms: -duration.num_milliseconds(),
            })?;
        self.departure_time = departure;
        self.arrival_time = arrival;
        Ok(())
    }

    /// Moves the walk so it starts at `departure`, keeping its duration.
    ///
    /// The leg is left untouched if the new arrival is not representable.
    pub fn depart_at(&mut self, departure: DateTime<Utc>) -> Result<(), TimeError> {
        let duration = self.duration();
        let arrival = departure
            .checked_add_signed(duration)
            .ok_or(TimeError::ShiftOverflow {
                base: departure,
                shift_ms: duration.num_milliseconds(),
            })?;
        self.arrival_time = arrival;
        self.departure_time = departure;
        Ok(())
    }
}

/// The scheduled trip a transit leg rides on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRef {
    pub feed_id: FeedId,
    pub trip_id: String,
    pub route_id: String,
    pub headsign: String,
}

/// One ride on a transit vehicle, from boarding to alighting.
///
/// # Invariants
///
/// - At least two stops
/// - The first stop has a departure time
/// - The last stop has an arrival time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtLeg {
    #[serde(flatten)]
    pub trip: TripRef,
    /// True when the rider stays in the vehicle of the previous leg
    pub is_in_same_vehicle_as_previous: bool,
    /// Distance in metres
    pub distance: f64,
    #[serde(serialize_with = "millis::serialize")]
    pub travel_time: Duration,
    pub geometry: LegGeometry,
    stops: Vec<Stop>,
    // Cached validated times (guaranteed present - validated at construction)
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
}

impl PtLeg {
    /// Constructs a transit leg, validating that boarding and alighting times exist.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are fewer than two stops, or the first stop
    /// has no departure, or the last stop has no arrival.
    pub fn new(
        trip: TripRef,
        is_in_same_vehicle_as_previous: bool,
        stops: Vec<Stop>,
        distance: f64,
        travel_time: Duration,
        geometry: LegGeometry,
    ) -> Result<Self, ItineraryError> {
        if stops.len() < 2 {
            return Err(ItineraryError::InvalidLeg(
                "a transit leg needs at least two stops",
            ));
        }

        let departure_time = stops
            .first()
            .and_then(Stop::departure)
            .ok_or(ItineraryError::InvalidLeg("first stop has no departure"))?;
        let arrival_time = stops
            .last()
            .and_then(Stop::arrival)
            .ok_or(ItineraryError::InvalidLeg("last stop has no arrival"))?;

        Ok(PtLeg {
            trip,
            is_in_same_vehicle_as_previous,
            distance,
            travel_time,
            geometry,
            stops,
            departure_time,
            arrival_time,
        })
    }

    /// Returns the stops of this leg, boarding stop first.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Returns the boarding stop.
    pub fn board_stop(&self) -> &Stop {
        // Safe: at least two stops validated at construction
        &self.stops[0]
    }

    /// Returns the alighting stop.
    pub fn alight_stop(&self) -> &Stop {
        &self.stops[self.stops.len() - 1]
    }

    /// Returns the departure time at the boarding stop (guaranteed present).
    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    /// Returns the arrival time at the alighting stop (guaranteed present).
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.arrival_time
    }

    /// Returns the number of intermediate stops (excluding board and alight).
    pub fn intermediate_stop_count(&self) -> usize {
        self.stops.len() - 2
    }

    /// Returns true if boarding or alighting has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.board_stop().departure_cancelled || self.alight_stop().arrival_cancelled
    }
}

/// A leg of an itinerary: either a walk or a transit ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Leg {
    Walk(WalkLeg),
    Pt(PtLeg),
}

impl Leg {
    /// Returns the departure time of this leg.
    pub fn departure_time(&self) -> DateTime<Utc> {
        match self {
            Leg::Walk(walk) => walk.departure_time,
            Leg::Pt(pt) => pt.departure_time(),
        }
    }

    /// Returns the arrival time of this leg.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        match self {
            Leg::Walk(walk) => walk.arrival_time,
            Leg::Pt(pt) => pt.arrival_time(),
        }
    }

    /// Returns the distance of this leg in metres.
    pub fn distance(&self) -> f64 {
        match self {
            Leg::Walk(walk) => walk.distance,
            Leg::Pt(pt) => pt.distance,
        }
    }

    /// Returns the duration of this leg.
    pub fn duration(&self) -> Duration {
        self.arrival_time() - self.departure_time()
    }

    /// Returns the geometry of this leg.
    pub fn geometry(&self) -> &LegGeometry {
        match self {
            Leg::Walk(walk) => &walk.geometry,
            Leg::Pt(pt) => &pt.geometry,
        }
    }

    /// Returns true if this is a walk leg.
    pub fn is_walk(&self) -> bool {
        matches!(self, Leg::Walk(_))
    }

    /// Returns true if this is a transit leg.
    pub fn is_pt(&self) -> bool {
        matches!(self, Leg::Pt(_))
    }

    /// Returns the walk if this is a walk leg.
    pub fn as_walk(&self) -> Option<&WalkLeg> {
        match self {
            Leg::Walk(walk) => Some(walk),
            Leg::Pt(_) => None,
        }
    }

    /// Returns the transit leg if this is one.
    pub fn as_pt(&self) -> Option<&PtLeg> {
        match self {
            Leg::Walk(_) => None,
            Leg::Pt(pt) => Some(pt),
        }
    }
}
