//! The finished itinerary.
//!
//! An `Itinerary` is built once by the assembler and never changes
//! afterwards. Totals are derived from the legs at construction.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::error::ItineraryError;
use super::geometry::PointList;
use super::instruction::{Instruction, PathDetails};
use super::leg::{Leg, PtLeg, WalkLeg};
use super::time::millis;

/// A complete door-to-door itinerary.
///
/// # Invariants
///
/// - At least one leg
/// - Every path-detail range indexes into `points`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    waypoints: PointList,
    legs: Vec<Leg>,
    instructions: Vec<Instruction>,
    points: PointList,
    details: PathDetails,
    distance: f64,
    #[serde(serialize_with = "millis::serialize")]
    time: Duration,
    transfers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fare: Option<f64>,
}

impl Itinerary {
    /// Constructs an itinerary from stitched legs and their concatenated rendering.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty.
    pub fn new(
        waypoints: PointList,
        legs: Vec<Leg>,
        instructions: Vec<Instruction>,
        points: PointList,
        details: PathDetails,
    ) -> Result<Self, ItineraryError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(ItineraryError::EmptyItinerary);
        };

        let time = last.arrival_time() - first.departure_time();
        let distance = legs.iter().map(Leg::distance).sum();
        let vehicles = legs
            .iter()
            .filter_map(Leg::as_pt)
            .filter(|pt| !pt.is_in_same_vehicle_as_previous)
            .count();

        Ok(Itinerary {
            waypoints,
            legs,
            instructions,
            points,
            details,
            distance,
            time,
            transfers: vehicles.saturating_sub(1),
            fare: None,
        })
    }

    /// Sets the fare amount.
    pub fn with_fare(mut self, fare: Option<f64>) -> Self {
        self.fare = fare;
        self
    }

    /// Returns the requested waypoints, as passed in.
    pub fn waypoints(&self) -> &PointList {
        &self.waypoints
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the number of legs, walks included.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns all transit legs in order.
    pub fn pt_legs(&self) -> impl Iterator<Item = &PtLeg> {
        self.legs.iter().filter_map(Leg::as_pt)
    }

    /// Returns all walk legs in order.
    pub fn walk_legs(&self) -> impl Iterator<Item = &WalkLeg> {
        self.legs.iter().filter_map(Leg::as_walk)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn points(&self) -> &PointList {
        &self.points
    }

    /// Returns path details indexed into `points()`.
    pub fn details(&self) -> &PathDetails {
        &self.details
    }

    /// Returns the total distance in metres.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the time from first departure to last arrival.
    pub fn total_duration(&self) -> Duration {
        self.time
    }

    /// Returns the number of vehicle changes (0 for direct or walk-only).
    pub fn change_count(&self) -> usize {
        self.transfers
    }

    /// Returns the fare, if one was resolved.
    pub fn fare(&self) -> Option<f64> {
        self.fare
    }

    /// Returns the departure time of the first leg.
    pub fn departure_time(&self) -> DateTime<Utc> {
        // Safe: validated non-empty at construction
        self.legs[0].departure_time()
    }

    /// Returns the arrival time of the last leg.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.legs[self.legs.len() - 1].arrival_time()
    }

    /// Returns true if the itinerary uses no transit vehicle.
    pub fn is_walk_only(&self) -> bool {
        self.legs.iter().all(Leg::is_walk)
    }
}
