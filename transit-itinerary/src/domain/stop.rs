//! Stop visit types for transit legs.
//!
//! A `Stop` represents one visit of a vehicle to a stop, with planned
//! times taken from the path and predicted times from the realtime
//! overlay.

use chrono::{DateTime, Duration, Utc};
use geo_types::Point;
use serde::Serialize;

/// A stop visited by a transit leg.
///
/// # Time Semantics
///
/// - The first stop of a leg has no arrival
/// - The last stop of a leg has no departure
/// - Intermediate stops have both
/// - Predicted times override planned times when available
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    /// Position of this visit in the trip's calling pattern
    pub stop_sequence: u32,
    /// Stop location as (longitude, latitude)
    pub location: Point<f64>,
    /// Fare zone, if the timetable assigns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub planned_arrival: Option<DateTime<Utc>>,
    pub predicted_arrival: Option<DateTime<Utc>>,
    pub arrival_cancelled: bool,
    pub planned_departure: Option<DateTime<Utc>>,
    pub predicted_departure: Option<DateTime<Utc>>,
    pub departure_cancelled: bool,
}

impl Stop {
    /// Creates a stop visit without any times.
    pub fn new(
        stop_id: impl Into<String>,
        stop_name: impl Into<String>,
        stop_sequence: u32,
        location: Point<f64>,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_name: stop_name.into(),
            stop_sequence,
            location,
            zone_id: None,
            planned_arrival: None,
            predicted_arrival: None,
            arrival_cancelled: false,
            planned_departure: None,
            predicted_departure: None,
            departure_cancelled: false,
        }
    }

    /// Returns the best available arrival time (predicted if available, else planned).
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_itinerary::domain::Stop;
    /// use transit_itinerary::domain::time::from_epoch_millis;
    /// use geo_types::Point;
    ///
    /// let mut stop = Stop::new("S2", "Alexanderplatz", 2, Point::new(13.41, 52.52));
    /// stop.planned_arrival = Some(from_epoch_millis(1_000_100).unwrap());
    ///
    /// // Without a prediction, returns planned
    /// assert_eq!(stop.arrival().unwrap().timestamp_millis(), 1_000_100);
    ///
    /// // With a prediction, returns predicted
    /// stop.predicted_arrival = Some(from_epoch_millis(1_060_100).unwrap());
    /// assert_eq!(stop.arrival().unwrap().timestamp_millis(), 1_060_100);
    /// ```
    pub fn arrival(&self) -> Option<DateTime<Utc>> {
        self.predicted_arrival.or(self.planned_arrival)
    }

    /// Returns the best available departure time (predicted if available, else planned).
    pub fn departure(&self) -> Option<DateTime<Utc>> {
        self.predicted_departure.or(self.planned_departure)
    }

    /// Returns the arrival delay, if the prediction is later than planned.
    pub fn arrival_delay(&self) -> Option<Duration> {
        match (self.predicted_arrival, self.planned_arrival) {
            (Some(predicted), Some(planned)) if predicted > planned => Some(predicted - planned),
            _ => None,
        }
    }

    /// Returns the departure delay, if the prediction is later than planned.
    pub fn departure_delay(&self) -> Option<Duration> {
        match (self.predicted_departure, self.planned_departure) {
            (Some(predicted), Some(planned)) if predicted > planned => Some(predicted - planned),
            _ => None,
        }
    }

    /// Returns true if either the arrival or the departure is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.arrival_cancelled || self.departure_cancelled
    }
}
