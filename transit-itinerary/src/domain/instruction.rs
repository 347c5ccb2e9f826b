//! Turn-by-turn instructions and path details.
//!
//! Road instructions come from an external generator; transit instructions
//! are synthesized while assembling the itinerary. Path details annotate
//! ranges of a point list with a value (street name, surface, ...).

use std::collections::BTreeMap;

use chrono::Duration;
use serde::Serialize;

use super::geometry::PointList;
use super::time::millis;

/// What an instruction asks the traveller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionSign {
    Continue,
    TurnSlightLeft,
    TurnLeft,
    TurnSharpLeft,
    TurnSlightRight,
    TurnRight,
    TurnSharpRight,
    UTurn,
    KeepLeft,
    KeepRight,
    UseRoundabout,
    LeaveRoundabout,
    ReachedVia,
    Finish,
    /// Board a transit vehicle
    PtStartTrip,
    /// Change vehicles without leaving the transit network
    PtTransfer,
    /// Alight from a transit vehicle
    PtEndTrip,
}

impl InstructionSign {
    /// Returns true for signs synthesized for transit legs.
    pub fn is_transit(&self) -> bool {
        matches!(
            self,
            InstructionSign::PtStartTrip | InstructionSign::PtTransfer | InstructionSign::PtEndTrip
        )
    }
}

/// A single instruction with the points it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub sign: InstructionSign,
    /// Street name, headsign or stop name
    pub name: String,
    /// Distance in metres
    pub distance: f64,
    #[serde(serialize_with = "millis::serialize")]
    pub time: Duration,
    pub points: PointList,
}

impl Instruction {
    /// Creates an instruction with zero distance and time.
    pub fn new(sign: InstructionSign, name: impl Into<String>, points: PointList) -> Self {
        Self {
            sign,
            name: name.into(),
            distance: 0.0,
            time: Duration::zero(),
            points,
        }
    }

    /// Sets the distance covered by this instruction.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the time taken by this instruction.
    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }
}

/// A value attached to an inclusive range of point indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDetail {
    pub value: serde_json::Value,
    /// Index of the first point of the range
    pub first: usize,
    /// Index of the last point of the range (inclusive)
    pub last: usize,
}

impl PathDetail {
    pub fn new(value: impl Into<serde_json::Value>, first: usize, last: usize) -> Self {
        Self {
            value: value.into(),
            first,
            last,
        }
    }

    /// Returns a copy of this detail with both indices moved by `offset`.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            value: self.value.clone(),
            first: self.first + offset,
            last: self.last + offset,
        }
    }
}

/// Path details keyed by detail name.
pub type PathDetails = BTreeMap<String, Vec<PathDetail>>;

/// Moves every range in `details` by `offset` points.
///
/// # Examples
///
/// ```
/// use transit_itinerary::domain::{PathDetail, PathDetails, shift_path_details};
///
/// let mut details = PathDetails::new();
/// details.insert("street_name".into(), vec![PathDetail::new("Unter den Linden", 0, 3)]);
///
/// let shifted = shift_path_details(&details, 10);
/// assert_eq!(shifted["street_name"][0].first, 10);
/// assert_eq!(shifted["street_name"][0].last, 13);
/// ```
pub fn shift_path_details(details: &PathDetails, offset: usize) -> PathDetails {
    details
        .iter()
        .map(|(key, ranges)| {
            let ranges = ranges.iter().map(|detail| detail.shifted(offset)).collect();
            (key.clone(), ranges)
        })
        .collect()
}

/// Merges `other` into `into`, appending ranges to keys already present.
pub fn merge_path_details(into: &mut PathDetails, other: PathDetails) {
    for (key, ranges) in other {
        into.entry(key).or_default().extend(ranges);
    }
}
