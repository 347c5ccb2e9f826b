//! GTFS-realtime trip descriptor.
//!
//! The realtime feed stores one serialized descriptor per boarding edge.
//! Field numbers follow `gtfs-realtime.proto`.

use prost::Message;

use crate::domain::{EdgeId, ItineraryError};

/// Identifies the trip a vehicle is running.
#[derive(Clone, PartialEq, Message)]
pub struct TripDescriptor {
    #[prost(string, optional, tag = "1")]
    pub trip_id: Option<String>,
    /// Initially scheduled start time, "HH:MM:SS"
    #[prost(string, optional, tag = "2")]
    pub start_time: Option<String>,
    /// Service date, "YYYYMMDD"
    #[prost(string, optional, tag = "3")]
    pub start_date: Option<String>,
    #[prost(enumeration = "ScheduleRelationship", optional, tag = "4")]
    pub schedule_relationship: Option<i32>,
    #[prost(string, optional, tag = "5")]
    pub route_id: Option<String>,
    #[prost(uint32, optional, tag = "6")]
    pub direction_id: Option<u32>,
}

/// How a trip relates to the static timetable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ScheduleRelationship {
    Scheduled = 0,
    Added = 1,
    Unscheduled = 2,
    Canceled = 3,
    Replacement = 5,
    Duplicated = 6,
    Deleted = 7,
}

impl TripDescriptor {
    /// Creates a scheduled descriptor for a trip on a route.
    pub fn scheduled(trip_id: impl Into<String>, route_id: impl Into<String>) -> Self {
        Self {
            trip_id: Some(trip_id.into()),
            route_id: Some(route_id.into()),
            schedule_relationship: Some(ScheduleRelationship::Scheduled as i32),
            ..Default::default()
        }
    }
}

/// Decodes the descriptor attached to a boarding edge.
pub fn decode_descriptor(edge: EdgeId, bytes: &[u8]) -> Result<TripDescriptor, ItineraryError> {
    TripDescriptor::decode(bytes)
        .map_err(|source| ItineraryError::MalformedTripDescriptor { edge, source })
}
