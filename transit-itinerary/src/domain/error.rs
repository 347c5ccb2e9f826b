//! Itinerary error types.
//!
//! Every failure aborts the build of one itinerary. `ErrorKind` separates
//! paths that break the transition grammar, which a correct search never
//! produces, from timetable or realtime data that disagrees with the path.

use super::edge::{EdgeId, EdgeType, FeedId};
use super::time::TimeError;

/// Broad classification of an `ItineraryError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transition sequence violates the path grammar
    Grammar,
    /// Timetable or realtime data is inconsistent with the path
    Data,
}

/// Errors raised while turning a path into an itinerary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ItineraryError {
    /// No transitions at all
    #[error("path contains no transitions")]
    EmptyPath,

    /// The path never traverses an edge, so it has no legs
    #[error("path does not traverse any edge")]
    EmptyItinerary,

    /// An edge type appeared where the grammar forbids it
    #[error("unexpected {found} edge: {context}")]
    UnexpectedEdge {
        found: EdgeType,
        context: &'static str,
    },

    /// A transition after the start of a partition has no edge
    #[error("transition {index} of a partition has no edge")]
    MissingEdge { index: usize },

    /// A transit partition was entered without a feed id
    #[error("transit partition entered without a feed id")]
    MissingFeedId,

    /// The stop sequence state machine received an event in the wrong state
    #[error("{event} is not valid while {state}")]
    InvalidStopSequenceState {
        event: &'static str,
        state: &'static str,
    },

    /// A transit leg could not be formed from the stops
    #[error("invalid transit leg: {0}")]
    InvalidLeg(&'static str),

    /// The serialized trip descriptor could not be decoded
    #[error("malformed trip descriptor on edge {edge}")]
    MalformedTripDescriptor {
        edge: EdgeId,
        #[source]
        source: prost::DecodeError,
    },

    /// The timetable has no stop time for a visited stop sequence
    #[error("no scheduled stop time for stop sequence {stop_sequence} of trip {trip_id}")]
    StopTimeNotFound { trip_id: String, stop_sequence: u32 },

    /// A trip update lacks a stop sequence the vehicle visits
    #[error("trip update for {trip_id} has no stop sequence {stop_sequence}")]
    TripUpdateStopNotFound { trip_id: String, stop_sequence: u32 },

    /// A stop id is missing from the feed's stop catalogue
    #[error("unknown stop {stop_id} in feed {feed}")]
    UnknownStop { feed: FeedId, stop_id: String },

    /// A label time or delayed time cannot be represented
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl ItineraryError {
    /// Classifies this error as a grammar or data problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItineraryError::EmptyPath
            | ItineraryError::EmptyItinerary
            | ItineraryError::UnexpectedEdge { .. }
            | ItineraryError::MissingEdge { .. }
            | ItineraryError::MissingFeedId
            | ItineraryError::InvalidStopSequenceState { .. }
            | ItineraryError::InvalidLeg(_) => ErrorKind::Grammar,
            ItineraryError::MalformedTripDescriptor { .. }
            | ItineraryError::StopTimeNotFound { .. }
            | ItineraryError::TripUpdateStopNotFound { .. }
            | ItineraryError::UnknownStop { .. }
            | ItineraryError::Time(_) => ErrorKind::Data,
        }
    }
}
