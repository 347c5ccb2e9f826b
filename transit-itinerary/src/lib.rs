//! Itinerary reconstruction for multi-modal transit routing.
//!
//! Turns the flat transition sequence produced by a path search over a
//! road network and a time-expanded transit network into an itinerary:
//! walk legs and transit legs with geometry, stop times (scheduled and
//! realtime), turn-by-turn instructions and a fare.

pub mod builder;
pub mod domain;
pub mod realtime;
pub mod road;
