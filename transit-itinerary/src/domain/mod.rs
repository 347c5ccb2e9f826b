//! Domain types for itinerary reconstruction.
//!
//! This module contains the value types that flow through the builder:
//! search transitions, stops, legs, instructions and the finished
//! itinerary. Types that carry invariants enforce them at construction
//! time, so code that receives them can trust their validity.

mod edge;
mod error;
mod fare;
pub mod geometry;
mod instruction;
mod itinerary;
mod leg;
mod stop;
pub mod time;

pub use edge::{EdgeId, EdgeLabel, EdgeType, FeedId, GraphEdge, Label, NodeId, Transition};
pub use error::{ErrorKind, ItineraryError};
pub use fare::{FareResolver, FareSegment, fare_segments};
pub use geometry::{LegGeometry, PointList, Position};
pub use instruction::{
    Instruction, InstructionSign, PathDetail, PathDetails, merge_path_details, shift_path_details,
};
pub use itinerary::Itinerary;
pub use leg::{Leg, PtLeg, TripRef, WalkLeg};
pub use stop::Stop;
pub use time::TimeError;
