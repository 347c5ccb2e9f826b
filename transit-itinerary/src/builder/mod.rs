//! Itinerary reconstruction from search paths.
//!
//! A path is the ordered list of transitions a multimodal search produced.
//! Building an itinerary from it runs in three steps:
//!
//! 1. **Partitioning**: the path is split into walk and transit partitions
//!    at every ENTER_PT edge and after every EXIT_PT edge.
//! 2. **Leg building**: walk partitions become one walk leg each, transit
//!    partitions one transit leg per vehicle use, with stop times taken
//!    from the timetable and corrected by realtime trip updates.
//! 3. **Assembly**: access and egress walks are shifted to meet the
//!    transit legs, instructions and points are merged, and the fare is
//!    resolved.

mod assemble;
mod config;
mod legs;
mod partition;
mod stops;

#[cfg(test)]
mod test_support;

pub use assemble::ItineraryBuilder;
pub use config::ItineraryConfig;
pub use partition::{Partition, partition_path};
