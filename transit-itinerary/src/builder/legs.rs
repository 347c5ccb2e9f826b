//! Turning partitions into legs.
//!
//! A partition whose first edge is ENTER_PT is a stay in the transit
//! network and yields one transit leg per vehicle use. Any other partition
//! is a single walk over HIGHWAY edges.

use chrono::Duration;
use tracing::{debug, warn};

use super::config::ItineraryConfig;
use super::stops::{TripContext, stops_from_vehicle_use};
use crate::domain::geometry::line_string;
use crate::domain::time::TimeError;
use crate::domain::{
    EdgeLabel, EdgeType, FeedId, ItineraryError, Leg, PtLeg, Transition, TripRef, WalkLeg,
};
use crate::realtime::{RealtimeFeed, TransitSchedule, decode_descriptor};
use crate::road::{InstructionGenerator, RoadNetwork, RoadPath};

/// Builds the legs of single partitions.
pub(crate) struct LegBuilder<'a, S: ?Sized, R: ?Sized, N: ?Sized> {
    pub schedule: &'a S,
    pub realtime: &'a R,
    pub road: &'a N,
    pub config: &'a ItineraryConfig,
    /// Path detail keys requested for walk legs
    pub path_details: &'a [String],
}

impl<S, R, N> LegBuilder<'_, S, R, N>
where
    S: TransitSchedule + ?Sized,
    R: RealtimeFeed + ?Sized,
    N: RoadNetwork + ?Sized,
{
    /// Returns the legs a partition represents, none if it traverses no edge.
    pub fn legs(&self, partition: &[Transition]) -> Result<Vec<Leg>, ItineraryError> {
        match partition.get(1).map(Transition::edge_type) {
            None => Ok(Vec::new()),
            Some(Some(EdgeType::EnterPt)) => self.transit_legs(partition),
            Some(_) => Ok(vec![Leg::Walk(self.walk_leg(partition)?)]),
        }
    }

    /// Splits a transit partition into vehicle uses.
    ///
    /// A vehicle use runs from a BOARD edge up to and including the next
    /// TRANSFER or LEAVE_TIME_EXPANDED_NETWORK edge.
    fn transit_legs(&self, partition: &[Transition]) -> Result<Vec<Leg>, ItineraryError> {
        let mut feed = partition
            .get(1)
            .and_then(|enter| enter.edge.as_ref())
            .and_then(|edge| edge.feed_id.clone())
            .ok_or(ItineraryError::MissingFeedId)?;
        let mut board: Option<usize> = None;
        let mut legs = Vec::new();

        for (index, transition) in partition.iter().enumerate().skip(1) {
            let edge = transition
                .edge
                .as_ref()
                .ok_or(ItineraryError::MissingEdge { index })?;

            if edge.edge_type == EdgeType::Board {
                board = Some(index);
            }
            if edge.edge_type.ends_vehicle_use() {
                let start = board.take().ok_or(ItineraryError::UnexpectedEdge {
                    found: edge.edge_type,
                    context: "a vehicle use must start with a BOARD edge",
                })?;
                // The label before the boundary is the arrival at the last stop
                let arrived = partition[index - 1].label.current_time;
                let leg = self.pt_leg(&feed, &partition[start..=index], arrived)?;
                legs.push(Leg::Pt(leg));

                if let Some(next) = &edge.feed_id {
                    feed = next.clone();
                }
            }
        }

        if let Some(start) = board {
            warn!(
                board_edge = ?partition[start].edge.as_ref().map(EdgeLabel::edge_id),
                transitions = partition.len() - start,
                "Discarding vehicle use that never leaves the vehicle"
            );
        }

        Ok(legs)
    }

    /// Builds one transit leg from a vehicle use starting at its BOARD edge.
    fn pt_leg(
        &self,
        feed: &FeedId,
        ride: &[Transition],
        arrived: i64,
    ) -> Result<PtLeg, ItineraryError> {
        let board = ride.first().ok_or(ItineraryError::MissingEdge { index: 0 })?;
        let board_edge = board
            .edge
            .as_ref()
            .ok_or(ItineraryError::MissingEdge { index: 0 })?;

        let bytes = self.realtime.trip_descriptor(board_edge);
        let descriptor = decode_descriptor(board_edge.edge_id(), &bytes)?;
        let ctx = TripContext {
            realtime: self.realtime,
            schedule: self.schedule,
            feed,
            descriptor: &descriptor,
            check_trip_updates: self.config.check_trip_updates,
        };
        let stops = stops_from_vehicle_use(&ctx, ride)?;

        let distance = ride
            .iter()
            .filter_map(|transition| transition.edge.as_ref())
            .map(|edge| edge.distance)
            .sum();
        let elapsed = arrived
            .checked_sub(board.label.current_time)
            .ok_or(TimeError::OutOfRange(arrived))?;
        let travel_time =
            Duration::try_milliseconds(elapsed).ok_or(TimeError::OutOfRange(elapsed))?;

        let trip = TripRef {
            feed_id: feed.clone(),
            trip_id: descriptor.trip_id().to_string(),
            route_id: descriptor.route_id().to_string(),
            headsign: board_edge.edge.name.clone(),
        };
        debug!(
            feed = %feed,
            trip_id = %trip.trip_id,
            stops = stops.len(),
            travel_ms = elapsed,
            "Built transit leg"
        );

        PtLeg::new(
            trip,
            board_edge.transfers == 0,
            stops,
            distance,
            travel_time,
            line_string(ride),
        )
    }

    /// Builds the walk leg of a partition made of HIGHWAY edges.
    fn walk_leg(&self, partition: &[Transition]) -> Result<WalkLeg, ItineraryError> {
        let (Some(first), Some(last)) = (partition.first(), partition.last()) else {
            return Err(ItineraryError::EmptyPath);
        };

        let mut instructions = self.road.instructions();
        let mut road_path = RoadPath::new(first.label.adj_node, last.label.adj_node);
        let mut prev_edge = None;
        let mut distance = 0.0;

        for (index, transition) in partition.iter().enumerate().skip(1) {
            let edge = transition
                .edge
                .as_ref()
                .ok_or(ItineraryError::MissingEdge { index })?;
            if edge.edge_type != EdgeType::Highway {
                return Err(ItineraryError::UnexpectedEdge {
                    found: edge.edge_type,
                    context: "a walk contains only HIGHWAY edges",
                });
            }

            instructions.next(edge, index, prev_edge);
            road_path.push(edge.edge_id());
            prev_edge = Some(edge.edge_id());
            distance += edge.distance;
        }

        let instructions = instructions.finish();
        let details = self.road.path_details(&road_path, self.path_details);

        Ok(WalkLeg {
            departure_location: self.config.walk_label().to_string(),
            departure_time: first.label.time()?,
            arrival_time: last.label.time()?,
            geometry: line_string(partition),
            distance,
            instructions,
            details,
        })
    }
}
