//! Assembling legs into an itinerary.
//!
//! After the partitions are turned into legs, the access and egress walks
//! are moved in time so they meet the transit legs exactly, and the legs are
//! rendered into one instruction list, one point list and one path-detail
//! map for the whole itinerary.

use tracing::debug;

use super::config::ItineraryConfig;
use super::legs::LegBuilder;
use super::partition::partition_path;
use crate::domain::{
    FareResolver, Instruction, InstructionSign, Itinerary, ItineraryError, Leg, PathDetails,
    PointList, Position, PtLeg, Transition, WalkLeg, fare_segments, merge_path_details,
    shift_path_details,
};
use crate::realtime::{RealtimeFeed, TransitSchedule};
use crate::road::RoadNetwork;

/// Builds itineraries from search paths.
///
/// The builder only borrows its collaborators, so one builder can serve
/// many paths, from several threads when the collaborators are `Sync`.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// #
/// # use chrono::{DateTime, Utc};
/// # use transit_itinerary::builder::{ItineraryBuilder, ItineraryConfig};
/// # use transit_itinerary::domain::{
/// #     EdgeId, EdgeLabel, EdgeType, FareResolver, FareSegment, FeedId, GraphEdge, Instruction,
/// #     InstructionSign, ItineraryError, Label, NodeId, PathDetails, PointList, Transition,
/// # };
/// # use transit_itinerary::realtime::{
/// #     RealtimeFeed, StopInfo, StopTime, TransitSchedule, TripDescriptor, TripUpdate,
/// # };
/// # use transit_itinerary::road::{InstructionGenerator, RoadNetwork, RoadPath};
/// #
/// # struct NoTransit;
/// #
/// # impl TransitSchedule for NoTransit {
/// #     fn stop(&self, _: &FeedId, _: &str) -> Option<StopInfo> {
/// #         None
/// #     }
/// #
/// #     fn interpolated_stop_time_count(&self, _: &FeedId, _: &str) -> Option<usize> {
/// #         None
/// #     }
/// # }
/// #
/// # impl RealtimeFeed for NoTransit {
/// #     fn stop_sequence(&self, _: &EdgeLabel) -> u32 {
/// #         0
/// #     }
/// #
/// #     fn stop_time(
/// #         &self,
/// #         _: &FeedId,
/// #         _: &TripDescriptor,
/// #         _: &Transition,
/// #         _: DateTime<Utc>,
/// #         _: u32,
/// #     ) -> Option<StopTime> {
/// #         None
/// #     }
/// #
/// #     fn trip_update(
/// #         &self,
/// #         _: &FeedId,
/// #         _: &TripDescriptor,
/// #         _: &Transition,
/// #         _: DateTime<Utc>,
/// #     ) -> Option<TripUpdate> {
/// #         None
/// #     }
/// #
/// #     fn trip_descriptor(&self, _: &EdgeLabel) -> Vec<u8> {
/// #         Vec::new()
/// #     }
/// # }
/// #
/// # impl FareResolver for NoTransit {
/// #     fn cheapest_fare(&self, _: &[FareSegment]) -> Option<f64> {
/// #         None
/// #     }
/// # }
/// #
/// # struct Streets(Vec<Instruction>);
/// #
/// # impl InstructionGenerator for Streets {
/// #     fn next(&mut self, edge: &EdgeLabel, _: usize, _: Option<EdgeId>) {
/// #         let name = edge.edge.name.clone();
/// #         let points = edge.edge.geometry.clone();
/// #         self.0.push(Instruction::new(InstructionSign::Continue, name, points));
/// #     }
/// #
/// #     fn finish(self) -> Vec<Instruction> {
/// #         self.0
/// #     }
/// # }
/// #
/// # struct Roads;
/// #
/// # impl RoadNetwork for Roads {
/// #     type Instructions = Streets;
/// #
/// #     fn instructions(&self) -> Streets {
/// #         Streets(Vec::new())
/// #     }
/// #
/// #     fn path_details(&self, _: &RoadPath, _: &[String]) -> PathDetails {
/// #         PathDetails::new()
/// #     }
/// # }
/// #
/// # fn street(id: u32, time: i64, distance: f64) -> Transition {
/// #     let mut geometry = PointList::new();
/// #     geometry.push(52.52, 13.40 + f64::from(id - 1) * 0.001);
/// #     geometry.push(52.52, 13.40 + f64::from(id) * 0.001);
/// #     let edge = EdgeLabel {
/// #         edge_type: EdgeType::Highway,
/// #         feed_id: None,
/// #         distance,
/// #         transfers: 0,
/// #         edge: Arc::new(GraphEdge::new(EdgeId(id), format!("Street {id}"), geometry)),
/// #     };
/// #     Transition::new(Label::new(time, NodeId(id)), edge)
/// # }
/// #
/// // A walk over two streets, 200 m in 150 s
/// let path = vec![
///     Transition::start(Label::new(0, NodeId(0))),
///     street(1, 60_000, 80.0),
///     street(2, 150_000, 120.0),
/// ];
///
/// let config = ItineraryConfig::default();
/// let builder = ItineraryBuilder::new(&NoTransit, &NoTransit, &NoTransit, config);
/// let itinerary = builder.build(PointList::new(), &Roads, &path, &[])?;
///
/// assert_eq!(itinerary.leg_count(), 1);
/// assert!(itinerary.is_walk_only());
/// assert_eq!(itinerary.distance(), 200.0);
/// assert_eq!(itinerary.total_duration().num_seconds(), 150);
/// assert_eq!(itinerary.change_count(), 0);
/// # Ok::<(), ItineraryError>(())
/// ```
pub struct ItineraryBuilder<'a, S: ?Sized, R: ?Sized, F: ?Sized> {
    schedule: &'a S,
    realtime: &'a R,
    fares: &'a F,
    config: ItineraryConfig,
}

impl<'a, S, R, F> ItineraryBuilder<'a, S, R, F>
where
    S: TransitSchedule + ?Sized,
    R: RealtimeFeed + ?Sized,
    F: FareResolver + ?Sized,
{
    pub fn new(schedule: &'a S, realtime: &'a R, fares: &'a F, config: ItineraryConfig) -> Self {
        Self {
            schedule,
            realtime,
            fares,
            config,
        }
    }

    pub fn config(&self) -> &ItineraryConfig {
        &self.config
    }

    /// Turns one search path into an itinerary.
    ///
    /// `waypoints` are passed through untouched. `path_details` names the
    /// details to compute for walk legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the path breaks the transition grammar or the
    /// timetable and realtime data disagree with it.
    pub fn build<N>(
        &self,
        waypoints: PointList,
        road: &N,
        path: &[Transition],
        path_details: &[String],
    ) -> Result<Itinerary, ItineraryError>
    where
        N: RoadNetwork + ?Sized,
    {
        if path.is_empty() {
            return Err(ItineraryError::EmptyPath);
        }

        let leg_builder = LegBuilder {
            schedule: self.schedule,
            realtime: self.realtime,
            road,
            config: &self.config,
            path_details,
        };
        let partitions = partition_path(path);
        let mut legs = Vec::new();
        for partition in &partitions {
            legs.extend(leg_builder.legs(partition)?);
        }

        let legs = stitch_egress(stitch_access(legs)?)?;
        let rendering = render(&legs);
        let fare = self.fare(&legs);

        let itinerary = Itinerary::new(
            waypoints,
            legs,
            rendering.instructions,
            rendering.points,
            rendering.details,
        )?
        .with_fare(fare);

        debug!(
            transitions = path.len(),
            partitions = partitions.len(),
            legs = itinerary.leg_count(),
            changes = itinerary.change_count(),
            distance = itinerary.distance(),
            duration_ms = itinerary.total_duration().num_milliseconds(),
            fare = ?itinerary.fare(),
            "Built itinerary"
        );

        Ok(itinerary)
    }

    fn fare(&self, legs: &[Leg]) -> Option<f64> {
        if !self.config.compute_fare {
            return None;
        }
        let segments = fare_segments(legs);
        if segments.is_empty() {
            return None;
        }
        self.fares.cheapest_fare(&segments)
    }
}

/// Moves a leading walk so it arrives exactly when the next leg departs.
pub(crate) fn stitch_access(mut legs: Vec<Leg>) -> Result<Vec<Leg>, ItineraryError> {
    if let [Leg::Walk(access), next, ..] = legs.as_mut_slice() {
        access.arrive_at(next.departure_time())?;
    }
    Ok(legs)
}

/// Moves a trailing walk so it departs exactly when the previous leg arrives.
pub(crate) fn stitch_egress(mut legs: Vec<Leg>) -> Result<Vec<Leg>, ItineraryError> {
    if let [.., previous, Leg::Walk(egress)] = legs.as_mut_slice() {
        egress.depart_at(previous.arrival_time())?;
    }
    Ok(legs)
}

/// Itinerary-wide instructions, points and path details.
#[derive(Debug, Default)]
struct Rendering {
    instructions: Vec<Instruction>,
    points: PointList,
    details: PathDetails,
}

fn render(legs: &[Leg]) -> Rendering {
    let last = legs.len().saturating_sub(1);
    legs.iter()
        .enumerate()
        .fold(Rendering::default(), |rendering, (i, leg)| match leg {
            Leg::Walk(walk) => rendering.walk(walk, i == last),
            Leg::Pt(pt) => rendering.pt(pt),
        })
}

impl Rendering {
    /// Appends a walk. Its finish instruction is kept only at the end of
    /// the itinerary.
    fn walk(mut self, walk: &WalkLeg, is_last: bool) -> Self {
        let keep = if is_last {
            walk.instructions.len()
        } else {
            walk.instructions.len().saturating_sub(1)
        };
        let offset = self.points.len();

        for instruction in &walk.instructions[..keep] {
            self.points.extend_from(&instruction.points);
            self.instructions.push(instruction.clone());
        }
        merge_path_details(&mut self.details, shift_path_details(&walk.details, offset));
        self
    }

    /// Appends a transit leg as a start instruction over all but the last
    /// stop and an end instruction at the last stop.
    ///
    /// A leg in the same vehicle as the previous one extends the previous
    /// start instruction and replaces the previous end instruction.
    fn pt(mut self, pt: &PtLeg) -> Self {
        let Some((alight, riding)) = pt.stops().split_last() else {
            return self;
        };
        let riding: PointList = riding.iter().map(|stop| Position::from(stop.location)).collect();
        let alight_point = Position::from(alight.location);

        // One point per stop. The boarding stop is not repeated, so later
        // detail offsets count each stop exactly once.
        self.points.extend_from(&riding);
        self.points.push_position(alight_point);
        let end = Instruction::new(
            InstructionSign::PtEndTrip,
            alight.stop_name.clone(),
            std::iter::once(alight_point).collect(),
        );

        let extended = match (pt.is_in_same_vehicle_as_previous, self.instructions.as_mut_slice()) {
            (true, [.., start, previous_end])
                if start.sign == InstructionSign::PtStartTrip
                    && previous_end.sign == InstructionSign::PtEndTrip =>
            {
                start.points.extend_from(&riding);
                *previous_end = end.clone();
                true
            }
            _ => false,
        };
        if !extended {
            let start =
                Instruction::new(InstructionSign::PtStartTrip, pt.trip.headsign.clone(), riding)
                    .with_distance(pt.distance)
                    .with_time(pt.travel_time);
            self.instructions.push(start);
            self.instructions.push(end);
        }
        self
    }
}
