//! Stop visits of one vehicle use.
//!
//! The BOARD, HOP and DWELL edges of a ride are folded through a small
//! state machine. BOARD opens the ride and emits the boarding stop, HOP
//! records a pending arrival, DWELL turns the pending arrival into an
//! intermediate stop, and `finish` emits the pending arrival as the
//! alighting stop.
//!
//! Planned times are the search label times. Predicted times add the delay
//! of the trip update, if the realtime feed has one for the trip.

use chrono::{DateTime, Utc};
use tracing::{error, trace};

use crate::domain::time::apply_delay;
use crate::domain::{EdgeLabel, EdgeType, FeedId, ItineraryError, Stop, Transition};
use crate::realtime::{RealtimeFeed, StopTime, TransitSchedule, TripDescriptor, TripUpdate};

/// Collaborators and identity of the trip being ridden.
pub(crate) struct TripContext<'a, R: ?Sized, S: ?Sized> {
    pub realtime: &'a R,
    pub schedule: &'a S,
    pub feed: &'a FeedId,
    pub descriptor: &'a TripDescriptor,
    pub check_trip_updates: bool,
}

/// State of the stop sequence fold.
#[derive(Debug)]
enum StopSequence {
    ExpectBoard,
    Riding(Ride),
}

#[derive(Debug)]
struct Ride {
    board_time: DateTime<Utc>,
    trip_update: Option<TripUpdate>,
    stops: Vec<Stop>,
    /// Stop reached by the latest HOP
    pending: Option<Pending>,
}

/// An arrival whose departure is not known yet.
#[derive(Debug)]
struct Pending {
    /// Stop with its arrival fields filled in
    stop: Stop,
    scheduled: StopTime,
}

impl StopSequence {
    fn state(&self) -> &'static str {
        match self {
            StopSequence::ExpectBoard => "expecting a board",
            StopSequence::Riding(Ride { pending: None, .. }) => "awaiting a hop",
            StopSequence::Riding(Ride {
                pending: Some(_), ..
            }) => "holding a pending arrival",
        }
    }

    fn invalid(&self, event: &'static str) -> ItineraryError {
        ItineraryError::InvalidStopSequenceState {
            event,
            state: self.state(),
        }
    }

    fn step<R, S>(
        self,
        ctx: &TripContext<'_, R, S>,
        transition: &Transition,
        edge: &EdgeLabel,
    ) -> Result<Self, ItineraryError>
    where
        R: RealtimeFeed + ?Sized,
        S: TransitSchedule + ?Sized,
    {
        match (edge.edge_type, self) {
            (EdgeType::Board, StopSequence::ExpectBoard) => board(ctx, transition, edge),
            (EdgeType::Hop, StopSequence::Riding(mut ride)) => {
                let stop_sequence = ctx.realtime.stop_sequence(edge);
                let scheduled =
                    scheduled_stop_time(ctx, transition, ride.board_time, stop_sequence)?;
                let mut stop = visit(ctx, &scheduled)?;

                let arrival = transition.label.time()?;
                stop.planned_arrival = Some(arrival);
                if let Some(update) = &ride.trip_update {
                    let delay = i64::from(updated(update, stop_sequence)?.arrival_time)
                        - i64::from(scheduled.arrival_time);
                    stop.predicted_arrival = Some(apply_delay(arrival, delay)?);
                    stop.arrival_cancelled = update.is_arrival_cancelled(stop_sequence);
                    // Kept if this is the alighting stop, replaced by DWELL otherwise
                    stop.departure_cancelled = update.is_departure_cancelled(stop_sequence);
                }

                if let Some(skipped) = ride.pending.replace(Pending { stop, scheduled }) {
                    trace!(
                        stop_sequence = skipped.stop.stop_sequence,
                        "HOP without DWELL, dropping pending arrival"
                    );
                }
                Ok(StopSequence::Riding(ride))
            }
            (EdgeType::Dwell, StopSequence::Riding(mut ride)) if ride.pending.is_some() => {
                if let Some(Pending { mut stop, scheduled }) = ride.pending.take() {
                    let departure = transition.label.time()?;
                    depart(&mut stop, departure, &scheduled, ride.trip_update.as_ref())?;
                    trace!(stop = ?stop, "Intermediate stop");
                    ride.stops.push(stop);
                }
                Ok(StopSequence::Riding(ride))
            }
            (EdgeType::Board | EdgeType::Hop | EdgeType::Dwell, state) => {
                Err(state.invalid(edge.edge_type.as_str()))
            }
            (found, _) => Err(ItineraryError::UnexpectedEdge {
                found,
                context: "stop visits come only from BOARD, HOP and DWELL edges",
            }),
        }
    }

    fn finish(self) -> Result<Vec<Stop>, ItineraryError> {
        match self {
            StopSequence::Riding(Ride {
                mut stops,
                pending: Some(Pending { stop, .. }),
                ..
            }) => {
                trace!(stop = ?stop, "Alighting stop");
                stops.push(stop);
                Ok(stops)
            }
            state => Err(state.invalid("finish")),
        }
    }
}

fn board<R, S>(
    ctx: &TripContext<'_, R, S>,
    transition: &Transition,
    edge: &EdgeLabel,
) -> Result<StopSequence, ItineraryError>
where
    R: RealtimeFeed + ?Sized,
    S: TransitSchedule + ?Sized,
{
    let board_time = transition.label.time()?;
    let stop_sequence = ctx.realtime.stop_sequence(edge);
    let scheduled = scheduled_stop_time(ctx, transition, board_time, stop_sequence)?;
    let trip_update = ctx
        .realtime
        .trip_update(ctx.feed, ctx.descriptor, transition, board_time);
    if let Some(update) = trip_update.as_ref().filter(|_| ctx.check_trip_updates) {
        check_trip_update(ctx, update);
    }

    let mut stop = visit(ctx, &scheduled)?;
    depart(&mut stop, board_time, &scheduled, trip_update.as_ref())?;
    if let Some(update) = &trip_update {
        stop.arrival_cancelled = update.is_arrival_cancelled(stop_sequence);
    }
    trace!(stop = ?stop, "Boarding stop");

    Ok(StopSequence::Riding(Ride {
        board_time,
        trip_update,
        stops: vec![stop],
        pending: None,
    }))
}

/// Fills in the departure fields of `stop`, planned at `departure`.
fn depart(
    stop: &mut Stop,
    departure: DateTime<Utc>,
    scheduled: &StopTime,
    trip_update: Option<&TripUpdate>,
) -> Result<(), ItineraryError> {
    stop.planned_departure = Some(departure);
    if let Some(update) = trip_update {
        let delay = i64::from(updated(update, scheduled.stop_sequence)?.departure_time)
            - i64::from(scheduled.departure_time);
        stop.predicted_departure = Some(apply_delay(departure, delay)?);
        stop.departure_cancelled = update.is_departure_cancelled(scheduled.stop_sequence);
    }
    Ok(())
}

fn scheduled_stop_time<R, S>(
    ctx: &TripContext<'_, R, S>,
    transition: &Transition,
    board_time: DateTime<Utc>,
    stop_sequence: u32,
) -> Result<StopTime, ItineraryError>
where
    R: RealtimeFeed + ?Sized,
    S: ?Sized,
{
    ctx.realtime
        .stop_time(ctx.feed, ctx.descriptor, transition, board_time, stop_sequence)
        .ok_or_else(|| ItineraryError::StopTimeNotFound {
            trip_id: ctx.descriptor.trip_id().to_string(),
            stop_sequence,
        })
}

fn updated(update: &TripUpdate, stop_sequence: u32) -> Result<&StopTime, ItineraryError> {
    update
        .stop_time(stop_sequence)
        .ok_or_else(|| ItineraryError::TripUpdateStopNotFound {
            trip_id: update.trip_id.clone(),
            stop_sequence,
        })
}

/// Creates a stop visit for a scheduled stop time from the stop catalogue.
fn visit<R, S>(ctx: &TripContext<'_, R, S>, stop_time: &StopTime) -> Result<Stop, ItineraryError>
where
    R: ?Sized,
    S: TransitSchedule + ?Sized,
{
    let info = ctx
        .schedule
        .stop(ctx.feed, &stop_time.stop_id)
        .ok_or_else(|| ItineraryError::UnknownStop {
            feed: ctx.feed.clone(),
            stop_id: stop_time.stop_id.clone(),
        })?;

    let mut stop = Stop::new(info.stop_id, info.name, stop_time.stop_sequence, info.location);
    stop.zone_id = info.zone_id;
    Ok(stop)
}

/// Logs when a trip update disagrees with the timetable on the number of stops.
fn check_trip_update<R, S>(ctx: &TripContext<'_, R, S>, update: &TripUpdate)
where
    R: ?Sized,
    S: TransitSchedule + ?Sized,
{
    let scheduled = ctx
        .schedule
        .interpolated_stop_time_count(ctx.feed, &update.trip_id);
    let updated = update.stop_times.len();

    match scheduled {
        Some(count) if count == updated => trace!(
            trip_id = %update.trip_id,
            scheduled = count,
            updated,
            "Trip update matches timetable"
        ),
        _ => error!(
            feed = %ctx.feed,
            trip_id = %update.trip_id,
            scheduled = ?scheduled,
            updated,
            "Trip update stop count differs from timetable"
        ),
    }
}

/// Builds the stop visits of one vehicle use.
///
/// `ride` may contain any transitions of the vehicle use; only BOARD, HOP
/// and DWELL edges are considered.
pub(crate) fn stops_from_vehicle_use<R, S>(
    ctx: &TripContext<'_, R, S>,
    ride: &[Transition],
) -> Result<Vec<Stop>, ItineraryError>
where
    R: RealtimeFeed + ?Sized,
    S: TransitSchedule + ?Sized,
{
    ride.iter()
        .filter_map(|transition| transition.edge.as_ref().map(|edge| (transition, edge)))
        .filter(|(_, edge)| edge.edge_type.visits_stop())
        .try_fold(StopSequence::ExpectBoard, |state, (transition, edge)| {
            state.step(ctx, transition, edge)
        })?
        .finish()
}
