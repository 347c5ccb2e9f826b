//! In-memory collaborators and path fixtures for builder tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use geo_types::Point;
use prost::Message;

use crate::domain::{
    EdgeId, EdgeLabel, EdgeType, FareResolver, FareSegment, FeedId, GraphEdge, Instruction,
    InstructionSign, Label, NodeId, PathDetail, PathDetails, PointList, Position, Transition,
};
use crate::realtime::{
    RealtimeFeed, StopInfo, StopTime, TransitSchedule, TripDescriptor, TripUpdate,
};
use crate::road::{InstructionGenerator, RoadNetwork, RoadPath};

pub const FEED: &str = "gtfs_0";
pub const HEADSIGN: &str = "Ostbahnhof";

/// Position of the n-th node of a fixture path.
pub fn position(node: u32) -> Position {
    Position::new(52.5 + f64::from(node) * 0.001, 13.4)
}

/// A path plus the per-edge data the realtime feed keeps for it.
pub struct TestPath {
    pub transitions: Vec<Transition>,
    pub stop_sequences: HashMap<EdgeId, u32>,
    pub descriptors: HashMap<EdgeId, Vec<u8>>,
}

/// Builds transition sequences one edge at a time.
///
/// Every edge runs from the previous node to a fresh one, with a two point
/// geometry, so a walk over n edges covers n + 1 points.
pub struct PathBuilder {
    transitions: Vec<Transition>,
    node: u32,
    next_edge: u32,
    stop_sequences: HashMap<EdgeId, u32>,
    descriptors: HashMap<EdgeId, Vec<u8>>,
}

impl PathBuilder {
    pub fn new(start: i64) -> Self {
        Self {
            transitions: vec![Transition::start(Label::new(start, NodeId(0)))],
            node: 0,
            next_edge: 1,
            stop_sequences: HashMap::new(),
            descriptors: HashMap::new(),
        }
    }

    fn push(
        mut self,
        edge_type: EdgeType,
        time: i64,
        distance: f64,
        transfers: u32,
        name: Option<String>,
    ) -> Self {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        let from = self.node;
        self.node += 1;

        let geometry: PointList = [position(from), position(self.node)].into_iter().collect();
        let name = name.unwrap_or_else(|| format!("Street {id}"));
        let feed_id = (edge_type != EdgeType::Highway).then(|| FeedId::new(FEED));

        self.transitions.push(Transition::new(
            Label::new(time, NodeId(self.node)),
            EdgeLabel {
                edge_type,
                feed_id,
                distance,
                transfers,
                edge: Arc::new(GraphEdge::new(id, name, geometry)),
            },
        ));
        self
    }

    pub fn walk(self, time: i64, distance: f64) -> Self {
        self.push(EdgeType::Highway, time, distance, 0, None)
    }

    pub fn enter(self, time: i64) -> Self {
        self.push(EdgeType::EnterPt, time, 0.0, 0, None)
    }

    pub fn exit(self, time: i64) -> Self {
        self.push(EdgeType::ExitPt, time, 0.0, 0, None)
    }

    /// Boards trip `trip_id` at stop sequence `stop_sequence`.
    pub fn board(mut self, time: i64, stop_sequence: u32, trip_id: &str, transfers: u32) -> Self {
        let id = EdgeId(self.next_edge);
        self.stop_sequences.insert(id, stop_sequence);
        self.descriptors.insert(
            id,
            TripDescriptor::scheduled(trip_id, format!("route-{trip_id}")).encode_to_vec(),
        );
        self.push(EdgeType::Board, time, 0.0, transfers, Some(HEADSIGN.to_string()))
    }

    pub fn hop(mut self, time: i64, stop_sequence: u32, distance: f64) -> Self {
        let id = EdgeId(self.next_edge);
        self.stop_sequences.insert(id, stop_sequence);
        self.push(EdgeType::Hop, time, distance, 0, None)
    }

    pub fn dwell(self, time: i64) -> Self {
        self.push(EdgeType::Dwell, time, 0.0, 0, None)
    }

    pub fn transfer(self, time: i64) -> Self {
        self.push(EdgeType::Transfer, time, 0.0, 0, None)
    }

    pub fn leave(self, time: i64) -> Self {
        self.push(EdgeType::LeaveTimeExpandedNetwork, time, 0.0, 0, None)
    }

    pub fn build(self) -> TestPath {
        TestPath {
            transitions: self.transitions,
            stop_sequences: self.stop_sequences,
            descriptors: self.descriptors,
        }
    }
}

/// Pure walk: t=0 to t=120000 ms over three edges, 950 m in total.
pub fn pure_walk() -> TestPath {
    PathBuilder::new(0)
        .walk(40_000, 300.0)
        .walk(80_000, 400.0)
        .walk(120_000, 250.0)
        .build()
}

/// Walk, one bus ride over stop sequences 1..=3, walk.
///
/// Boards at 1000000 ms, dwells at sequence 2 and arrives at 1000300 ms.
pub fn walk_bus_walk() -> TestPath {
    PathBuilder::new(800_000)
        .walk(900_000, 100.0)
        .walk(950_000, 50.0)
        .enter(950_000)
        .board(1_000_000, 1, "t1", 1)
        .hop(1_000_100, 2, 1200.0)
        .dwell(1_000_200)
        .hop(1_000_300, 3, 1300.0)
        .leave(1_000_300)
        .exit(1_000_300)
        .walk(1_060_300, 70.0)
        .walk(1_120_300, 30.0)
        .build()
}

/// A single ride of trip "t2" over stop sequences 1..=4, dwelling at 2 and 3.
pub fn long_ride() -> TestPath {
    PathBuilder::new(0)
        .enter(0)
        .board(1_000_000, 1, "t2", 1)
        .hop(1_000_100, 2, 500.0)
        .dwell(1_000_200)
        .hop(1_000_300, 3, 500.0)
        .dwell(1_000_400)
        .hop(1_000_500, 4, 500.0)
        .leave(1_000_500)
        .exit(1_000_500)
        .build()
}

/// Scheduled stop times of trip "t2" used by `long_ride`.
pub fn t2_stop_times() -> Vec<StopTime> {
    vec![
        StopTime::new("S2", 1, 40_000, 40_000),
        StopTime::new("S3", 2, 40_100, 40_200),
        StopTime::new("S4", 3, 40_300, 40_400),
        StopTime::new("S5", 4, 40_500, 40_500),
    ]
}

/// Scheduled stop times of trip "t1" used by `walk_bus_walk`.
pub fn t1_stop_times() -> Vec<StopTime> {
    vec![
        StopTime::new("S1", 1, 36_000, 36_000),
        StopTime::new("S2", 2, 36_100, 36_200),
        StopTime::new("S3", 3, 36_300, 36_300),
    ]
}

/// Stop catalogue with stops S1..S5, zones A, A, B, B, C.
pub fn schedule() -> MockSchedule {
    MockSchedule::default()
        .with_stop("S1", "Zoologischer Garten", Some("A"))
        .with_stop("S2", "Friedrichstraße", Some("A"))
        .with_stop("S3", "Alexanderplatz", Some("B"))
        .with_stop("S4", "Jannowitzbrücke", Some("B"))
        .with_stop("S5", "Ostbahnhof", Some("C"))
        .with_stop_time_count("t1", 3)
        .with_stop_time_count("t2", 4)
}

pub fn at(millis: i64) -> DateTime<Utc> {
    crate::domain::time::from_epoch_millis(millis).unwrap()
}

#[derive(Default)]
pub struct MockRealtime {
    stop_sequences: HashMap<EdgeId, u32>,
    descriptors: HashMap<EdgeId, Vec<u8>>,
    stop_times: HashMap<(String, u32), StopTime>,
    trip_updates: HashMap<String, TripUpdate>,
}

impl MockRealtime {
    pub fn new(path: &TestPath) -> Self {
        Self {
            stop_sequences: path.stop_sequences.clone(),
            descriptors: path.descriptors.clone(),
            ..Default::default()
        }
    }

    pub fn with_stop_times(mut self, trip_id: &str, stop_times: Vec<StopTime>) -> Self {
        for stop_time in stop_times {
            self.stop_times
                .insert((trip_id.to_string(), stop_time.stop_sequence), stop_time);
        }
        self
    }

    pub fn with_trip_update(mut self, update: TripUpdate) -> Self {
        self.trip_updates.insert(update.trip_id.clone(), update);
        self
    }

    pub fn with_descriptor(mut self, edge: EdgeId, bytes: Vec<u8>) -> Self {
        self.descriptors.insert(edge, bytes);
        self
    }
}

impl RealtimeFeed for MockRealtime {
    fn stop_sequence(&self, edge: &EdgeLabel) -> u32 {
        self.stop_sequences
            .get(&edge.edge_id())
            .copied()
            .unwrap_or_default()
    }

    fn stop_time(
        &self,
        _feed: &FeedId,
        descriptor: &TripDescriptor,
        _transition: &Transition,
        _board_time: DateTime<Utc>,
        stop_sequence: u32,
    ) -> Option<StopTime> {
        self.stop_times
            .get(&(descriptor.trip_id().to_string(), stop_sequence))
            .cloned()
    }

    fn trip_update(
        &self,
        _feed: &FeedId,
        descriptor: &TripDescriptor,
        _transition: &Transition,
        _board_time: DateTime<Utc>,
    ) -> Option<TripUpdate> {
        self.trip_updates.get(descriptor.trip_id()).cloned()
    }

    fn trip_descriptor(&self, edge: &EdgeLabel) -> Vec<u8> {
        self.descriptors
            .get(&edge.edge_id())
            .cloned()
            .unwrap_or_default()
    }
}

/// Realtime feed for `path` knowing the schedules of trips "t1" and "t2".
pub fn realtime(path: &TestPath) -> MockRealtime {
    MockRealtime::new(path)
        .with_stop_times("t1", t1_stop_times())
        .with_stop_times("t2", t2_stop_times())
}

/// Trip update for `trip_id` with the given (sequence, arrival, departure) times.
pub fn trip_update(trip_id: &str, times: &[(u32, i32, i32)]) -> TripUpdate {
    TripUpdate {
        trip_id: trip_id.to_string(),
        stop_times: times
            .iter()
            .map(|&(seq, arrival, departure)| {
                StopTime::new(format!("S{seq}"), seq, arrival, departure)
            })
            .collect(),
        cancelled_arrivals: HashSet::new(),
        cancelled_departures: HashSet::new(),
    }
}

#[derive(Default)]
pub struct MockSchedule {
    stops: HashMap<String, StopInfo>,
    counts: HashMap<String, usize>,
}

impl MockSchedule {
    pub fn with_stop(mut self, stop_id: &str, name: &str, zone: Option<&str>) -> Self {
        let index = self.stops.len() as f64;
        self.stops.insert(
            stop_id.to_string(),
            StopInfo {
                stop_id: stop_id.to_string(),
                name: name.to_string(),
                location: Point::new(13.3 + index * 0.02, 52.5),
                zone_id: zone.map(String::from),
            },
        );
        self
    }

    pub fn with_stop_time_count(mut self, trip_id: &str, count: usize) -> Self {
        self.counts.insert(trip_id.to_string(), count);
        self
    }
}

impl TransitSchedule for MockSchedule {
    fn stop(&self, _feed: &FeedId, stop_id: &str) -> Option<StopInfo> {
        self.stops.get(stop_id).cloned()
    }

    fn interpolated_stop_time_count(&self, _feed: &FeedId, trip_id: &str) -> Option<usize> {
        self.counts.get(trip_id).copied()
    }
}

/// Returns a fixed fare and remembers the segments it was asked about.
#[derive(Default)]
pub struct MockFares {
    pub fare: Option<f64>,
    pub seen: RefCell<Vec<FareSegment>>,
}

impl MockFares {
    pub fn flat(fare: f64) -> Self {
        Self {
            fare: Some(fare),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl FareResolver for MockFares {
    fn cheapest_fare(&self, segments: &[FareSegment]) -> Option<f64> {
        self.seen.borrow_mut().extend_from_slice(segments);
        self.fare
    }
}

/// Road network that emits one instruction per edge.
///
/// Each edge instruction owns every point of the edge but the last; the
/// finish instruction owns the final point. The "edge_id" path detail
/// spans each edge's two points.
pub struct MockRoads;

pub struct MockInstructions {
    instructions: Vec<Instruction>,
    last_point: Option<Position>,
}

impl InstructionGenerator for MockInstructions {
    fn next(&mut self, edge: &EdgeLabel, _index: usize, prev_edge: Option<EdgeId>) {
        let geometry = edge.edge.geometry.as_slice();
        let points: PointList = geometry[..geometry.len() - 1].iter().copied().collect();
        let sign = match prev_edge {
            None => InstructionSign::Continue,
            Some(_) => InstructionSign::TurnRight,
        };
        self.instructions.push(
            Instruction::new(sign, edge.edge.name.clone(), points).with_distance(edge.distance),
        );
        self.last_point = geometry.last().copied();
    }

    fn finish(mut self) -> Vec<Instruction> {
        let points: PointList = self.last_point.into_iter().collect();
        self.instructions
            .push(Instruction::new(InstructionSign::Finish, "", points));
        self.instructions
    }
}

impl RoadNetwork for MockRoads {
    type Instructions = MockInstructions;

    fn instructions(&self) -> MockInstructions {
        MockInstructions {
            instructions: Vec::new(),
            last_point: None,
        }
    }

    fn path_details(&self, path: &RoadPath, keys: &[String]) -> PathDetails {
        keys.iter()
            .filter(|key| key.as_str() == "edge_id")
            .map(|key| {
                let ranges = path
                    .edges
                    .iter()
                    .enumerate()
                    .map(|(i, edge)| PathDetail::new(edge.0, i, i + 1))
                    .collect();
                (key.clone(), ranges)
            })
            .collect()
    }
}

#[derive(Clone, Default)]
struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that records every event, and returns the log text.
pub fn captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = CapturedWriter::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
    (result, logs)
}
