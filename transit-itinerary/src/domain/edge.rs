//! Search transitions and the edges they traverse.
//!
//! A path search result is an ordered list of `Transition`s. Each one pairs
//! the label reached (time and node) with the edge that was traversed to
//! reach it. Only the first transition of a path has no edge.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::geometry::PointList;
use super::time::{TimeError, from_epoch_millis};

/// The kind of graph edge a transition traversed.
///
/// Road edges are `Highway`; every other variant belongs to the
/// time-expanded transit network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Street segment walked on foot
    Highway,
    /// Entering the transit network from the street
    EnterPt,
    /// Leaving the transit network to the street
    ExitPt,
    /// Boarding a vehicle at its departure event
    Board,
    /// Riding between two consecutive stops
    Hop,
    /// Staying on board at an intermediate stop
    Dwell,
    /// Changing between vehicles inside the transit network
    Transfer,
    /// Alighting out of the time-expanded part of the network
    LeaveTimeExpandedNetwork,
}

impl EdgeType {
    /// Returns the canonical upper-case name of this edge type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Highway => "HIGHWAY",
            EdgeType::EnterPt => "ENTER_PT",
            EdgeType::ExitPt => "EXIT_PT",
            EdgeType::Board => "BOARD",
            EdgeType::Hop => "HOP",
            EdgeType::Dwell => "DWELL",
            EdgeType::Transfer => "TRANSFER",
            EdgeType::LeaveTimeExpandedNetwork => "LEAVE_TIME_EXPANDED_NETWORK",
        }
    }

    /// Returns true if this edge ends a vehicle use.
    pub fn ends_vehicle_use(&self) -> bool {
        matches!(
            self,
            EdgeType::Transfer | EdgeType::LeaveTimeExpandedNetwork
        )
    }

    /// Returns true if this edge produces or completes a stop visit.
    pub fn visits_stop(&self) -> bool {
        matches!(self, EdgeType::Board | EdgeType::Hop | EdgeType::Dwell)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an edge in the underlying graph storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EdgeId {
    fn from(value: u32) -> Self {
        EdgeId(value)
    }
}

/// Identifier of a node in the underlying graph storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

/// Identifier of a transit feed (one GTFS bundle).
///
/// # Examples
///
/// ```
/// use transit_itinerary::domain::FeedId;
///
/// let feed = FeedId::new("gtfs_0");
/// assert_eq!(feed.as_str(), "gtfs_0");
/// assert_eq!(feed.to_string(), "gtfs_0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeedId(String);

impl FeedId {
    /// Creates a feed identifier.
    pub fn new(id: impl Into<String>) -> Self {
        FeedId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeedId {
    fn from(value: &str) -> Self {
        FeedId::new(value)
    }
}

/// Read-only view of a graph edge.
///
/// `geometry` is the full way geometry from the base node to the adjacent
/// node, both tower nodes included.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    /// Street name for road edges, headsign for boarding edges
    pub name: String,
    pub geometry: PointList,
}

impl GraphEdge {
    /// Creates a graph edge view.
    pub fn new(id: EdgeId, name: impl Into<String>, geometry: PointList) -> Self {
        Self {
            id,
            name: name.into(),
            geometry,
        }
    }
}

/// The edge half of a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub edge_type: EdgeType,
    /// Transit feed this edge belongs to, if any
    pub feed_id: Option<FeedId>,
    /// Distance in metres
    pub distance: f64,
    /// Vehicle changes incurred by traversing this edge.
    ///
    /// On a `Board` edge this is 0 exactly when the rider stays in the
    /// vehicle they were already riding.
    pub transfers: u32,
    pub edge: Arc<GraphEdge>,
}

impl EdgeLabel {
    /// Returns the underlying graph edge identifier.
    pub fn edge_id(&self) -> EdgeId {
        self.edge.id
    }
}

/// The label reached by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// Milliseconds since the Unix epoch
    pub current_time: i64,
    pub adj_node: NodeId,
}

impl Label {
    /// Creates a label at the given epoch milliseconds and node.
    pub fn new(current_time: i64, adj_node: NodeId) -> Self {
        Self {
            current_time,
            adj_node,
        }
    }

    /// Returns the label time as a UTC timestamp.
    pub fn time(&self) -> Result<DateTime<Utc>, TimeError> {
        from_epoch_millis(self.current_time)
    }
}

/// One step of a path search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub label: Label,
    /// Absent only at the first transition of a path, and at the synthetic
    /// transition that seeds each partition.
    pub edge: Option<EdgeLabel>,
}

impl Transition {
    /// Creates an edge-less transition at `label`.
    pub fn start(label: Label) -> Self {
        Self { label, edge: None }
    }

    /// Creates a transition that traversed `edge` to reach `label`.
    pub fn new(label: Label, edge: EdgeLabel) -> Self {
        Self {
            label,
            edge: Some(edge),
        }
    }

    /// Returns the type of the traversed edge, if any.
    pub fn edge_type(&self) -> Option<EdgeType> {
        self.edge.as_ref().map(|edge| edge.edge_type)
    }
}
