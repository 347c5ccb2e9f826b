//! Point lists and leg geometry.
//!
//! Graph storage hands out way geometry as latitude/longitude point lists,
//! optionally with elevation. Legs carry a `geo_types::LineString` in
//! (longitude, latitude) order plus an elevation profile when every source
//! point had one.

use geo_types::{Coord, LineString, Point};
use serde::Serialize;

use super::edge::Transition;

/// A single latitude/longitude position with optional elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ele: Option<f64>,
}

impl Position {
    /// Creates a 2D position.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
        }
    }

    /// Creates a 3D position.
    pub fn with_elevation(lat: f64, lon: f64, ele: f64) -> Self {
        Self {
            lat,
            lon,
            ele: Some(ele),
        }
    }

    /// Returns the position as a (longitude, latitude) coordinate.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

impl From<Point<f64>> for Position {
    fn from(point: Point<f64>) -> Self {
        Position::new(point.y(), point.x())
    }
}

/// An ordered list of positions.
///
/// # Examples
///
/// ```
/// use transit_itinerary::domain::PointList;
///
/// let mut points = PointList::new();
/// points.push(52.52, 13.40);
/// points.push(52.53, 13.41);
/// assert_eq!(points.len(), 2);
/// assert!(!points.is_3d());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PointList(Vec<Position>);

impl PointList {
    /// Creates an empty point list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a 2D point.
    pub fn push(&mut self, lat: f64, lon: f64) {
        self.0.push(Position::new(lat, lon));
    }

    /// Appends a 3D point.
    pub fn push_3d(&mut self, lat: f64, lon: f64, ele: f64) {
        self.0.push(Position::with_elevation(lat, lon, ele));
    }

    /// Appends an existing position.
    pub fn push_position(&mut self, position: Position) {
        self.0.push(position);
    }

    /// Appends every point of `other`.
    pub fn extend_from(&mut self, other: &PointList) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Position> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Position> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.0
    }

    /// Returns true if the list is non-empty and every point has an elevation.
    pub fn is_3d(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|p| p.ele.is_some())
    }
}

impl From<Vec<Position>> for PointList {
    fn from(positions: Vec<Position>) -> Self {
        PointList(positions)
    }
}

impl FromIterator<Position> for PointList {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        PointList(iter.into_iter().collect())
    }
}

/// Geometry of one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegGeometry {
    /// Coordinates in (longitude, latitude) order
    pub line: LineString<f64>,
    /// Elevation per coordinate, present only when every source point had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Vec<f64>>,
}

impl LegGeometry {
    /// Creates an empty geometry.
    pub fn empty() -> Self {
        Self {
            line: LineString::new(Vec::new()),
            elevation: None,
        }
    }

    /// Converts positions to coordinates, keeping elevation if all have one.
    pub fn from_positions(positions: &[Position]) -> Self {
        let line = LineString::new(positions.iter().map(Position::coord).collect());
        let elevation = if positions.is_empty() {
            None
        } else {
            positions.iter().map(|p| p.ele).collect::<Option<Vec<f64>>>()
        };
        Self { line, elevation }
    }

    /// Returns the number of coordinates.
    pub fn len(&self) -> usize {
        self.line.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.0.is_empty()
    }
}

impl From<&PointList> for LegGeometry {
    fn from(points: &PointList) -> Self {
        LegGeometry::from_positions(points.as_slice())
    }
}

/// Builds the line string for a contiguous run of transitions.
///
/// The first transition only marks where the run starts and contributes no
/// geometry. The first traversed edge contributes its full way geometry;
/// every later edge skips its base node, which repeats the previous edge's
/// adjacent node.
pub fn line_string(transitions: &[Transition]) -> LegGeometry {
    let mut edges = transitions
        .iter()
        .skip(1)
        .filter_map(|transition| transition.edge.as_ref());

    let mut positions = Vec::new();
    if let Some(first) = edges.next() {
        positions.extend(first.edge.geometry.iter().copied());
    }
    for edge in edges {
        positions.extend(edge.edge.geometry.iter().skip(1).copied());
    }

    LegGeometry::from_positions(&positions)
}
