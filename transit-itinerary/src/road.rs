//! Road network collaborators.
//!
//! Turn-by-turn instructions and path details for walks are produced by
//! the routing engine's road layer. The builder only feeds it edges and
//! collects the result.

use serde::Serialize;

use crate::domain::{EdgeId, EdgeLabel, Instruction, NodeId, PathDetails};

/// A walked path over road edges, as handed to the path-detail calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadPath {
    pub edges: Vec<EdgeId>,
    pub from_node: NodeId,
    pub end_node: NodeId,
}

impl RoadPath {
    pub fn new(from_node: NodeId, end_node: NodeId) -> Self {
        Self {
            edges: Vec::new(),
            from_node,
            end_node,
        }
    }

    pub fn push(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }
}

/// Turns a sequence of road edges into instructions.
///
/// Edges are fed in path order; `prev_edge` is `None` for the first one.
pub trait InstructionGenerator {
    fn next(&mut self, edge: &EdgeLabel, index: usize, prev_edge: Option<EdgeId>);

    /// Emits the final instruction and returns all of them.
    fn finish(self) -> Vec<Instruction>;
}

/// Read-only road network view.
pub trait RoadNetwork {
    type Instructions: InstructionGenerator;

    /// Returns a fresh instruction generator for one walk.
    fn instructions(&self) -> Self::Instructions;

    /// Computes path details for `keys`, indexed into the points of the
    /// path's instructions.
    fn path_details(&self, path: &RoadPath, keys: &[String]) -> PathDetails;
}
