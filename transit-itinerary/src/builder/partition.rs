//! Splitting a path at network-mode boundaries.

use crate::domain::{EdgeType, Transition};

/// A contiguous run of transitions in one network mode.
///
/// Every partition after the first starts with an edge-less transition
/// carrying the previous partition's final label.
pub type Partition = Vec<Transition>;

/// Splits a path into walk and transit partitions.
///
/// A new partition starts at every ENTER_PT edge and right after every
/// EXIT_PT edge, provided the previous transition traversed an edge.
///
/// # Examples
///
/// ```
/// use transit_itinerary::builder::partition_path;
///
/// assert!(partition_path(&[]).is_empty());
/// ```
pub fn partition_path(path: &[Transition]) -> Vec<Partition> {
    let mut partitions: Vec<Partition> = Vec::new();
    let mut previous: Option<&Transition> = None;

    for transition in path {
        match previous {
            Some(prev) if is_boundary(prev, transition) => {
                partitions.push(vec![Transition::start(prev.label), transition.clone()]);
            }
            _ => match partitions.last_mut() {
                Some(current) => current.push(transition.clone()),
                None => partitions.push(vec![transition.clone()]),
            },
        }
        previous = Some(transition);
    }

    partitions
}

fn is_boundary(previous: &Transition, current: &Transition) -> bool {
    match previous.edge_type() {
        Some(EdgeType::ExitPt) => true,
        Some(_) => current.edge_type() == Some(EdgeType::EnterPt),
        None => false,
    }
}
