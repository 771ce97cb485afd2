//! Aim resolution and step validation.
//!
//! Two interchangeable front-ends turn pointer input into a step on the
//! [`PointGraph`]:
//!
//! - [`discrete::ClickNavigator`] resolves the node under a clicked pointer
//!   ray.
//! - [`continuous::AimNavigator`] resolves, every tick, the neighbour the
//!   view is looking at and shows a direction arrow towards it.
//!
//! Both commit through [`commit_step`], which enforces adjacency and the
//! inclusive step range before handing the move to the [`RigMotion`]
//! controller. Rejections are ordinary outcomes, traced at debug level.

pub mod continuous;
pub mod discrete;

use std::fmt;

use glam::Quat;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{NodeId, PointGraph};
use crate::rig::RigMotion;
use crate::{DEFAULT_MAX_STEP, DEFAULT_MIN_STEP};

/// Inclusive range of accepted step distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRange {
    /// Shortest accepted step.
    pub min: f32,
    /// Longest accepted step.
    pub max: f32,
}

impl StepRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns `true` when `distance` lies within `[min, max]`.
    #[must_use]
    pub fn contains(self, distance: f32) -> bool {
        distance >= self.min && distance <= self.max
    }
}

impl Default for StepRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_STEP, DEFAULT_MAX_STEP)
    }
}

impl fmt::Display for StepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}..={:.2}", self.min, self.max)
    }
}

/// Why a step did not happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepRejection {
    /// The pointer ray struck nothing.
    NoHit,
    /// The struck object does not belong to a node.
    NoNode,
    /// The candidate is the current node.
    SameNode,
    /// The candidate is not a neighbour of the current node.
    NotNeighbour,
    /// The candidate is a neighbour but too near or too far.
    OutOfRange {
        /// Distance between the current node and the candidate.
        distance: f32,
        /// Accepted range.
        range: StepRange,
    },
    /// No candidate is currently resolved.
    NoCandidate,
    /// The rig is still moving.
    Busy,
}

impl fmt::Display for StepRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHit => f.write_str("ray hit nothing"),
            Self::NoNode => f.write_str("hit object is not a waypoint"),
            Self::SameNode => f.write_str("already at the candidate"),
            Self::NotNeighbour => f.write_str("candidate is not a neighbour"),
            Self::OutOfRange { distance, range } => {
                write!(f, "blocked by step range: d={distance:.2}, need {range}")
            }
            Self::NoCandidate => f.write_str("no candidate aimed at"),
            Self::Busy => f.write_str("rig is moving"),
        }
    }
}

/// Result of a step attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The rig started moving and the current node advanced.
    Moved {
        /// Node left behind.
        from: NodeId,
        /// Node now current.
        to: NodeId,
        /// Distance between the two nodes.
        distance: f32,
    },
    /// Nothing moved.
    Rejected(StepRejection),
}

impl StepOutcome {
    /// Returns `true` for [`StepOutcome::Moved`].
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Start-up choices shared by both front-ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSetup {
    /// Name of the starting node; the first node when absent.
    pub start_node: Option<String>,
    /// Adopt the start node's authored orientation.
    pub follow_node_rotation: bool,
}

/// Configuration problems that disable a front-end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigatorError {
    /// The graph has no nodes; check the waypoint container.
    #[error("point graph is empty; the waypoint container must parent every waypoint")]
    EmptyGraph,
    /// The configured start node does not exist.
    #[error("start waypoint '{name}' is not in the point graph")]
    UnknownStartNode {
        /// Name that failed to resolve.
        name: String,
    },
}

/// Where a front-end begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPlacement {
    /// Starting node.
    pub node: NodeId,
    /// Orientation to adopt, when the setup asks for it and the node has one.
    pub rotation: Option<Quat>,
}

/// Resolves the start node and places the rig on it.
///
/// # Errors
///
/// Returns [`NavigatorError::EmptyGraph`] when the graph has no nodes and
/// [`NavigatorError::UnknownStartNode`] when the named start is missing.
pub fn place_at_start(
    graph: &PointGraph,
    rig: &mut RigMotion,
    setup: &NavigatorSetup,
) -> Result<StartPlacement, NavigatorError> {
    let start = match setup.start_node.as_deref() {
        Some(name) => graph
            .find_by_name(name)
            .ok_or_else(|| NavigatorError::UnknownStartNode {
                name: name.to_owned(),
            })?,
        None => graph
            .all_nodes()
            .first()
            .ok_or(NavigatorError::EmptyGraph)?,
    };
    rig.place_at(start.position());
    let rotation = if setup.follow_node_rotation {
        start.rotation()
    } else {
        None
    };
    debug!(
        "navigation starts at '{}' (rig {}), {} waypoints",
        start.name(),
        rig.position(),
        graph.len()
    );
    Ok(StartPlacement {
        node: start.id(),
        rotation,
    })
}

/// Validates a step from `current` to `candidate` and starts it.
///
/// The candidate must differ from `current`, be listed as its neighbour and
/// lie within `range`. On success the rig starts moving and `current` is set
/// to the candidate.
pub fn commit_step(
    graph: &PointGraph,
    rig: &mut RigMotion,
    current: &mut NodeId,
    candidate: NodeId,
    range: StepRange,
) -> StepOutcome {
    let from = *current;
    let verdict = check_step(graph, from, candidate, range);
    let outcome = match verdict {
        Ok((target, distance)) => {
            rig.move_to(target);
            *current = candidate;
            StepOutcome::Moved {
                from,
                to: candidate,
                distance,
            }
        }
        Err(rejection) => StepOutcome::Rejected(rejection),
    };
    trace_outcome(graph, &outcome);
    outcome
}

fn check_step(
    graph: &PointGraph,
    from: NodeId,
    candidate: NodeId,
    range: StepRange,
) -> Result<(glam::Vec3, f32), StepRejection> {
    if candidate == from {
        return Err(StepRejection::SameNode);
    }
    if !graph.is_neighbour(from, candidate) {
        return Err(StepRejection::NotNeighbour);
    }
    let (Some(start), Some(end)) = (graph.node(from), graph.node(candidate)) else {
        return Err(StepRejection::NoNode);
    };
    let distance = start.position().distance(end.position());
    if !range.contains(distance) {
        return Err(StepRejection::OutOfRange { distance, range });
    }
    Ok((end.position(), distance))
}

fn node_name(graph: &PointGraph, id: NodeId) -> &str {
    graph.node(id).map_or("?", |node| node.name())
}

pub(crate) fn trace_outcome(graph: &PointGraph, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Moved { from, to, distance } => debug!(
            "move {} -> {}, d={distance:.2}",
            node_name(graph, *from),
            node_name(graph, *to)
        ),
        StepOutcome::Rejected(rejection) => debug!("step rejected: {rejection}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::RigSettings;
    use crate::scene::{SceneContainer, SceneObject};
    use glam::Vec3;
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> PointGraph {
        PointGraph::from_container(&SceneContainer::new(
            "Waypoints",
            vec![
                SceneObject::new("WP_01", 1, Vec3::ZERO)
                    .with_neighbours(["WP_02", "WP_03", "WP_04"]),
                SceneObject::new("WP_02", 2, Vec3::new(1.5, 0.0, 0.0))
                    .with_rotation(Quat::from_rotation_y(1.0)),
                SceneObject::new("WP_03", 3, Vec3::new(0.0, 0.0, 0.5)),
                SceneObject::new("WP_04", 4, Vec3::new(0.0, 0.0, 5.0)),
                SceneObject::new("WP_09", 9, Vec3::new(1.2, 0.0, 0.0)),
            ],
        ))
    }

    fn rig() -> RigMotion {
        RigMotion::new(Vec3::new(0.0, 1.6, 0.0), RigSettings::default())
    }

    #[rstest]
    #[case(1.2, true)]
    #[case(1.8, true)]
    #[case(1.5, true)]
    #[case(1.199, false)]
    #[case(1.801, false)]
    fn step_range_is_inclusive(#[case] distance: f32, #[case] expected: bool) {
        assert_eq!(StepRange::default().contains(distance), expected);
    }

    #[rstest]
    fn accepted_step_moves_rig_and_current(graph: PointGraph) {
        let mut rig = rig();
        let mut current = NodeId(0);
        let outcome = commit_step(&graph, &mut rig, &mut current, NodeId(1), StepRange::default());
        assert!(outcome.moved());
        assert_eq!(current, NodeId(1));
        assert_eq!(rig.target(), Some(Vec3::new(1.5, 1.6, 0.0)));
    }

    #[rstest]
    #[case::too_near(NodeId(2))]
    #[case::too_far(NodeId(3))]
    fn neighbours_outside_range_are_rejected(graph: PointGraph, #[case] candidate: NodeId) {
        let mut rig = rig();
        let mut current = NodeId(0);
        let outcome = commit_step(&graph, &mut rig, &mut current, candidate, StepRange::default());
        assert!(matches!(
            outcome,
            StepOutcome::Rejected(StepRejection::OutOfRange { .. })
        ));
        assert_eq!(current, NodeId(0));
        assert!(!rig.is_busy());
    }

    #[rstest]
    fn non_neighbour_in_range_is_rejected(graph: PointGraph) {
        let mut rig = rig();
        let mut current = NodeId(0);
        let outcome = commit_step(&graph, &mut rig, &mut current, NodeId(4), StepRange::default());
        assert_eq!(outcome, StepOutcome::Rejected(StepRejection::NotNeighbour));
        assert_eq!(current, NodeId(0));
    }

    #[rstest]
    fn same_node_is_rejected(graph: PointGraph) {
        let mut rig = rig();
        let mut current = NodeId(0);
        let outcome = commit_step(&graph, &mut rig, &mut current, NodeId(0), StepRange::default());
        assert_eq!(outcome, StepOutcome::Rejected(StepRejection::SameNode));
    }

    #[rstest]
    fn start_defaults_to_first_node(graph: PointGraph) {
        let mut rig = rig();
        let placement = place_at_start(&graph, &mut rig, &NavigatorSetup::default());
        assert_eq!(placement.map(|p| p.node), Ok(NodeId(0)));
        assert_eq!(rig.position(), Vec3::new(0.0, 1.6, 0.0));
    }

    #[rstest]
    fn named_start_with_rotation(graph: PointGraph) {
        let mut rig = rig();
        let setup = NavigatorSetup {
            start_node: Some(String::from("WP_02")),
            follow_node_rotation: true,
        };
        let placement = place_at_start(&graph, &mut rig, &setup);
        assert_eq!(
            placement,
            Ok(StartPlacement {
                node: NodeId(1),
                rotation: Some(Quat::from_rotation_y(1.0)),
            })
        );
        assert_eq!(rig.position(), Vec3::new(1.5, 1.6, 0.0));
    }

    #[rstest]
    fn unknown_start_is_a_configuration_error(graph: PointGraph) {
        let mut rig = rig();
        let setup = NavigatorSetup {
            start_node: Some(String::from("WP_77")),
            ..NavigatorSetup::default()
        };
        assert_eq!(
            place_at_start(&graph, &mut rig, &setup),
            Err(NavigatorError::UnknownStartNode {
                name: String::from("WP_77")
            })
        );
    }

    #[test]
    fn empty_graph_is_a_configuration_error() {
        let mut rig = rig();
        let outcome = place_at_start(&PointGraph::new(), &mut rig, &NavigatorSetup::default());
        assert_eq!(outcome, Err(NavigatorError::EmptyGraph));
    }
}
