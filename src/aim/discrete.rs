//! Click-to-select navigation.
//!
//! A primary click casts the pointer ray against the selectable layers and
//! steps to the struck waypoint when it is an in-range neighbour of the
//! current one.

use glam::Quat;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    commit_step, place_at_start, trace_outcome, NavigatorError, NavigatorSetup, StepOutcome,
    StepRange, StepRejection,
};
use crate::graph::{NodeId, PointGraph};
use crate::raycast::{LayerMask, Ray, RayCaster};
use crate::rig::RigMotion;
use crate::DEFAULT_CLICK_RAY_DISTANCE;

/// Tunables for click navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickSettings {
    /// Accepted step distances.
    pub step_range: StepRange,
    /// Layers a click may strike; empty means every layer.
    pub selectable_mask: LayerMask,
    /// Longest pointer ray.
    pub ray_distance: f32,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            step_range: StepRange::default(),
            selectable_mask: LayerMask::ALL,
            ray_distance: DEFAULT_CLICK_RAY_DISTANCE,
        }
    }
}

/// Discrete front-end tracking the current waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickNavigator {
    settings: ClickSettings,
    current: NodeId,
    start_rotation: Option<Quat>,
}

impl ClickNavigator {
    /// Creates the navigator and places the rig on the start waypoint.
    ///
    /// # Errors
    ///
    /// Fails when the graph is empty or the named start waypoint is missing.
    pub fn new(
        graph: &PointGraph,
        rig: &mut RigMotion,
        setup: &NavigatorSetup,
        settings: ClickSettings,
    ) -> Result<Self, NavigatorError> {
        let placement = place_at_start(graph, rig, setup)?;
        Ok(Self {
            settings,
            current: placement.node,
            start_rotation: placement.rotation,
        })
    }

    /// Waypoint the rig stands on or is travelling to.
    #[must_use]
    pub const fn current(&self) -> NodeId {
        self.current
    }

    /// Orientation adopted from the start waypoint.
    #[must_use]
    pub const fn start_rotation(&self) -> Option<Quat> {
        self.start_rotation
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &ClickSettings {
        &self.settings
    }

    /// Handles a primary click along `ray`.
    ///
    /// Clicks are honoured while the rig is moving; the new transition starts
    /// from wherever the rig currently is.
    pub fn on_primary(
        &mut self,
        ray: Ray,
        raycaster: &dyn RayCaster,
        graph: &PointGraph,
        rig: &mut RigMotion,
    ) -> StepOutcome {
        let mask = self.settings.selectable_mask.or_all_if_empty();
        let Some(hit) = raycaster.cast(ray, self.settings.ray_distance, mask) else {
            return reject(graph, StepRejection::NoHit);
        };
        let Some(node) = graph.node_for_hit(&hit) else {
            debug!("clicked {:?} at {}", hit.entity, hit.point);
            return reject(graph, StepRejection::NoNode);
        };
        let candidate = node.id();
        commit_step(graph, rig, &mut self.current, candidate, self.settings.step_range)
    }

    /// Steps to the waypoint called `name`, as if it had been clicked.
    pub fn step_to(&mut self, name: &str, graph: &PointGraph, rig: &mut RigMotion) -> StepOutcome {
        let Some(node) = graph.find_by_name(name) else {
            return reject(graph, StepRejection::NoNode);
        };
        let candidate = node.id();
        commit_step(graph, rig, &mut self.current, candidate, self.settings.step_range)
    }
}

fn reject(graph: &PointGraph, rejection: StepRejection) -> StepOutcome {
    let outcome = StepOutcome::Rejected(rejection);
    trace_outcome(graph, &outcome);
    outcome
}
