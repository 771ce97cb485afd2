//! Per-tick retargeting of the pursuing agent.
//!
//! Each tick the moving target is projected onto the walkable surface and
//! nudged away from the nearest boundary before it becomes the agent's new
//! destination. Termination is checked after the destination is updated:
//! first against the configured end point, then, when enabled, against the
//! live target itself.

use std::fmt;

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::surface::{push_from_edge, NavAgent, NavSurface};
use crate::{
    DEFAULT_CATCH_DISTANCE, DEFAULT_END_DISTANCE, DEFAULT_KEEP_AWAY_FROM_EDGE,
    DEFAULT_TARGET_SAMPLE_RADIUS, EDGE_RESAMPLE_RADIUS,
};

/// Tunables for the pursuit controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitSettings {
    /// Distance to the end point that ends the chase.
    pub end_distance: f32,
    /// Radius used to project the target onto the surface.
    pub target_sample_radius: f32,
    /// Distance the projected target is moved away from the nearest edge.
    pub keep_away_from_edge: f32,
    /// Radius used to re-validate the pushed target.
    pub resample_radius: f32,
    /// End the chase when the agent reaches the target itself.
    pub catch_on_contact: bool,
    /// Distance to the target that counts as a catch.
    pub catch_distance: f32,
}

impl Default for PursuitSettings {
    fn default() -> Self {
        Self {
            end_distance: DEFAULT_END_DISTANCE,
            target_sample_radius: DEFAULT_TARGET_SAMPLE_RADIUS,
            keep_away_from_edge: DEFAULT_KEEP_AWAY_FROM_EDGE,
            resample_radius: EDGE_RESAMPLE_RADIUS,
            catch_on_contact: false,
            catch_distance: DEFAULT_CATCH_DISTANCE,
        }
    }
}

/// Why a chase finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChaseEndReason {
    /// The agent arrived at the end point.
    ReachedEndPoint,
    /// The agent came within catch distance of the target.
    CaughtTarget,
}

impl fmt::Display for ChaseEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReachedEndPoint => f.write_str("reached end point"),
            Self::CaughtTarget => f.write_str("caught target"),
        }
    }
}

/// What one pursuit tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitStatus {
    /// The agent is off the surface; nothing was updated.
    Holding,
    /// The agent was sent towards the contained point.
    Pursuing(Vec3),
    /// The chase is over; the agent should be removed.
    Ended(ChaseEndReason),
}

/// Drives one agent towards a moving target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pursuit {
    settings: PursuitSettings,
    end_point: Option<Vec3>,
}

impl Pursuit {
    /// Creates a controller; without an end point only catching can end it.
    #[must_use]
    pub const fn new(settings: PursuitSettings, end_point: Option<Vec3>) -> Self {
        Self {
            settings,
            end_point,
        }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &PursuitSettings {
        &self.settings
    }

    /// Configured end point.
    #[must_use]
    pub const fn end_point(&self) -> Option<Vec3> {
        self.end_point
    }

    /// Projects `target` to an edge-safe walkable point for `agent`.
    ///
    /// When the target cannot be projected it is used as is, at the agent's
    /// height.
    #[must_use]
    pub fn project_target(&self, surface: &dyn NavSurface, agent: &dyn NavAgent, target: Vec3) -> Vec3 {
        let projected = surface
            .sample_nearest(target, self.settings.target_sample_radius)
            .unwrap_or_else(|| Vec3::new(target.x, agent.position().y, target.z));
        push_from_edge(
            surface,
            projected,
            self.settings.keep_away_from_edge,
            self.settings.resample_radius,
        )
    }

    /// Runs one pursuit tick.
    pub fn tick(&self, surface: &dyn NavSurface, agent: &mut dyn NavAgent, target: Vec3) -> PursuitStatus {
        if !agent.is_on_surface() {
            return PursuitStatus::Holding;
        }

        let destination = self.project_target(surface, agent, target);
        if !agent.set_destination(destination) {
            debug!("agent refused destination {destination}; keeping previous one");
        }

        let position = agent.position();
        if let Some(end) = self.end_point {
            if position.distance(end) <= self.settings.end_distance {
                info!("pursuer reached end point {end}");
                return PursuitStatus::Ended(ChaseEndReason::ReachedEndPoint);
            }
        }
        if self.settings.catch_on_contact && position.distance(target) <= self.settings.catch_distance
        {
            info!("pursuer caught target at {target}");
            return PursuitStatus::Ended(ChaseEndReason::CaughtTarget);
        }
        PursuitStatus::Pursuing(destination)
    }
}
