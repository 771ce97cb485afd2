//! Spawn validation for the pursuing agent.
//!
//! A fixed spawn marker rarely sits exactly on the walkable surface, so the
//! validator snaps it to the nearest walkable point, refuses snaps that
//! wander too far, and nudges the result away from the surface boundary.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::{push_from_edge, NavSurface};
use crate::{
    DEFAULT_MAX_SNAP_DISTANCE, DEFAULT_SPAWN_EDGE_PUSH, DEFAULT_SPAWN_SAMPLE_RADIUS,
    EDGE_RESAMPLE_RADIUS, SPAWN_QUERY_LIFT,
};

/// Tunables for spawn validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Search radius around the lifted spawn point.
    pub sample_radius: f32,
    /// Largest accepted distance between the spawn point and its snap.
    pub max_snap_distance: f32,
    /// Distance to move away from the nearest edge; zero disables the push.
    pub edge_push: f32,
    /// Height added to the spawn point before sampling.
    pub query_lift: f32,
    /// Radius used to re-validate the pushed point.
    pub resample_radius: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            sample_radius: DEFAULT_SPAWN_SAMPLE_RADIUS,
            max_snap_distance: DEFAULT_MAX_SNAP_DISTANCE,
            edge_push: DEFAULT_SPAWN_EDGE_PUSH,
            query_lift: SPAWN_QUERY_LIFT,
            resample_radius: EDGE_RESAMPLE_RADIUS,
        }
    }
}

/// Why no agent could be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpawnError {
    /// Nothing walkable lies within the sample radius.
    #[error("no walkable surface within {radius:.2} of spawn point {spawn_point}")]
    NoWalkableSurface {
        /// Spawn marker position.
        spawn_point: Vec3,
        /// Radius searched.
        radius: f32,
    },
    /// The nearest walkable point is too far from the marker.
    #[error("walkable point drifted {drift:.2} from spawn point (limit {limit:.2})")]
    SpawnDriftTooFar {
        /// Distance between marker and walkable point.
        drift: f32,
        /// Configured tolerance.
        limit: f32,
    },
}

/// Stateless spawn-point validator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnValidator {
    settings: SpawnSettings,
}

impl SpawnValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new(settings: SpawnSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    /// Finds the walkable position at which to spawn for `spawn_point`.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::NoWalkableSurface`] when sampling finds nothing
    /// and [`SpawnError::SpawnDriftTooFar`] when the sampled point lies
    /// beyond `max_snap_distance` of the marker.
    ///
    /// # Examples
    /// ```
    /// use aislewalk::spawn::{SpawnSettings, SpawnValidator};
    /// use aislewalk::surface::rect::RectSurface;
    /// use glam::{Vec2, Vec3};
    ///
    /// let floor = RectSurface::new(Vec2::ZERO, Vec2::splat(10.0), 0.0);
    /// let validator = SpawnValidator::new(SpawnSettings::default());
    /// // Close to the southern edge, so the result is pushed inward by 0.5.
    /// let spot = validator.try_spawn(&floor, Vec3::new(5.0, 0.0, 0.25));
    /// assert_eq!(spot, Ok(Vec3::new(5.0, 0.0, 0.75)));
    /// ```
    pub fn try_spawn(&self, surface: &dyn NavSurface, spawn_point: Vec3) -> Result<Vec3, SpawnError> {
        let settings = &self.settings;
        let query = spawn_point + Vec3::Y * settings.query_lift;
        let walkable = surface
            .sample_nearest(query, settings.sample_radius)
            .ok_or(SpawnError::NoWalkableSurface {
                spawn_point,
                radius: settings.sample_radius,
            })?;

        let drift = walkable.distance(spawn_point);
        if drift > settings.max_snap_distance {
            return Err(SpawnError::SpawnDriftTooFar {
                drift,
                limit: settings.max_snap_distance,
            });
        }

        let spot = if settings.edge_push > 0.0 {
            push_from_edge(surface, walkable, settings.edge_push, settings.resample_radius)
        } else {
            walkable
        };
        debug!("spawn point {spawn_point} validated at {spot} (drift {drift:.2})");
        Ok(spot)
    }
}
