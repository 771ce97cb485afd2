//! Camera-rig motion controller.
//!
//! The rig moves between points with timed linear transitions. A transition
//! is an explicit state object advanced by [`RigMotion::tick`]; starting a new
//! one discards the previous one on the spot. The rig never changes height:
//! the height is captured when the controller is created and every start and
//! end point is flattened onto it.

use bevy::prelude::Resource;
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_MOVE_DURATION;

/// Tunables for the rig motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    /// Seconds taken by one transition.
    pub move_duration: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            move_duration: DEFAULT_MOVE_DURATION,
        }
    }
}

/// In-flight linear transition between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    start: Vec3,
    end: Vec3,
    elapsed: f32,
    duration: f32,
}

impl Transition {
    /// Normalised progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Point the transition started from.
    #[must_use]
    pub const fn start(&self) -> Vec3 {
        self.start
    }

    /// Point the transition ends at.
    #[must_use]
    pub const fn end(&self) -> Vec3 {
        self.end
    }
}

/// What a call to [`RigMotion::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigTick {
    /// No transition was in flight.
    Idle,
    /// The transition advanced and is still running.
    Moving {
        /// Normalised progress after this tick.
        progress: f32,
    },
    /// The transition finished on this tick; the rig sits exactly on `at`.
    Arrived {
        /// Final rig position.
        at: Vec3,
    },
}

/// Owner of the rig position and its transitions.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RigMotion {
    position: Vec3,
    locked_height: f32,
    duration: f32,
    transition: Option<Transition>,
}

impl RigMotion {
    /// Creates an idle rig at `initial_position`.
    ///
    /// The height of `initial_position` becomes the locked height for the
    /// lifetime of the controller.
    #[must_use]
    pub const fn new(initial_position: Vec3, settings: RigSettings) -> Self {
        Self {
            position: initial_position,
            locked_height: initial_position.y,
            duration: settings.move_duration,
            transition: None,
        }
    }

    /// Current rig position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Height captured at start-up.
    #[must_use]
    pub const fn locked_height(&self) -> f32 {
        self.locked_height
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.transition.is_some()
    }

    /// End point of the in-flight transition.
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        self.transition.map(|transition| transition.end)
    }

    /// In-flight transition, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Seconds each transition takes.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    fn lock(&self, point: Vec3) -> Vec3 {
        Vec3::new(point.x, self.locked_height, point.z)
    }

    /// Starts a transition towards `target`.
    ///
    /// Any transition already in flight is dropped without completing and
    /// the new one starts from the current interpolated position. Both ends
    /// are held at the locked height.
    pub fn move_to(&mut self, target: Vec3) {
        if let Some(previous) = self.transition.take() {
            debug!(
                "rig transition to {} cancelled at {:.2}",
                previous.end,
                previous.progress()
            );
        }
        self.transition = Some(Transition {
            start: self.lock(self.position),
            end: self.lock(target),
            elapsed: 0.0,
            duration: self.duration,
        });
    }

    /// Places the rig at `position` immediately, cancelling any transition.
    ///
    /// The locked height still applies.
    pub fn place_at(&mut self, position: Vec3) {
        self.transition = None;
        self.position = self.lock(position);
    }

    /// Advances the in-flight transition by `delta_seconds` of real time.
    ///
    /// Negative or non-finite deltas count as zero. On completion the rig is
    /// snapped exactly onto the end point.
    pub fn tick(&mut self, delta_seconds: f32) -> RigTick {
        let Some(transition) = self.transition.as_mut() else {
            return RigTick::Idle;
        };
        let delta = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };
        transition.elapsed += delta;
        let progress = transition.progress();
        if progress >= 1.0 {
            let at = transition.end;
            self.position = at;
            self.transition = None;
            return RigTick::Arrived { at };
        }
        self.position = transition.start.lerp(transition.end, progress);
        RigTick::Moving { progress }
    }
}
