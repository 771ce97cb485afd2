//! Drag-to-look orientation for the rig and its camera.
//!
//! Dragging behaves like grabbing the picture: dragging right turns the view
//! left and dragging up tilts it down. Angles are tracked in degrees, pitch
//! is clamped, and both are wrapped into `(-180, 180]`.

use bevy::prelude::Resource;
use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::vector_math::normalize_angle;
use crate::{DEFAULT_LOOK_SENSITIVITY, DEFAULT_PITCH_MAX, DEFAULT_PITCH_MIN};

/// Which transform receives the pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookMode {
    /// The rig receives both yaw and pitch.
    WholeRig,
    /// The rig receives yaw only; the camera pitches locally under it.
    #[default]
    SplitYawPitch,
}

/// Tunables for drag-look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    /// Degrees turned per unit of pointer travel.
    pub sensitivity: f32,
    /// Lowest pitch in degrees.
    pub pitch_min: f32,
    /// Highest pitch in degrees.
    pub pitch_max: f32,
    /// Transform layout receiving the rotation.
    pub mode: LookMode,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_LOOK_SENSITIVITY,
            pitch_min: DEFAULT_PITCH_MIN,
            pitch_max: DEFAULT_PITCH_MAX,
            mode: LookMode::default(),
        }
    }
}

/// Yaw and pitch state driven by pointer drags.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LookController {
    settings: LookSettings,
    yaw: f32,
    pitch: f32,
}

impl LookController {
    /// Creates a controller looking down `-Z`.
    #[must_use]
    pub const fn new(settings: LookSettings) -> Self {
        Self {
            settings,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Creates a controller initialised from an existing orientation.
    #[must_use]
    pub fn from_rotation(settings: LookSettings, rotation: Quat) -> Self {
        let mut controller = Self::new(settings);
        controller.align_to(rotation);
        controller
    }

    /// Adopts the yaw and pitch of `rotation`, dropping any roll.
    pub fn align_to(&mut self, rotation: Quat) {
        let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
        self.yaw = normalize_angle(yaw.to_degrees());
        self.pitch = self.clamp_pitch(normalize_angle(pitch.to_degrees()));
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        let lo = self.settings.pitch_min.min(self.settings.pitch_max);
        let hi = self.settings.pitch_min.max(self.settings.pitch_max);
        pitch.clamp(lo, hi)
    }

    /// Applies a pointer drag of `delta` units.
    pub fn drag(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let sensitivity = self.settings.sensitivity;
        self.yaw = normalize_angle(self.yaw + delta.x * sensitivity);
        self.pitch = self.clamp_pitch(self.pitch - delta.y * sensitivity);
    }

    /// Yaw in degrees; positive turns left.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees; positive looks up.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Transform layout this controller drives.
    #[must_use]
    pub const fn mode(&self) -> LookMode {
        self.settings.mode
    }

    fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    fn pitch_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }

    /// Rotation to apply to the rig.
    #[must_use]
    pub fn rig_rotation(&self) -> Quat {
        match self.settings.mode {
            LookMode::WholeRig => self.yaw_rotation() * self.pitch_rotation(),
            LookMode::SplitYawPitch => self.yaw_rotation(),
        }
    }

    /// Local rotation to apply to the camera under the rig.
    #[must_use]
    pub fn camera_local_rotation(&self) -> Quat {
        match self.settings.mode {
            LookMode::WholeRig => Quat::IDENTITY,
            LookMode::SplitYawPitch => self.pitch_rotation(),
        }
    }

    /// Combined world rotation of the view.
    #[must_use]
    pub fn view_rotation(&self) -> Quat {
        self.rig_rotation() * self.camera_local_rotation()
    }

    /// Unit forward vector of the view.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new(LookSettings::default())
    }
}
