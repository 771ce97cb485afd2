//! Aggregated navigation configuration loaded from JSON.
//!
//! Every section falls back to its defaults, so a file only needs to name
//! the values it changes:
//!
//! ```json
//! { "mode": "Continuous", "rig": { "move_duration": 0.4 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aim::continuous::AimSettings;
use crate::aim::discrete::ClickSettings;
use crate::aim::{NavigatorSetup, StepRange};
use crate::chase::ChaseSettings;
use crate::look::LookSettings;
use crate::rig::RigSettings;

/// Which aim front-end drives the rig.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigatorMode {
    /// Click on a waypoint to step to it.
    #[default]
    Discrete,
    /// Look at a neighbour and click to step to it.
    Continuous,
}

/// Every tunable of the navigation and chase systems.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Active aim front-end.
    pub mode: NavigatorMode,
    /// Start waypoint selection.
    pub navigator: NavigatorSetup,
    /// Rig transitions.
    pub rig: RigSettings,
    /// Drag-look.
    pub look: LookSettings,
    /// Click navigation.
    pub click: ClickSettings,
    /// Continuous aiming.
    pub aim: AimSettings,
    /// Chase trigger, spawn and pursuit.
    pub chase: ChaseSettings,
}

/// Problems reading or validating a [`NavConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{}'", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for [`NavConfig`].
    #[error("invalid config JSON")]
    Parse(#[from] serde_json::Error),
    /// A step range has its bounds the wrong way round.
    #[error("{section} step range is inverted: min {min} > max {max}")]
    InvertedStepRange {
        /// Section holding the range.
        section: &'static str,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },
    /// A distance, radius or tolerance is negative or not finite.
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidDistance {
        /// Dotted path of the field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The rig transition duration is not positive.
    #[error("rig.move_duration must be positive (got {0})")]
    NonPositiveDuration(f32),
    /// The aim threshold lies outside `[-1, 1]`.
    #[error("aim.aim_dot_threshold must lie in [-1, 1] (got {0})")]
    DotThresholdOutOfRange(f32),
}

fn check_range(section: &'static str, range: StepRange) -> Result<(), ConfigError> {
    check_distance(section, range.min)?;
    check_distance(section, range.max)?;
    if range.min > range.max {
        return Err(ConfigError::InvertedStepRange {
            section,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

fn check_distance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistance { field, value })
    }
}

impl NavConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error
    /// reported by [`NavConfig::validate`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// as [`NavConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let duration = self.rig.move_duration;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration(duration));
        }
        check_range("click", self.click.step_range)?;
        check_range("aim", self.aim.step_range)?;

        let threshold = self.aim.aim_dot_threshold;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(ConfigError::DotThresholdOutOfRange(threshold));
        }

        let spawn = &self.chase.spawn;
        let pursuit = &self.chase.pursuit;
        let agent = &self.chase.agent;
        [
            ("look.sensitivity", self.look.sensitivity),
            ("click.ray_distance", self.click.ray_distance),
            ("aim.ray_distance", self.aim.ray_distance),
            ("aim.aim_max_distance", self.aim.aim_max_distance),
            ("aim.arrow.distance", self.aim.arrow.distance),
            ("aim.arrow.scale", self.aim.arrow.scale),
            ("chase.spawn.sample_radius", spawn.sample_radius),
            ("chase.spawn.max_snap_distance", spawn.max_snap_distance),
            ("chase.spawn.edge_push", spawn.edge_push),
            ("chase.spawn.resample_radius", spawn.resample_radius),
            ("chase.pursuit.end_distance", pursuit.end_distance),
            ("chase.pursuit.target_sample_radius", pursuit.target_sample_radius),
            ("chase.pursuit.keep_away_from_edge", pursuit.keep_away_from_edge),
            ("chase.pursuit.resample_radius", pursuit.resample_radius),
            ("chase.pursuit.catch_distance", pursuit.catch_distance),
            ("chase.agent.speed", agent.speed),
            ("chase.agent.stopping_distance", agent.stopping_distance),
        ]
        .into_iter()
        .try_for_each(|(field, value)| check_distance(field, value))
    }
}
