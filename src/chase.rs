//! One-shot chase trigger and lifetime of the pursuing agent.
//!
//! The director owns at most one live agent. Firing the trigger validates
//! the spawn point, replaces any previous agent and configures the new one;
//! every tick it advances and retargets the agent until the pursuit ends,
//! at which point the listener hears about it once and the agent is removed.

use std::fmt;

use bevy::prelude::Resource;
use glam::Vec3;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::pursuit::{ChaseEndReason, Pursuit, PursuitSettings, PursuitStatus};
use crate::spawn::{SpawnError, SpawnSettings, SpawnValidator};
use crate::surface::{AgentHost, NavAgent, NavSurface};
use crate::{DEFAULT_CHASE_SPEED, DEFAULT_STOPPING_DISTANCE};

/// Movement tunables applied to each spawned agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Distance at which a destination counts as reached.
    pub stopping_distance: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_CHASE_SPEED,
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
        }
    }
}

/// Tunables for the chase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseSettings {
    /// Spawn validation.
    pub spawn: SpawnSettings,
    /// Retargeting and termination.
    pub pursuit: PursuitSettings,
    /// Agent movement.
    pub agent: AgentSettings,
    /// Ignore the trigger after it first fires until [`ChaseDirector::reset`].
    pub spawn_only_once: bool,
}

impl Default for ChaseSettings {
    fn default() -> Self {
        Self {
            spawn: SpawnSettings::default(),
            pursuit: PursuitSettings::default(),
            agent: AgentSettings::default(),
            spawn_only_once: true,
        }
    }
}

/// Receiver of the upward "chase ended" signal.
pub trait ChaseListener {
    /// Called once when a chase ends.
    fn chase_ended(&mut self, reason: ChaseEndReason);
}

impl<F> ChaseListener for F
where
    F: FnMut(ChaseEndReason),
{
    fn chase_ended(&mut self, reason: ChaseEndReason) {
        self(reason);
    }
}

/// Result of [`ChaseDirector::trigger_once`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    /// The latch was already set; nothing happened.
    AlreadyFired,
    /// An agent was spawned at the contained position.
    Started(Vec3),
    /// The spawn was abandoned.
    Failed(SpawnError),
}

/// Owner of the trigger latch and the live agent.
#[derive(Resource)]
pub struct ChaseDirector {
    host: Box<dyn AgentHost>,
    settings: ChaseSettings,
    validator: SpawnValidator,
    pursuit: Pursuit,
    spawn_point: Vec3,
    fired: bool,
    agent: Option<Box<dyn NavAgent>>,
}

impl fmt::Debug for ChaseDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaseDirector")
            .field("settings", &self.settings)
            .field("spawn_point", &self.spawn_point)
            .field("end_point", &self.pursuit.end_point())
            .field("fired", &self.fired)
            .field("agent", &self.agent.as_ref().map(|agent| agent.position()))
            .finish_non_exhaustive()
    }
}

impl ChaseDirector {
    /// Creates an idle director.
    #[must_use]
    pub fn new(
        host: Box<dyn AgentHost>,
        settings: ChaseSettings,
        spawn_point: Vec3,
        end_point: Option<Vec3>,
    ) -> Self {
        Self {
            host,
            settings,
            validator: SpawnValidator::new(settings.spawn),
            pursuit: Pursuit::new(settings.pursuit, end_point),
            spawn_point,
            fired: false,
            agent: None,
        }
    }

    /// Fires the trigger unless it is latched.
    pub fn trigger_once(&mut self, surface: &dyn NavSurface) -> TriggerOutcome {
        if self.settings.spawn_only_once && self.fired {
            info!("chase already triggered; reset to run it again");
            return TriggerOutcome::AlreadyFired;
        }
        self.fired = true;
        match self.start_chase(surface) {
            Ok(position) => TriggerOutcome::Started(position),
            Err(err) => TriggerOutcome::Failed(err),
        }
    }

    /// Spawns a fresh agent regardless of the latch.
    ///
    /// Any live agent is removed first, even when validation then fails.
    ///
    /// # Errors
    ///
    /// Propagates [`SpawnError`] from spawn validation; no agent exists
    /// afterwards.
    pub fn start_chase(&mut self, surface: &dyn NavSurface) -> Result<Vec3, SpawnError> {
        self.despawn();
        let position = self
            .validator
            .try_spawn(surface, self.spawn_point)
            .inspect_err(|err| error!("chase spawn abandoned: {err}"))?;

        let mut agent = self.host.instantiate(position);
        if !agent.warp_to(position) {
            error!("agent could not be placed at {position}");
        }
        agent.set_speed(self.settings.agent.speed);
        agent.set_stopping_distance(self.settings.agent.stopping_distance);
        self.agent = Some(agent);
        info!("chase started from {position}");
        Ok(position)
    }

    /// Advances the live agent and runs one pursuit tick.
    ///
    /// Returns `None` when no agent is alive. When the pursuit ends the agent
    /// is removed and `listener` is told once.
    pub fn tick(
        &mut self,
        surface: &dyn NavSurface,
        target: Vec3,
        delta_seconds: f32,
        listener: &mut dyn ChaseListener,
    ) -> Option<PursuitStatus> {
        let agent = self.agent.as_mut()?;
        agent.advance(delta_seconds);
        let status = self.pursuit.tick(surface, agent.as_mut(), target);
        if let PursuitStatus::Ended(reason) = status {
            self.despawn();
            info!("chase ended: {reason}");
            listener.chase_ended(reason);
        }
        Some(status)
    }

    /// Clears the latch and removes the live agent.
    pub fn reset(&mut self) {
        self.fired = false;
        self.despawn();
        info!("chase reset");
    }

    fn despawn(&mut self) {
        if let Some(agent) = self.agent.take() {
            self.host.destroy(agent);
        }
    }

    /// Returns `true` while an agent is alive.
    #[must_use]
    pub const fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Returns `true` once the trigger has fired and until reset.
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// The live agent, if any.
    #[must_use]
    pub fn agent(&self) -> Option<&dyn NavAgent> {
        self.agent.as_deref()
    }

    /// Marker the agent is spawned near.
    #[must_use]
    pub const fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    /// Point whose proximity ends the chase.
    #[must_use]
    pub const fn end_point(&self) -> Option<Vec3> {
        self.pursuit.end_point()
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &ChaseSettings {
        &self.settings
    }
}
