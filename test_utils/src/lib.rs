//! Utility helpers for tests.
//!
//! Scene builders, a scripted ray caster and an agent host that records what
//! the chase director asks of it.

pub mod agents;
pub mod raycast;
pub mod scenes;
