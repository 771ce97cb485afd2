//! Axis-aligned rectangular walkable surface with straight-line agents.
//!
//! This is the smallest surface that honours the [`NavSurface`] contract: a
//! flat rectangle on the XZ plane at a fixed height. Agents walk straight at
//! their destination; there is no obstacle avoidance and no path finding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::{Vec2, Vec3, Vec3Swizzles};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{AgentHost, NavAgent, NavSurface, SurfaceEdge};

/// Vertical tolerance when deciding whether a point lies on the surface.
const ON_SURFACE_TOLERANCE: f32 = 0.05;

/// Flat walkable rectangle spanning `min..=max` on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSurface {
    /// Lower corner as `(x, z)`.
    pub min: Vec2,
    /// Upper corner as `(x, z)`.
    pub max: Vec2,
    /// Height of the walkable plane.
    #[serde(default)]
    pub height: f32,
}

impl RectSurface {
    /// Creates a surface; the corners may be given in any order.
    #[must_use]
    pub fn new(corner_a: Vec2, corner_b: Vec2, height: f32) -> Self {
        Self {
            min: corner_a.min(corner_b),
            max: corner_a.max(corner_b),
            height,
        }
    }

    /// Closest point of the rectangle to `point`, at surface height.
    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        Vec3::new(
            point.x.clamp(lo.x, hi.x),
            self.height,
            point.z.clamp(lo.y, hi.y),
        )
    }

    /// Returns `true` when `point` lies on the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.is_finite()
            && (point.y - self.height).abs() <= ON_SURFACE_TOLERANCE
            && self.clamp(point).xz() == point.xz()
    }
}

impl NavSurface for RectSurface {
    fn sample_nearest(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        if !point.is_finite() {
            return None;
        }
        let nearest = self.clamp(point);
        (nearest.distance(point) <= radius).then_some(nearest)
    }

    fn find_closest_edge(&self, point: Vec3) -> Option<SurfaceEdge> {
        if !point.is_finite() {
            return None;
        }
        let inside = self.clamp(point);
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        // Fixed order keeps ties deterministic: -X, +X, -Z, +Z.
        let candidates = [
            (inside.x - lo.x, Vec3::new(lo.x, self.height, inside.z), Vec3::X),
            (hi.x - inside.x, Vec3::new(hi.x, self.height, inside.z), Vec3::NEG_X),
            (inside.z - lo.y, Vec3::new(inside.x, self.height, lo.y), Vec3::Z),
            (hi.y - inside.z, Vec3::new(inside.x, self.height, hi.y), Vec3::NEG_Z),
        ];
        candidates
            .into_iter()
            .reduce(|best, next| if next.0 < best.0 { next } else { best })
            .map(|(_, edge_point, normal)| SurfaceEdge {
                point: edge_point,
                normal,
            })
    }
}

/// Agent that walks in a straight line over a [`RectSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RectAgent {
    surface: RectSurface,
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopping_distance: f32,
}

impl RectAgent {
    /// Creates an idle agent at `position`.
    #[must_use]
    pub const fn new(surface: RectSurface, position: Vec3) -> Self {
        Self {
            surface,
            position,
            destination: None,
            speed: 0.0,
            stopping_distance: 0.0,
        }
    }

    /// Travel speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance at which the destination counts as reached.
    #[must_use]
    pub const fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

impl NavAgent for RectAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn set_destination(&mut self, point: Vec3) -> bool {
        if !self.surface.contains(point) {
            return false;
        }
        self.destination = Some(point);
        true
    }

    fn warp_to(&mut self, point: Vec3) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.position = point;
        true
    }

    fn is_on_surface(&self) -> bool {
        self.surface.contains(self.position)
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn advance(&mut self, delta_seconds: f32) {
        let Some(destination) = self.destination else {
            return;
        };
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }
        let offset = destination - self.position;
        let remaining = offset.length();
        if remaining <= self.stopping_distance {
            return;
        }
        let step = (self.speed * delta_seconds).min(remaining);
        self.position += offset / remaining * step;
    }
}

/// Host spawning [`RectAgent`]s on one surface and counting live agents.
#[derive(Debug, Clone)]
pub struct RectAgentHost {
    surface: RectSurface,
    live: Arc<AtomicUsize>,
}

impl RectAgentHost {
    /// Creates a host for `surface`.
    #[must_use]
    pub fn new(surface: RectSurface) -> Self {
        Self {
            surface,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of agents currently alive.
    ///
    /// The handle stays valid after the host is moved into a director.
    #[must_use]
    pub fn live_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live)
    }
}

impl AgentHost for RectAgentHost {
    fn instantiate(&mut self, position: Vec3) -> Box<dyn NavAgent> {
        let alive = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("spawned rect agent at {position} ({alive} alive)");
        Box::new(RectAgent::new(self.surface, position))
    }

    fn destroy(&mut self, agent: Box<dyn NavAgent>) {
        let released = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if released.is_err() {
            debug!("destroyed an agent this host did not count");
        }
        debug!("destroyed rect agent at {}", agent.position());
    }
}
