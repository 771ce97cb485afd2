//! Navigable-surface query service and agent abstraction.
//!
//! The walkable region, its path finding and the movement of agents across
//! it belong to the host engine. This module only names the capabilities the
//! spawn validator and the pursuit controller call. [`rect`] provides a small
//! rectangular implementation for headless runs and tests.

pub mod rect;

use glam::Vec3;
use log::debug;

/// Closest boundary of the walkable surface to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceEdge {
    /// Nearest point on the boundary.
    pub point: Vec3,
    /// Unit normal pointing away from the boundary, into the walkable area.
    pub normal: Vec3,
}

/// Walkable-surface queries supplied by the host engine.
#[cfg_attr(test, mockall::automock)]
pub trait NavSurface: Send + Sync {
    /// Nearest walkable point within `radius` of `point`.
    fn sample_nearest(&self, point: Vec3, radius: f32) -> Option<Vec3>;

    /// Nearest surface boundary to `point` and its outward normal.
    fn find_closest_edge(&self, point: Vec3) -> Option<SurfaceEdge>;
}

/// Agent travelling across the walkable surface.
pub trait NavAgent: Send + Sync {
    /// Current world-space position.
    fn position(&self) -> Vec3;

    /// Destination most recently accepted, if any.
    fn destination(&self) -> Option<Vec3>;

    /// Requests travel towards `point`.
    ///
    /// Returns `false` when the request was refused; the agent then keeps
    /// its previous destination.
    fn set_destination(&mut self, point: Vec3) -> bool;

    /// Places the agent at `point` immediately, without path finding.
    fn warp_to(&mut self, point: Vec3) -> bool;

    /// Returns `true` while the agent stands on the walkable surface.
    fn is_on_surface(&self) -> bool;

    /// Sets the travel speed in world units per second.
    fn set_speed(&mut self, speed: f32);

    /// Sets the distance at which the destination counts as reached.
    fn set_stopping_distance(&mut self, distance: f32);

    /// Advances the agent by `delta_seconds`.
    ///
    /// Engines that move their agents on their own leave this as a no-op.
    fn advance(&mut self, _delta_seconds: f32) {}
}

/// Factory owning the lifetime of pursuing agents.
pub trait AgentHost: Send + Sync {
    /// Creates a new agent at `position`.
    fn instantiate(&mut self, position: Vec3) -> Box<dyn NavAgent>;

    /// Removes `agent` from the scene.
    fn destroy(&mut self, agent: Box<dyn NavAgent>);
}

/// Moves `point` away from the nearest surface edge by `distance`.
///
/// The pushed point is re-sampled within `resample_radius` so it stays on
/// the surface. When no edge is found the point is returned unchanged; when
/// the re-sample fails the pre-push point is kept.
pub fn push_from_edge(
    surface: &dyn NavSurface,
    point: Vec3,
    distance: f32,
    resample_radius: f32,
) -> Vec3 {
    let Some(edge) = surface.find_closest_edge(point) else {
        debug!("no surface edge near {point}; keeping point");
        return point;
    };
    let pushed = point + edge.normal * distance;
    surface
        .sample_nearest(pushed, resample_radius)
        .unwrap_or_else(|| {
            debug!("pushed point {pushed} left the surface; keeping {point}");
            point
        })
}
