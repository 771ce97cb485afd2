//! Scene ray-cast service consumed by the aim front-ends.
//!
//! The crate never implements scene queries itself; the host engine supplies
//! a [`RayCaster`] and the front-ends call it with a [`LayerMask`] selecting
//! which objects may be struck.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::SceneEntity;

/// Ray with an origin and a direction.
///
/// The direction does not need to be normalised; implementations normalise
/// it before measuring distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray in world space.
    pub origin: Vec3,
    /// Direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Returns the point `distance` units along the normalised direction.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction.normalize_or_zero() * distance
    }
}

/// Bit set selecting the scene layers a ray may strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask selecting every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Mask selecting no layer.
    pub const NONE: Self = Self(0);

    /// Mask selecting the single layer `index` (0-31).
    ///
    /// Indices past 31 yield [`LayerMask::NONE`].
    #[must_use]
    pub const fn layer(index: u32) -> Self {
        match 1_u32.checked_shl(index) {
            Some(bits) => Self(bits),
            None => Self::NONE,
        }
    }

    /// Returns `true` when `layer` (0-31) is selected.
    #[must_use]
    pub const fn contains(self, layer: u32) -> bool {
        match 1_u32.checked_shl(layer) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Returns the mask, or [`LayerMask::ALL`] when no layer is selected.
    ///
    /// An unconfigured selectable mask would otherwise make every click miss.
    #[must_use]
    pub const fn or_all_if_empty(self) -> Self {
        if self.0 == 0 {
            Self::ALL
        } else {
            self
        }
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Result of a successful ray cast.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray struck.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Object owning the struck collider.
    pub entity: SceneEntity,
    /// Ancestors of `entity`, nearest parent first.
    pub ancestors: Vec<SceneEntity>,
}

impl RayHit {
    /// Creates a hit on `entity` with no ancestors.
    #[must_use]
    pub const fn new(point: Vec3, normal: Vec3, entity: SceneEntity) -> Self {
        Self {
            point,
            normal,
            entity,
            ancestors: Vec::new(),
        }
    }

    /// Sets the ancestor chain, nearest parent first.
    #[must_use]
    pub fn with_ancestors(mut self, ancestors: Vec<SceneEntity>) -> Self {
        self.ancestors = ancestors;
        self
    }
}

/// Scene query returning the first object a ray strikes.
#[cfg_attr(test, mockall::automock)]
pub trait RayCaster: Send + Sync {
    /// Casts `ray` up to `max_distance` against objects on `mask`.
    fn cast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}
