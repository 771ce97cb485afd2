//! Ray casters with predetermined answers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aislewalk::raycast::{LayerMask, Ray, RayCaster, RayHit};
use aislewalk::scene::SceneEntity;
use glam::Vec3;

/// Entity id reported for floor hits.
pub const FLOOR: SceneEntity = SceneEntity(0);

/// Ray caster answering from a fixed table of pick rays.
///
/// A ray whose origin matches a scripted origin hits the scripted entity.
/// Every other downward ray hits the horizontal floor at `floor_height`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRayCaster {
    picks: Vec<(Vec3, RayHit)>,
    floor_height: f32,
    casts: Arc<AtomicUsize>,
}

impl ScriptedRayCaster {
    /// Creates a caster with only a floor at `floor_height`.
    pub fn with_floor(floor_height: f32) -> Self {
        Self {
            floor_height,
            ..Self::default()
        }
    }

    /// Rays starting at `origin` hit `entity` at `point`.
    #[must_use]
    pub fn pick(mut self, origin: Vec3, entity: u64, point: Vec3) -> Self {
        self.picks
            .push((origin, RayHit::new(point, Vec3::Y, SceneEntity(entity))));
        self
    }

    /// Origin that [`ScriptedRayCaster::pick_ray`] uses for `entity`.
    pub fn pick_origin(entity: u64) -> Vec3 {
        #[expect(clippy::cast_precision_loss, reason = "Test ids are small.")]
        let x = entity as f32;
        Vec3::new(x, 100.0, 0.0)
    }

    /// Rays from [`ScriptedRayCaster::pick_origin`] hit `entity` at `point`.
    #[must_use]
    pub fn pick_entity(self, entity: u64, point: Vec3) -> Self {
        self.pick(Self::pick_origin(entity), entity, point)
    }

    /// Downward ray aimed at the scripted pick for `entity`.
    pub fn pick_ray(entity: u64) -> Ray {
        Ray::new(Self::pick_origin(entity), Vec3::NEG_Y)
    }

    /// Shared count of casts made so far.
    pub fn cast_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.casts)
    }
}

impl RayCaster for ScriptedRayCaster {
    fn cast(&self, ray: Ray, max_distance: f32, _mask: LayerMask) -> Option<RayHit> {
        self.casts.fetch_add(1, Ordering::SeqCst);
        if let Some((_, hit)) = self.picks.iter().find(|(origin, _)| *origin == ray.origin) {
            return Some(hit.clone());
        }
        let dir = ray.direction.normalize_or_zero();
        if dir.y >= -1e-4 {
            return None;
        }
        let t = (self.floor_height - ray.origin.y) / dir.y;
        (0.0..=max_distance)
            .contains(&t)
            .then(|| RayHit::new(ray.point_at(t), Vec3::Y, FLOOR))
    }
}
