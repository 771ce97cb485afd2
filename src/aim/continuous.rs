//! Continuous aim navigation with a direction arrow.
//!
//! Every tick the centre-of-view ray is cast against the floor. The
//! neighbour of the current waypoint nearest to that floor point becomes the
//! candidate, provided it is close enough to the aim point and roughly in
//! front of the view. An [`ArrowMarker`] on the floor points at the candidate
//! and a primary click commits the step.

use glam::{Quat, Vec3};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::{
    commit_step, place_at_start, trace_outcome, NavigatorError, NavigatorSetup, StepOutcome,
    StepRange, StepRejection,
};
use crate::graph::{NodeId, PointGraph};
use crate::raycast::{LayerMask, Ray, RayCaster};
use crate::rig::RigMotion;
use crate::vector_math::{horizontal_alignment, horizontal_direction, yaw_towards};
use crate::{
    ARROW_FLOOR_PROBE_DISTANCE, ARROW_FLOOR_PROBE_LIFT, DEFAULT_AIM_DOT_THRESHOLD,
    DEFAULT_AIM_MAX_DISTANCE, DEFAULT_AIM_RAY_DISTANCE, DEFAULT_ARROW_DISTANCE,
    DEFAULT_ARROW_HEIGHT, DEFAULT_ARROW_SCALE,
};

/// Placement of the direction arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowSettings {
    /// Horizontal distance in front of the view.
    pub distance: f32,
    /// Height above the floor.
    pub height: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            distance: DEFAULT_ARROW_DISTANCE,
            height: DEFAULT_ARROW_HEIGHT,
            scale: DEFAULT_ARROW_SCALE,
        }
    }
}

/// Tunables for continuous aiming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimSettings {
    /// Accepted step distances.
    pub step_range: StepRange,
    /// Layers treated as floor.
    pub floor_mask: LayerMask,
    /// Longest centre-of-view ray.
    pub ray_distance: f32,
    /// Farthest a waypoint may be from the aim point.
    pub aim_max_distance: f32,
    /// Minimum horizontal alignment with the view, in `[-1, 1]`.
    pub aim_dot_threshold: f32,
    /// Arrow placement.
    pub arrow: ArrowSettings,
    /// Hide the arrow while the rig is moving.
    pub hide_arrow_while_moving: bool,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            step_range: StepRange::default(),
            floor_mask: LayerMask::ALL,
            ray_distance: DEFAULT_AIM_RAY_DISTANCE,
            aim_max_distance: DEFAULT_AIM_MAX_DISTANCE,
            aim_dot_threshold: DEFAULT_AIM_DOT_THRESHOLD,
            arrow: ArrowSettings::default(),
            hide_arrow_while_moving: true,
        }
    }
}

/// World pose of the view the player aims with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    /// Eye position.
    pub position: Vec3,
    /// World rotation; forward is `-Z`.
    pub rotation: Quat,
}

impl ViewPose {
    /// Creates a pose.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Unit forward vector.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Ray through the centre of the view.
    #[must_use]
    pub fn centre_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }
}

/// Visual state of the direction arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowMarker {
    /// Whether the arrow is drawn.
    pub visible: bool,
    /// World position.
    pub position: Vec3,
    /// Yaw-only rotation facing the candidate.
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
}

impl ArrowMarker {
    fn hidden(scale: f32) -> Self {
        Self {
            visible: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale,
        }
    }
}

/// Continuous front-end tracking the current and the aimed-at waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AimNavigator {
    settings: AimSettings,
    current: NodeId,
    aimed: Option<NodeId>,
    arrow: ArrowMarker,
    start_rotation: Option<Quat>,
}

impl AimNavigator {
    /// Creates the navigator and places the rig on the start waypoint.
    ///
    /// # Errors
    ///
    /// Fails when the graph is empty or the named start waypoint is missing.
    pub fn new(
        graph: &PointGraph,
        rig: &mut RigMotion,
        setup: &NavigatorSetup,
        settings: AimSettings,
    ) -> Result<Self, NavigatorError> {
        let placement = place_at_start(graph, rig, setup)?;
        Ok(Self {
            settings,
            current: placement.node,
            aimed: None,
            arrow: ArrowMarker::hidden(settings.arrow.scale),
            start_rotation: placement.rotation,
        })
    }

    /// Waypoint the rig stands on or is travelling to.
    #[must_use]
    pub const fn current(&self) -> NodeId {
        self.current
    }

    /// Candidate resolved by the last [`AimNavigator::update`].
    #[must_use]
    pub const fn aimed(&self) -> Option<NodeId> {
        self.aimed
    }

    /// Arrow state computed by the last [`AimNavigator::update`].
    #[must_use]
    pub const fn arrow(&self) -> &ArrowMarker {
        &self.arrow
    }

    /// Orientation adopted from the start waypoint.
    #[must_use]
    pub const fn start_rotation(&self) -> Option<Quat> {
        self.start_rotation
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &AimSettings {
        &self.settings
    }

    /// Resolves the candidate for this tick and refreshes the arrow.
    pub fn update(
        &mut self,
        view: ViewPose,
        raycaster: &dyn RayCaster,
        graph: &PointGraph,
        rig: &RigMotion,
    ) -> Option<NodeId> {
        self.aimed = self.resolve_aim(view, raycaster, graph);
        self.arrow = self.place_arrow(view, raycaster, graph, rig);
        self.aimed
    }

    /// Finds the neighbour the view is aiming at, if any.
    ///
    /// Only neighbours of the current waypoint are considered. Equidistant
    /// neighbours resolve to the lowest node index.
    #[must_use]
    pub fn resolve_aim(
        &self,
        view: ViewPose,
        raycaster: &dyn RayCaster,
        graph: &PointGraph,
    ) -> Option<NodeId> {
        let mask = self.settings.floor_mask.or_all_if_empty();
        let hit = raycaster.cast(view.centre_ray(), self.settings.ray_distance, mask)?;

        let (best_distance, nearest) = graph
            .neighbours(self.current)
            .iter()
            .filter_map(|&id| graph.node(id))
            .map(|node| (OrderedFloat(node.position().distance(hit.point)), node))
            .min_by_key(|&(distance, node)| (distance, node.id()))?;

        if best_distance.into_inner() > self.settings.aim_max_distance {
            return None;
        }
        let alignment = horizontal_alignment(view.forward(), nearest.position() - view.position)?;
        if alignment < self.settings.aim_dot_threshold {
            return None;
        }
        Some(nearest.id())
    }

    fn place_arrow(
        &self,
        view: ViewPose,
        raycaster: &dyn RayCaster,
        graph: &PointGraph,
        rig: &RigMotion,
    ) -> ArrowMarker {
        let arrow = &self.settings.arrow;
        let hide = self.settings.hide_arrow_while_moving && rig.is_busy();
        let Some(target) = self.aimed.and_then(|id| graph.node(id)) else {
            return ArrowMarker::hidden(arrow.scale);
        };
        if hide {
            return ArrowMarker::hidden(arrow.scale);
        }

        let ahead = horizontal_direction(view.forward()).unwrap_or(Vec3::ZERO);
        let mut position = view.position + ahead * arrow.distance;
        let probe = Ray::new(position + Vec3::Y * ARROW_FLOOR_PROBE_LIFT, Vec3::NEG_Y);
        let floor = raycaster.cast(
            probe,
            ARROW_FLOOR_PROBE_DISTANCE,
            self.settings.floor_mask.or_all_if_empty(),
        );
        position.y = floor.map_or(rig.position().y, |hit| hit.point.y) + arrow.height;

        let rotation = yaw_towards(target.position() - position).unwrap_or(self.arrow.rotation);
        ArrowMarker {
            visible: true,
            position,
            rotation,
            scale: arrow.scale,
        }
    }

    /// Commits a step to the aimed-at waypoint.
    ///
    /// Nothing happens while the rig is moving or when nothing is aimed at.
    pub fn on_primary(&mut self, graph: &PointGraph, rig: &mut RigMotion) -> StepOutcome {
        let Some(candidate) = self.aimed else {
            return reject(graph, StepRejection::NoCandidate);
        };
        if rig.is_busy() {
            return reject(graph, StepRejection::Busy);
        }
        commit_step(graph, rig, &mut self.current, candidate, self.settings.step_range)
    }
}

fn reject(graph: &PointGraph, rejection: StepRejection) -> StepOutcome {
    let outcome = StepOutcome::Rejected(rejection);
    trace_outcome(graph, &outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::{MockRayCaster, RayHit};
    use crate::rig::RigSettings;
    use crate::scene::{SceneContainer, SceneEntity, SceneObject};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);

    /// Start at the origin with neighbours ahead (-Z), to the right (+X) and
    /// behind (+Z); a non-neighbour sits ahead-left.
    #[fixture]
    fn graph() -> PointGraph {
        PointGraph::from_container(&SceneContainer::new(
            "Waypoints",
            vec![
                SceneObject::new("Start", 1, Vec3::ZERO)
                    .with_neighbours(["Ahead", "Right", "Behind"]),
                SceneObject::new("Ahead", 2, Vec3::new(0.0, 0.0, -1.5)),
                SceneObject::new("Right", 3, Vec3::new(1.5, 0.0, 0.0)),
                SceneObject::new("Behind", 4, Vec3::new(0.0, 0.0, 1.5)),
                SceneObject::new("Stranger", 5, Vec3::new(-0.3, 0.0, -1.4)),
            ],
        ))
    }

    fn rig() -> RigMotion {
        RigMotion::new(EYE, RigSettings::default())
    }

    /// Floor at y = 0: the centre ray lands at `aim_point`, the arrow probe
    /// lands straight below its origin.
    fn floor_caster(aim_point: Vec3) -> MockRayCaster {
        let mut caster = MockRayCaster::new();
        caster.expect_cast().returning(move |ray, _, _| {
            let point = if ray.direction == Vec3::NEG_Y {
                Vec3::new(ray.origin.x, 0.0, ray.origin.z)
            } else {
                aim_point
            };
            Some(RayHit::new(point, Vec3::Y, SceneEntity(1000)))
        });
        caster
    }

    fn navigator(graph: &PointGraph, rig: &mut RigMotion) -> AimNavigator {
        AimNavigator::new(graph, rig, &NavigatorSetup::default(), AimSettings::default())
            .expect("navigator should build")
    }

    fn looking(rotation: Quat) -> ViewPose {
        ViewPose::new(EYE, rotation)
    }

    #[rstest]
    fn aiming_ahead_selects_forward_neighbour(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        let caster = floor_caster(Vec3::new(0.0, 0.0, -1.3));
        let aimed = nav.update(looking(Quat::IDENTITY), &caster, &graph, &rig);
        assert_eq!(aimed, graph.find_by_name("Ahead").map(|n| n.id()));

        let arrow = nav.arrow();
        assert!(arrow.visible);
        assert_relative_eq!(arrow.position.z, -DEFAULT_ARROW_DISTANCE, epsilon = 1e-5);
        assert_relative_eq!(arrow.position.y, DEFAULT_ARROW_HEIGHT, epsilon = 1e-6);
        let facing = arrow.rotation * Vec3::NEG_Z;
        assert!(facing.z < -0.99, "arrow faces {facing:?}");
    }

    #[rstest]
    fn non_neighbours_are_never_candidates(graph: PointGraph) {
        let mut rig = rig();
        let nav = navigator(&graph, &mut rig);
        // Closest to the stranger but still within reach of "Ahead".
        let caster = floor_caster(Vec3::new(-0.3, 0.0, -1.4));
        let aimed = nav.resolve_aim(looking(Quat::IDENTITY), &caster, &graph);
        assert_eq!(aimed, graph.find_by_name("Ahead").map(|n| n.id()));
    }

    #[rstest]
    fn aim_point_far_from_every_neighbour_selects_nothing(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        let caster = floor_caster(Vec3::new(0.0, 0.0, -8.0));
        assert!(nav.update(looking(Quat::IDENTITY), &caster, &graph, &rig).is_none());
        assert!(!nav.arrow().visible);
    }

    #[rstest]
    fn candidate_behind_the_view_is_rejected(graph: PointGraph) {
        let mut rig = rig();
        let nav = navigator(&graph, &mut rig);
        // The aim point is near "Right" but the view faces -Z, so the
        // horizontal alignment with "Right" is zero.
        let caster = floor_caster(Vec3::new(1.4, 0.0, 0.0));
        assert!(nav
            .resolve_aim(looking(Quat::IDENTITY), &caster, &graph)
            .is_none());
    }

    #[rstest]
    fn equidistant_neighbours_resolve_to_lowest_index() {
        let graph = PointGraph::from_container(&SceneContainer::new(
            "Waypoints",
            vec![
                SceneObject::new("Start", 1, Vec3::ZERO).with_neighbours(["B", "A"]),
                SceneObject::new("A", 2, Vec3::new(-0.5, 0.0, -1.5)),
                SceneObject::new("B", 3, Vec3::new(0.5, 0.0, -1.5)),
            ],
        ));
        let mut rig = rig();
        let nav = navigator(&graph, &mut rig);
        let caster = floor_caster(Vec3::new(0.0, 0.0, -1.5));
        for _ in 0..3 {
            let aimed = nav.resolve_aim(looking(Quat::IDENTITY), &caster, &graph);
            assert_eq!(aimed, Some(NodeId(1)));
        }
    }

    #[rstest]
    fn missing_floor_falls_back_to_rig_height(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        let mut caster = MockRayCaster::new();
        caster.expect_cast().returning(|ray, _, _| {
            (ray.direction != Vec3::NEG_Y)
                .then(|| RayHit::new(Vec3::new(0.0, 0.0, -1.4), Vec3::Y, SceneEntity(1000)))
        });
        nav.update(looking(Quat::IDENTITY), &caster, &graph, &rig);
        assert_relative_eq!(nav.arrow().position.y, EYE.y + DEFAULT_ARROW_HEIGHT);
    }

    #[rstest]
    fn click_commits_then_busy_rig_blocks(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        let caster = floor_caster(Vec3::new(0.0, 0.0, -1.4));
        nav.update(looking(Quat::IDENTITY), &caster, &graph, &rig);
        assert!(nav.on_primary(&graph, &mut rig).moved());
        assert!(rig.is_busy());
        assert_eq!(
            nav.on_primary(&graph, &mut rig),
            StepOutcome::Rejected(StepRejection::Busy)
        );
    }

    #[rstest]
    fn arrow_hides_while_rig_moves(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        rig.move_to(Vec3::new(0.0, 0.0, -0.5));
        let caster = floor_caster(Vec3::new(0.0, 0.0, -1.4));
        assert!(nav.update(looking(Quat::IDENTITY), &caster, &graph, &rig).is_some());
        assert!(!nav.arrow().visible);
    }

    #[rstest]
    fn click_without_candidate_does_nothing(graph: PointGraph) {
        let mut rig = rig();
        let mut nav = navigator(&graph, &mut rig);
        assert_eq!(
            nav.on_primary(&graph, &mut rig),
            StepOutcome::Rejected(StepRejection::NoCandidate)
        );
        assert!(!rig.is_busy());
    }
}
