//! Bevy plugin wiring navigation and the chase into an `App`.
//!
//! The embedding application supplies the scene services and the rig:
//!
//! - [`NavigationServices`] with the ray caster and walkable surface;
//! - a [`RigMotion`] resource positioned at eye height;
//! - either a built [`PointGraph`] or a [`WaypointContainer`] to build it
//!   from on start-up;
//! - optionally a [`ChaseDirector`] when the scene has a chase.
//!
//! Each frame it writes pointer state into [`PointerInput`]. The plugin runs
//! look, aim resolution, rig motion and the chase in that order, then mirrors
//! the results onto entities tagged with [`RigBody`], [`RigCamera`] and
//! [`NavArrow`].

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{error, info, warn};

use crate::aim::continuous::{AimNavigator, ArrowMarker, ViewPose};
use crate::aim::discrete::ClickNavigator;
use crate::aim::StepOutcome;
use crate::chase::{ChaseDirector, TriggerOutcome};
use crate::config::{NavConfig, NavigatorMode};
use crate::graph::{NodeId, PointGraph};
use crate::look::LookController;
use crate::pursuit::ChaseEndReason;
use crate::raycast::{Ray, RayCaster};
use crate::rig::{RigMotion, RigTick};
use crate::scene::SceneContainer;
use crate::surface::NavSurface;

/// Pointer state for the current frame, written by the embedding app.
///
/// `primary_pressed` and `drag_delta` are consumed each frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Ray from the camera through the pointer.
    pub ray: Option<Ray>,
    /// The primary button went down this frame.
    pub primary_pressed: bool,
    /// The secondary (look) button is held.
    pub secondary_held: bool,
    /// Pointer travel since the previous frame.
    pub drag_delta: Vec2,
}

/// Scene queries provided by the host engine.
#[derive(Resource)]
pub struct NavigationServices {
    /// Ray casts for clicks, aiming and the arrow floor probe.
    pub raycaster: Box<dyn RayCaster>,
    /// Walkable-surface queries for spawning and pursuit.
    pub surface: Box<dyn NavSurface>,
}

/// Scene container the [`PointGraph`] is built from when still empty.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaypointContainer(pub SceneContainer);

/// Position the pursuer chases; the rig position when unset.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ChaseTarget(pub Option<Vec3>);

/// Active aim front-end.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum Navigator {
    /// Click navigation.
    Discrete(ClickNavigator),
    /// Continuous aiming with the direction arrow.
    Continuous(AimNavigator),
}

impl Navigator {
    /// Waypoint the rig stands on or is travelling to.
    #[must_use]
    pub const fn current(&self) -> NodeId {
        match self {
            Self::Discrete(nav) => nav.current(),
            Self::Continuous(nav) => nav.current(),
        }
    }

    /// Arrow state; always hidden in discrete mode.
    #[must_use]
    pub fn arrow(&self) -> Option<ArrowMarker> {
        match self {
            Self::Discrete(_) => None,
            Self::Continuous(nav) => Some(*nav.arrow()),
        }
    }
}

/// Outcome of the most recent primary press.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct LastStep(pub Option<StepOutcome>);

/// Marker for the entity carrying the rig position and yaw.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct RigBody;

/// Marker for the camera entity parented under [`RigBody`].
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct RigCamera;

/// Direction arrow shown by continuous aiming.
///
/// The renderer should draw the entity only while `visible` is set.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct NavArrow {
    /// Whether the arrow should be drawn.
    pub visible: bool,
}

/// Request to fire the one-shot chase trigger.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ChaseTriggerRequest;

/// Request to clear the chase latch and remove the pursuer.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ChaseResetRequest;

/// Raised once when a chase finishes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseEnded {
    /// Why the chase finished.
    pub reason: ChaseEndReason,
}

/// Plugin installing the navigation systems.
#[derive(Debug, Clone, Default)]
pub struct NavigationPlugin {
    /// Tunables for every subsystem.
    pub config: NavConfig,
}

impl NavigationPlugin {
    /// Creates the plugin with `config`.
    #[must_use]
    pub const fn new(config: NavConfig) -> Self {
        Self { config }
    }
}

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
        app.insert_resource(LookController::new(self.config.look));
        app.init_resource::<PointerInput>();
        app.init_resource::<ChaseTarget>();
        app.init_resource::<PointGraph>();
        app.init_resource::<LastStep>();
        app.add_observer(handle_chase_trigger);
        app.add_observer(handle_chase_reset);
        app.add_observer(log_chase_ended);
        app.add_systems(Startup, install_navigator);
        app.add_systems(
            Update,
            (
                apply_drag_look,
                resolve_aim,
                advance_rig,
                drive_chase,
                sync_rig_body,
                sync_rig_camera,
                sync_nav_arrow,
            )
                .chain(),
        );
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn install_navigator(
    mut commands: Commands,
    config: Res<NavConfig>,
    container: Option<Res<WaypointContainer>>,
    mut graph: ResMut<PointGraph>,
    rig_motion: Option<ResMut<RigMotion>>,
    mut look: ResMut<LookController>,
) {
    if let Some(waypoints) = container {
        graph.ensure_built(&waypoints.0);
    }
    let Some(mut rig) = rig_motion else {
        error!("navigation disabled: no RigMotion resource");
        return;
    };

    let built = match config.mode {
        NavigatorMode::Discrete => {
            ClickNavigator::new(&graph, &mut rig, &config.navigator, config.click).map(|nav| {
                let rotation = nav.start_rotation();
                (Navigator::Discrete(nav), rotation)
            })
        }
        NavigatorMode::Continuous => {
            AimNavigator::new(&graph, &mut rig, &config.navigator, config.aim).map(|nav| {
                let rotation = nav.start_rotation();
                (Navigator::Continuous(nav), rotation)
            })
        }
    };

    match built {
        Ok((navigator, rotation)) => {
            if let Some(rotation) = rotation {
                look.align_to(rotation);
            }
            info!(
                "{:?} navigation ready with {} waypoints",
                config.mode,
                graph.len()
            );
            commands.insert_resource(navigator);
        }
        Err(err) => error!("navigation disabled: {err}"),
    }
}

fn apply_drag_look(mut pointer: ResMut<PointerInput>, mut look: ResMut<LookController>) {
    let delta = std::mem::take(&mut pointer.drag_delta);
    if pointer.secondary_held && delta != Vec2::ZERO {
        look.drag(delta);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn resolve_aim(
    mut pointer: ResMut<PointerInput>,
    navigator: Option<ResMut<Navigator>>,
    services: Option<Res<NavigationServices>>,
    graph: Res<PointGraph>,
    rig_motion: Option<ResMut<RigMotion>>,
    look: Res<LookController>,
    mut last: ResMut<LastStep>,
) {
    let pressed = std::mem::take(&mut pointer.primary_pressed);
    let (Some(mut active), Some(scene), Some(mut rig)) = (navigator, services, rig_motion) else {
        return;
    };

    let outcome = match &mut *active {
        Navigator::Discrete(nav) => {
            if !pressed || pointer.secondary_held {
                return;
            }
            let Some(ray) = pointer.ray else {
                warn!("primary press without a pointer ray");
                return;
            };
            nav.on_primary(ray, scene.raycaster.as_ref(), &graph, &mut rig)
        }
        Navigator::Continuous(nav) => {
            let view = ViewPose::new(rig.position(), look.view_rotation());
            nav.update(view, scene.raycaster.as_ref(), &graph, &rig);
            if !pressed {
                return;
            }
            nav.on_primary(&graph, &mut rig)
        }
    };
    last.0 = Some(outcome);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn advance_rig(time: Res<Time<Real>>, rig_motion: Option<ResMut<RigMotion>>) {
    let Some(mut rig) = rig_motion else {
        return;
    };
    if let RigTick::Arrived { at } = rig.tick(time.delta_secs()) {
        log::debug!("rig arrived at {at}");
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn drive_chase(
    mut commands: Commands,
    time: Res<Time<Real>>,
    director: Option<ResMut<ChaseDirector>>,
    services: Option<Res<NavigationServices>>,
    target: Res<ChaseTarget>,
    rig: Option<Res<RigMotion>>,
) {
    let (Some(mut chase), Some(scene)) = (director, services) else {
        return;
    };
    if !chase.has_agent() {
        return;
    }
    let Some(chased) = target.0.or_else(|| rig.map(|motion| motion.position())) else {
        return;
    };

    let mut ended = None;
    let mut listener = |reason: ChaseEndReason| ended = Some(reason);
    chase.tick(
        scene.surface.as_ref(),
        chased,
        time.delta_secs(),
        &mut listener,
    );
    if let Some(reason) = ended {
        commands.trigger(ChaseEnded { reason });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn handle_chase_trigger(
    _event: On<ChaseTriggerRequest>,
    director: Option<ResMut<ChaseDirector>>,
    services: Option<Res<NavigationServices>>,
) {
    let (Some(mut chase), Some(scene)) = (director, services) else {
        error!("chase trigger ignored: chase director or services missing");
        return;
    };
    if let TriggerOutcome::Failed(err) = chase.trigger_once(scene.surface.as_ref()) {
        warn!("chase trigger failed: {err}");
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn handle_chase_reset(_event: On<ChaseResetRequest>, director: Option<ResMut<ChaseDirector>>) {
    if let Some(mut chase) = director {
        chase.reset();
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_chase_ended(event: On<ChaseEnded>) {
    info!("chase ended: {}", event.event().reason);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_rig_body(
    rig_motion: Option<Res<RigMotion>>,
    look: Res<LookController>,
    mut bodies: Query<&mut Transform, With<RigBody>>,
) {
    let Some(rig) = rig_motion else {
        return;
    };
    for mut transform in &mut bodies {
        transform.translation = rig.position();
        transform.rotation = look.rig_rotation();
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_rig_camera(look: Res<LookController>, mut cameras: Query<&mut Transform, With<RigCamera>>) {
    for mut transform in &mut cameras {
        transform.rotation = look.camera_local_rotation();
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_nav_arrow(
    navigator: Option<Res<Navigator>>,
    mut arrows: Query<(&mut Transform, &mut NavArrow)>,
) {
    let marker = navigator.as_deref().and_then(Navigator::arrow);
    for (mut transform, mut arrow) in &mut arrows {
        let Some(shown) = marker.filter(|state| state.visible) else {
            arrow.visible = false;
            continue;
        };
        arrow.visible = true;
        transform.translation = shown.position;
        transform.rotation = shown.rotation;
        transform.scale = Vec3::splat(shown.scale);
    }
}
