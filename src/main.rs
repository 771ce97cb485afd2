//! Headless demo: loads a `NavConfig` and a JSON aisle scene, walks the
//! scripted route through `NavigationPlugin`, then runs the chase.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aislewalk::prelude::*;
use aislewalk::surface::rect::{RectAgentHost, RectSurface};
use aislewalk::{
    init_logging, ChaseTriggerRequest, LastStep, NavigationServices, Navigator, NavigatorMode,
    PointerInput, WaypointContainer,
};
use anyhow::{bail, Context, Result};
use bevy::prelude::{App, MinimalPlugins};
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

/// Headless walk through an authored aisle scene
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Navigation configuration (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Scene description (JSON)
    #[arg(short, long, default_value = "demos/aisle.json")]
    scene: PathBuf,
    /// Frames allowed for each step and for the chase
    #[arg(long, default_value_t = 200)]
    ticks: u32,
    /// Simulated seconds per frame
    #[arg(long, default_value_t = 1.0 / 30.0)]
    tick_seconds: f32,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    waypoints: SceneContainer,
    rig_start: Vec3,
    #[serde(default)]
    chase: Option<ChaseScene>,
    #[serde(default)]
    route: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChaseScene {
    spawn_point: Vec3,
    #[serde(default)]
    end_point: Option<Vec3>,
    surface: SurfaceBounds,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SurfaceBounds {
    min: Vec2,
    max: Vec2,
    #[serde(default)]
    height: f32,
}

const MARKER_RADIUS: f32 = 0.3;
const FLOOR_ENTITY: SceneEntity = SceneEntity(0);

/// Ray caster for the demo scene: a sphere around every waypoint over an
/// infinite floor plane.
struct SceneRayCaster {
    floor_height: f32,
    markers: Vec<(SceneEntity, Vec3)>,
}

impl SceneRayCaster {
    fn new(scene: &SceneFile) -> Self {
        let floor_height = scene.chase.as_ref().map_or(0.0, |chase| chase.surface.height);
        let markers = scene
            .waypoints
            .children
            .iter()
            .map(|child| (child.entity, child.position))
            .collect();
        Self {
            floor_height,
            markers,
        }
    }

    fn marker_distance(origin: Vec3, dir: Vec3, centre: Vec3) -> Option<f32> {
        let offset = origin - centre;
        let b = offset.dot(dir);
        let c = offset.length_squared() - MARKER_RADIUS * MARKER_RADIUS;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

impl RayCaster for SceneRayCaster {
    fn cast(&self, ray: Ray, max_distance: f32, _mask: LayerMask) -> Option<RayHit> {
        let dir = ray.direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let marker = self
            .markers
            .iter()
            .filter_map(|&(entity, centre)| {
                Self::marker_distance(ray.origin, dir, centre).map(|t| (OrderedFloat(t), entity))
            })
            .min();
        let floor = (dir.y < 0.0)
            .then(|| (self.floor_height - ray.origin.y) / dir.y)
            .filter(|t| *t >= 0.0)
            .map(|t| (OrderedFloat(t), FLOOR_ENTITY));

        let (distance, entity) = match (marker, floor) {
            (Some(m), Some(f)) => m.min(f),
            (Some(m), None) => m,
            (None, Some(f)) => f,
            (None, None) => return None,
        };
        if distance.into_inner() > max_distance {
            return None;
        }
        let normal = if entity == FLOOR_ENTITY { Vec3::Y } else { -dir };
        Some(RayHit::new(ray.point_at(distance.into_inner()), normal, entity))
    }
}

fn load_scene(path: &Path) -> Result<SceneFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid scene '{}'", path.display()))
}

/// Orientation looking from `eye` straight at `target`.
fn look_at(eye: Vec3, target: Vec3) -> Quat {
    let dir = target - eye;
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.atan2(dir.x.hypot(dir.z));
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
}

fn build_app(args: &Args, config: NavConfig, scene: &SceneFile) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        args.tick_seconds,
    )));

    let bounds = scene.chase.as_ref().map_or(
        SurfaceBounds {
            min: Vec2::splat(-50.0),
            max: Vec2::splat(50.0),
            height: 0.0,
        },
        |chase| chase.surface,
    );
    let surface = RectSurface::new(bounds.min, bounds.max, bounds.height);
    app.insert_resource(NavigationServices {
        raycaster: Box::new(SceneRayCaster::new(scene)),
        surface: Box::new(surface),
    });
    app.insert_resource(WaypointContainer(scene.waypoints.clone()));
    app.insert_resource(RigMotion::new(scene.rig_start, config.rig));
    if let Some(chase) = &scene.chase {
        app.insert_resource(ChaseDirector::new(
            Box::new(RectAgentHost::new(surface)),
            config.chase,
            chase.spawn_point,
            chase.end_point,
        ));
    }
    app.add_plugins(NavigationPlugin::new(config));
    app
}

fn rig_busy(app: &App) -> bool {
    app.world()
        .get_resource::<RigMotion>()
        .is_some_and(RigMotion::is_busy)
}

fn walk_route(app: &mut App, args: &Args, scene: &SceneFile) -> Result<()> {
    for name in &scene.route {
        let Some(target) = scene.waypoints.children.iter().find(|c| &c.name == name) else {
            bail!("route names unknown waypoint '{name}'");
        };
        let eye = app.world().resource::<RigMotion>().position();
        let mode = app.world().resource::<NavConfig>().mode;
        match mode {
            NavigatorMode::Discrete => {
                let mut pointer = app.world_mut().resource_mut::<PointerInput>();
                pointer.ray = Some(Ray::new(eye, target.position - eye));
                pointer.primary_pressed = true;
            }
            NavigatorMode::Continuous => {
                app.world_mut()
                    .resource_mut::<LookController>()
                    .align_to(look_at(eye, target.position));
                // Let the aim resolve before clicking.
                app.update();
                app.world_mut().resource_mut::<PointerInput>().primary_pressed = true;
            }
        }
        app.update();

        let mut frames = 0;
        while rig_busy(app) && frames < args.ticks {
            app.update();
            frames += 1;
        }
        let outcome = app.world().resource::<LastStep>().0;
        info!("step towards {name}: {outcome:?}");
    }
    Ok(())
}

fn run_chase(app: &mut App, args: &Args) {
    if app.world().get_resource::<ChaseDirector>().is_none() {
        return;
    }
    app.world_mut().trigger(ChaseTriggerRequest);
    let mut frames = 0;
    while frames < args.ticks
        && app
            .world()
            .get_resource::<ChaseDirector>()
            .is_some_and(ChaseDirector::has_agent)
    {
        app.update();
        frames += 1;
    }
    let still_running = app
        .world()
        .get_resource::<ChaseDirector>()
        .is_some_and(ChaseDirector::has_agent);
    if still_running {
        warn!("chase still running after {frames} frames");
    } else {
        info!("chase finished after {frames} frames");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => NavConfig::default(),
    };
    let scene = load_scene(&args.scene)?;

    let mut app = build_app(&args, config, &scene);
    app.update();
    let Some(navigator) = app.world().get_resource::<Navigator>() else {
        bail!("navigation could not start; see the log for the cause");
    };
    info!("starting at node {:?}", navigator.current());

    walk_route(&mut app, &args, &scene)?;
    run_chase(&mut app, &args);
    info!(
        "rig ends at {}",
        app.world().resource::<RigMotion>().position()
    );
    Ok(())
}
