#![cfg_attr(docsrs, feature(doc_cfg))]
//! Waypoint camera navigation and a one-shot pursuit for a first-person
//! aisle walker.
//!
//! The core types are plain Rust and take the host scene's services as trait
//! objects: [`raycast::RayCaster`] for picking and aiming and
//! [`surface::NavSurface`] for walkable-surface queries. [`NavigationPlugin`]
//! wires them into a Bevy `App`.
pub mod aim;
pub mod chase;
pub mod config;
pub mod constants;
pub mod graph;
pub mod logging;
pub mod look;
pub mod plugin;
pub mod pursuit;
pub mod raycast;
pub mod rig;
pub mod scene;
pub mod spawn;
pub mod surface;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use aim::continuous::{AimNavigator, AimSettings};
pub use aim::discrete::{ClickNavigator, ClickSettings};
pub use aim::{NavigatorError, NavigatorSetup, StepOutcome, StepRange, StepRejection};
pub use chase::{ChaseDirector, ChaseListener, ChaseSettings, TriggerOutcome};
pub use config::{ConfigError, NavConfig, NavigatorMode};
pub use graph::{Node, NodeId, PointGraph};
pub use logging::init as init_logging;
pub use look::{LookController, LookMode, LookSettings};
pub use plugin::{
    ChaseEnded, ChaseResetRequest, ChaseTarget, ChaseTriggerRequest, LastStep, NavArrow,
    NavigationPlugin, NavigationServices, Navigator, PointerInput, RigBody, RigCamera,
    WaypointContainer,
};
pub use pursuit::{ChaseEndReason, Pursuit, PursuitSettings, PursuitStatus};
pub use raycast::{LayerMask, Ray, RayCaster, RayHit};
pub use rig::{RigMotion, RigSettings, RigTick};
pub use scene::{SceneContainer, SceneEntity, SceneObject};
pub use spawn::{SpawnError, SpawnSettings, SpawnValidator};
pub use surface::{AgentHost, NavAgent, NavSurface, SurfaceEdge};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use aislewalk::prelude::*;
    //!
    //! let graph = PointGraph::from_container(&SceneContainer::new(
    //!     "Waypoints",
    //!     vec![SceneObject::new("WP_01", 1, Vec3::ZERO)],
    //! ));
    //! let mut rig = RigMotion::new(Vec3::Y * 1.6, RigSettings::default());
    //! let nav = ClickNavigator::new(&graph, &mut rig, &NavigatorSetup::default(), ClickSettings::default());
    //! assert!(nav.is_ok());
    //! ```

    pub use crate::aim::continuous::{AimNavigator, AimSettings, ViewPose};
    pub use crate::aim::discrete::{ClickNavigator, ClickSettings};
    pub use crate::aim::{NavigatorSetup, StepOutcome};
    pub use crate::chase::{ChaseDirector, ChaseSettings};
    pub use crate::config::NavConfig;
    pub use crate::graph::{NodeId, PointGraph};
    pub use crate::look::LookController;
    pub use crate::plugin::NavigationPlugin;
    pub use crate::pursuit::ChaseEndReason;
    pub use crate::raycast::{LayerMask, Ray, RayCaster, RayHit};
    pub use crate::rig::{RigMotion, RigSettings};
    pub use crate::scene::{SceneContainer, SceneEntity, SceneObject};
    pub use crate::surface::{NavAgent, NavSurface};
    pub use glam::{Quat, Vec2, Vec3};
    pub use ordered_float::OrderedFloat;
}
