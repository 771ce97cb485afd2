//! Default tuning values shared by the navigation and pursuit settings.
//!
//! Every settings struct falls back to these values through its `Default`
//! implementation, so a configuration file only needs to name the fields it
//! overrides.

/// Shortest accepted distance between two nodes for a single step.
pub const DEFAULT_MIN_STEP: f32 = 1.2;
/// Longest accepted distance between two nodes for a single step.
pub const DEFAULT_MAX_STEP: f32 = 1.8;
/// Seconds taken by one rig transition.
pub const DEFAULT_MOVE_DURATION: f32 = 0.6;

/// Maximum length of the pointer ray used for click selection.
pub const DEFAULT_CLICK_RAY_DISTANCE: f32 = 300.0;
/// Maximum length of the centre-of-view ray used for continuous aiming.
pub const DEFAULT_AIM_RAY_DISTANCE: f32 = 500.0;
/// Farthest a node may sit from the aim point and still be selected.
pub const DEFAULT_AIM_MAX_DISTANCE: f32 = 1.8;
/// Minimum horizontal alignment between view forward and the candidate.
pub const DEFAULT_AIM_DOT_THRESHOLD: f32 = 0.25;

/// Horizontal distance of the direction arrow in front of the view.
pub const DEFAULT_ARROW_DISTANCE: f32 = 1.2;
/// Height of the direction arrow above the floor.
pub const DEFAULT_ARROW_HEIGHT: f32 = 0.02;
/// Uniform scale applied to the direction arrow.
pub const DEFAULT_ARROW_SCALE: f32 = 0.6;
/// Height above the arrow position from which the floor probe starts.
pub const ARROW_FLOOR_PROBE_LIFT: f32 = 2.0;
/// Length of the downward floor probe under the arrow.
pub const ARROW_FLOOR_PROBE_DISTANCE: f32 = 10.0;

/// Drag-look sensitivity in degrees per unit of pointer travel.
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 2.0;
/// Lowest pitch reachable with drag-look, in degrees.
pub const DEFAULT_PITCH_MIN: f32 = -80.0;
/// Highest pitch reachable with drag-look, in degrees.
pub const DEFAULT_PITCH_MAX: f32 = 80.0;

/// Radius searched around the spawn point for a walkable location.
pub const DEFAULT_SPAWN_SAMPLE_RADIUS: f32 = 8.0;
/// Farthest the walkable location may drift from the spawn point.
pub const DEFAULT_MAX_SNAP_DISTANCE: f32 = 3.0;
/// Distance a spawn is pushed away from the nearest surface edge.
pub const DEFAULT_SPAWN_EDGE_PUSH: f32 = 0.5;
/// Upward offset applied to the spawn point before sampling the surface.
pub const SPAWN_QUERY_LIFT: f32 = 2.0;
/// Radius used when re-validating a point after an edge push.
pub const EDGE_RESAMPLE_RADIUS: f32 = 2.0;

/// Pursuer travel speed in world units per second.
pub const DEFAULT_CHASE_SPEED: f32 = 7.0;
/// Distance at which the pursuer considers its destination reached.
pub const DEFAULT_STOPPING_DISTANCE: f32 = 0.08;
/// Radius used to project the target onto the walkable surface.
pub const DEFAULT_TARGET_SAMPLE_RADIUS: f32 = 6.0;
/// Distance the pursuit destination is kept away from surface edges.
pub const DEFAULT_KEEP_AWAY_FROM_EDGE: f32 = 0.35;
/// Distance to the end point at which the chase finishes.
pub const DEFAULT_END_DISTANCE: f32 = 1.2;
/// Distance to the target at which the pursuer catches it.
pub const DEFAULT_CATCH_DISTANCE: f32 = 0.8;

/// Squared length under which a horizontal direction is treated as zero.
pub const DIRECTION_EPSILON_SQ: f32 = 0.0001;
