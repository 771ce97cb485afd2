//! Convenience constructors for waypoint scenes used in tests.

use aislewalk::graph::PointGraph;
use aislewalk::scene::{SceneContainer, SceneObject};
use glam::Vec3;

/// Name of the container every helper scene uses.
pub const CONTAINER_NAME: &str = "Waypoints";

/// Creates a waypoint at `position` linked to `neighbours`.
///
/// # Examples
/// ```
/// use test_utils::scenes::waypoint;
/// use glam::Vec3;
/// let wp = waypoint("WP_01", 1, Vec3::ZERO, &["WP_02"]);
/// assert_eq!(wp.neighbours, ["WP_02"]);
/// ```
pub fn waypoint(name: &str, entity: u64, position: Vec3, neighbours: &[&str]) -> SceneObject {
    SceneObject::new(name, entity, position).with_neighbours(neighbours.iter().copied())
}

/// Three waypoints: `WP_01` at the origin, `WP_02` 1.5 units ahead and
/// linked both ways, and `WP_09` 1.3 units to the right with no links.
///
/// Entity ids match the numeric suffix.
pub fn aisle_container() -> SceneContainer {
    SceneContainer::new(
        CONTAINER_NAME,
        vec![
            waypoint("WP_01", 1, Vec3::ZERO, &["WP_02"]),
            waypoint("WP_02", 2, Vec3::new(0.0, 0.0, -1.5), &["WP_01"]),
            waypoint("WP_09", 9, Vec3::new(1.3, 0.0, 0.0), &[]),
        ],
    )
}

/// A straight corridor of `count` waypoints spaced `spacing` apart along
/// `-Z`, each linked to its predecessor and successor.
///
/// Names are `WP_01`, `WP_02`, ... and entity ids start at 1.
pub fn corridor(count: u64, spacing: f32) -> SceneContainer {
    let name = |i: u64| format!("WP_{i:02}");
    let children = (1..=count)
        .map(|i| {
            #[expect(clippy::cast_precision_loss, reason = "Corridor lengths are small.")]
            let z = -((i - 1) as f32 * spacing);
            let mut links = Vec::new();
            if i > 1 {
                links.push(name(i - 1));
            }
            if i < count {
                links.push(name(i + 1));
            }
            SceneObject::new(name(i), i, Vec3::new(0.0, 0.0, z)).with_neighbours(links)
        })
        .collect();
    SceneContainer::new(CONTAINER_NAME, children)
}

/// Builds the graph for [`aisle_container`].
pub fn aisle_graph() -> PointGraph {
    PointGraph::from_container(&aisle_container())
}
