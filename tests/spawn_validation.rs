//! Spawn validation against surfaces implemented outside the crate.

use aislewalk::spawn::{SpawnError, SpawnSettings, SpawnValidator};
use aislewalk::surface::rect::RectSurface;
use aislewalk::surface::{NavSurface, SurfaceEdge};
use aislewalk::{DEFAULT_MAX_SNAP_DISTANCE, DEFAULT_SPAWN_EDGE_PUSH, SPAWN_QUERY_LIFT};
use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use rstest::rstest;

/// Surface with a single walkable spot and no edges.
struct SingleSpot(Vec3);

impl NavSurface for SingleSpot {
    fn sample_nearest(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        (point.distance(self.0) <= radius).then_some(self.0)
    }

    fn find_closest_edge(&self, _point: Vec3) -> Option<SurfaceEdge> {
        None
    }
}

#[test]
fn marker_snaps_to_nearby_walkable_point() {
    let surface = SingleSpot(Vec3::new(5.1, 0.0, 5.2));
    let spot = SpawnValidator::default().try_spawn(&surface, Vec3::new(5.0, 0.0, 5.0));
    assert_eq!(spot, Ok(Vec3::new(5.1, 0.0, 5.2)));
}

#[test]
fn distant_walkable_point_is_refused() {
    let surface = SingleSpot(Vec3::new(9.0, 0.0, 5.0));
    let err = SpawnValidator::default()
        .try_spawn(&surface, Vec3::new(5.0, 0.0, 5.0))
        .expect_err("drift of 4 exceeds the limit");
    let SpawnError::SpawnDriftTooFar { drift, limit } = err else {
        panic!("unexpected error {err}");
    };
    assert_relative_eq!(drift, 4.0);
    assert_relative_eq!(limit, DEFAULT_MAX_SNAP_DISTANCE);
}

#[test]
fn snapped_marker_near_a_corner_is_pushed_along_the_edge_normal() {
    // The walkable area starts at (5.1, 5.2), so the marker snaps onto its
    // corner, where the -X edge wins the tie and pushes along +X.
    let floor = RectSurface::new(Vec2::new(5.1, 5.2), Vec2::splat(15.0), 0.0);
    let snapped = Vec3::new(5.1, 0.0, 5.2);
    let edge = floor.find_closest_edge(snapped).expect("corner has edges");
    assert_eq!(edge.normal, Vec3::X);

    let spot = SpawnValidator::default()
        .try_spawn(&floor, Vec3::new(5.0, 0.0, 5.0))
        .expect("marker drifts 0.22 units");
    let expected = snapped + edge.normal * DEFAULT_SPAWN_EDGE_PUSH;
    assert_relative_eq!(spot.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(spot.y, 0.0);
    assert_relative_eq!(spot.z, expected.z, epsilon = 1e-5);
}

#[rstest]
// Equidistant edges resolve to the western one.
#[case::centre(Vec3::new(10.0, 0.0, 10.0), Vec3::new(10.5, 0.0, 10.0))]
#[case::near_west_edge(Vec3::new(0.25, 0.0, 10.0), Vec3::new(0.75, 0.0, 10.0))]
#[case::near_north_edge(Vec3::new(10.0, 0.0, 19.75), Vec3::new(10.0, 0.0, 19.25))]
fn rectangular_floor_pushes_spawns_inward(#[case] marker: Vec3, #[case] expected: Vec3) {
    let floor = RectSurface::new(Vec2::ZERO, Vec2::splat(20.0), 0.0);
    let settings = SpawnSettings {
        edge_push: 0.5,
        ..SpawnSettings::default()
    };
    let spot = SpawnValidator::new(settings).try_spawn(&floor, marker);
    assert_eq!(spot, Ok(expected));
}

#[test]
fn marker_high_above_the_floor_is_not_found() {
    let floor = RectSurface::new(Vec2::ZERO, Vec2::splat(20.0), 0.0);
    let settings = SpawnSettings::default();
    let marker = Vec3::new(10.0, settings.sample_radius + 1.0 - SPAWN_QUERY_LIFT, 10.0);
    let err = SpawnValidator::new(settings)
        .try_spawn(&floor, marker)
        .expect_err("floor is out of reach");
    assert!(matches!(err, SpawnError::NoWalkableSurface { .. }));
}
