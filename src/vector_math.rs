//! Horizontal-plane helpers shared by aiming, the rig and pursuit.
use glam::{Quat, Vec3};

use crate::DIRECTION_EPSILON_SQ;

/// Returns the vector with its vertical component removed.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use aislewalk::vector_math::flatten;
/// assert_eq!(flatten(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
/// ```
#[must_use]
pub const fn flatten(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Returns the unit horizontal direction of `vector`.
///
/// Non-finite vectors and vectors whose horizontal length is below the
/// direction epsilon yield `None`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use aislewalk::vector_math::horizontal_direction;
/// let dir = horizontal_direction(Vec3::new(3.0, 9.0, 4.0)).unwrap_or(Vec3::ZERO);
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// assert!((dir.z - 0.8).abs() < 1e-6);
///
/// assert!(horizontal_direction(Vec3::Y).is_none());
/// ```
#[must_use]
pub fn horizontal_direction(vector: Vec3) -> Option<Vec3> {
    let flat = flatten(vector);
    if !flat.is_finite() || flat.length_squared() < DIRECTION_EPSILON_SQ {
        return None;
    }
    Some(flat.normalize())
}

/// Returns the horizontal-plane dot product of two directions.
///
/// Both inputs are flattened and normalised first; if either is degenerate
/// the result is `None`.
#[must_use]
pub fn horizontal_alignment(forward: Vec3, toward: Vec3) -> Option<f32> {
    let lhs = horizontal_direction(forward)?;
    let rhs = horizontal_direction(toward)?;
    Some(lhs.dot(rhs))
}

/// Returns a yaw-only rotation turning `-Z` to face `direction`.
///
/// The vertical component of `direction` is ignored. Degenerate directions
/// yield `None` so callers can keep their previous orientation.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use aislewalk::vector_math::yaw_towards;
/// let rotation = yaw_towards(Vec3::X).unwrap_or_default();
/// let facing = rotation * Vec3::NEG_Z;
/// assert!((facing - Vec3::X).length() < 1e-5);
/// ```
#[must_use]
pub fn yaw_towards(direction: Vec3) -> Option<Quat> {
    let dir = horizontal_direction(direction)?;
    Some(Quat::from_rotation_y((-dir.x).atan2(-dir.z)))
}

/// Wraps an angle in degrees into the half-open range `(-180, 180]`.
///
/// # Examples
/// ```
/// use aislewalk::vector_math::normalize_angle;
/// assert!((normalize_angle(270.0) + 90.0).abs() < 1e-4);
/// assert!((normalize_angle(-190.0) - 170.0).abs() < 1e-4);
/// assert!((normalize_angle(180.0) - 180.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn normalize_angle(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::nan(Vec3::new(f32::NAN, 0.0, 1.0))]
    #[case::vertical(Vec3::new(0.0, -4.0, 0.0))]
    #[case::tiny(Vec3::new(0.001, 0.0, 0.001))]
    fn horizontal_direction_rejects_degenerate(#[case] input: Vec3) {
        assert!(horizontal_direction(input).is_none());
    }

    #[test]
    fn alignment_ignores_pitch() {
        let looking_down = Vec3::new(0.0, -0.9, -0.1);
        let ahead = Vec3::new(0.0, 3.0, -5.0);
        let dot = horizontal_alignment(looking_down, ahead).unwrap_or_default();
        assert_relative_eq!(dot, 1.0, epsilon = 1e-5);
    }

    #[rstest]
    #[case::left(Vec3::NEG_X)]
    #[case::behind(Vec3::Z)]
    #[case::diagonal(Vec3::new(1.0, 0.5, 1.0))]
    fn yaw_towards_faces_direction(#[case] direction: Vec3) {
        let rotation = yaw_towards(direction).unwrap_or_default();
        let facing = rotation * Vec3::NEG_Z;
        let expected = horizontal_direction(direction).unwrap_or_default();
        assert!((facing - expected).length() < 1e-5, "{facing:?} vs {expected:?}");
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(360.0, 0.0)]
    #[case(350.0, -10.0)]
    #[case(-350.0, 10.0)]
    #[case(720.5, 0.5)]
    fn normalize_angle_wraps(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(normalize_angle(input), expected, epsilon = 1e-3);
    }
}
