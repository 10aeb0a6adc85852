//! 2D math aliases and direction helpers.
//!
//! Provides the f32 screen-space types used throughout the graph model
//! and the angular helpers the structural generators rely on to place
//! new atoms in the least crowded direction.

use std::f32::consts::{PI, TAU};

pub use nalgebra;

/// 2D vector (f32), used for screen coordinates.
pub type Vec2 = nalgebra::Vector2<f32>;

/// Unit vector pointing at `angle` radians (screen convention, x right,
/// y down, angle measured counter-clockwise from +x).
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of `v` in radians, normalized to `[0, 2π)`.
pub fn angle_of(v: &Vec2) -> f32 {
    normalize_angle(v.y.atan2(v.x))
}

/// Rotate `v` by `angle` radians.
pub fn rotate(v: &Vec2, angle: f32) -> Vec2 {
    nalgebra::Rotation2::new(angle) * v
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

/// Perpendicular of `v` (rotated +90°, same length).
pub fn perpendicular(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Bisector of the widest angular gap between the given directions.
///
/// Used to pick the least crowded direction for a new bond: the input
/// is the set of angles toward an atom's existing neighbors, the result
/// is the middle of the largest empty sector. Returns `None` when there
/// are no directions to avoid.
pub fn widest_gap_bisector(directions: &[f32]) -> Option<f32> {
    if directions.is_empty() {
        return None;
    }
    let mut angles: Vec<f32> = directions.iter().map(|a| normalize_angle(*a)).collect();
    angles.sort_by(|a, b| a.total_cmp(b));

    if angles.len() == 1 {
        return Some(normalize_angle(angles[0] + PI));
    }

    // Walk consecutive pairs, including the wrap-around gap.
    let mut best_start = 0.0;
    let mut best_width = -1.0;
    for i in 0..angles.len() {
        let a = angles[i];
        let b = if i + 1 == angles.len() {
            angles[0] + TAU
        } else {
            angles[i + 1]
        };
        let width = b - a;
        if width > best_width {
            best_width = width;
            best_start = a;
        }
    }
    Some(normalize_angle(best_start + best_width / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (normalize_angle(a) - normalize_angle(b)).abs() < 1e-4
    }

    #[test]
    fn unit_vectors() {
        let right = unit_from_angle(0.0);
        assert!((right.x - 1.0).abs() < 1e-6);
        assert!(right.y.abs() < 1e-6);

        let down = unit_from_angle(PI / 2.0);
        assert!(down.x.abs() < 1e-6);
        assert!((down.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn angle_round_trip() {
        for &a in &[0.0, 0.7, PI, 4.2, 6.0] {
            assert!(close(angle_of(&unit_from_angle(a)), a));
        }
    }

    #[test]
    fn normalize_wraps_negative() {
        assert!(close(normalize_angle(-PI / 2.0), 3.0 * PI / 2.0));
        assert!(close(normalize_angle(TAU + 0.5), 0.5));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(&Vec2::new(1.0, 0.0), PI / 2.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bisector_of_no_directions() {
        assert!(widest_gap_bisector(&[]).is_none());
    }

    #[test]
    fn bisector_opposite_of_single_direction() {
        let b = widest_gap_bisector(&[0.0]).unwrap();
        assert!(close(b, PI));
    }

    #[test]
    fn bisector_of_two_directions() {
        // Neighbors at 0° and 90°: the widest gap spans 90°..360°,
        // its middle is 225°.
        let b = widest_gap_bisector(&[0.0, PI / 2.0]).unwrap();
        assert!(close(b, 1.25 * PI));
    }

    #[test]
    fn bisector_handles_wraparound_gap() {
        // Neighbors at 350° and 10°: the widest gap is the long way
        // around, centered at 180°.
        let b = widest_gap_bisector(&[350.0_f32.to_radians(), 10.0_f32.to_radians()]).unwrap();
        assert!(close(b, PI));
    }
}
