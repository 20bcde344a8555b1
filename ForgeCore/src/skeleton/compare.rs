//! Tolerant bone equivalence

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::Vec3;

use super::ResolvedBone;

/// Per-axis position tolerance and angular tolerance (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub position: f32,
    pub angle: f32,
}

impl Tolerance {
    pub fn new(position: f32, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// The first check two bones failed, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToleranceMiss {
    /// Head coordinate on `axis` (0 = X) differs.
    Position {
        axis: usize,
        difference: f32,
        tolerance: f32,
    },
    /// Facing (Y) axes diverge, radians.
    Facing { angle: f32, tolerance: f32 },
    /// Roll (Z) axes diverge, radians.
    Roll { angle: f32, tolerance: f32 },
}

impl ToleranceMiss {
    /// How far past tolerance the measured value is.
    pub fn overshoot(&self) -> f32 {
        match *self {
            Self::Position {
                difference,
                tolerance,
                ..
            } => difference - tolerance,
            Self::Facing { angle, tolerance } | Self::Roll { angle, tolerance } => {
                angle - tolerance
            }
        }
    }
}

impl fmt::Display for ToleranceMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Position {
                axis, difference, ..
            } => write!(
                f,
                "position[{axis}] differs by {difference} (out of tolerance by {})",
                self.overshoot()
            ),
            Self::Facing { angle, .. } => write!(
                f,
                "facing axes differ by {:.4} degrees (out of tolerance by {:.4} degrees)",
                angle.to_degrees(),
                self.overshoot().to_degrees()
            ),
            Self::Roll { angle, .. } => write!(
                f,
                "roll axes differ by {:.4} degrees (out of tolerance by {:.4} degrees)",
                angle.to_degrees(),
                self.overshoot().to_degrees()
            ),
        }
    }
}

/// Outcome of [`compare_bones`]. A miss is information, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Equivalence {
    Match,
    Miss(ToleranceMiss),
}

impl Equivalence {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn miss(&self) -> Option<&ToleranceMiss> {
        match self {
            Self::Match => None,
            Self::Miss(miss) => Some(miss),
        }
    }
}

const MIRROR_X: Vec3 = Vec3::new(-1.0, 1.0, 1.0);

fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let cos = a.dot(b) / (a.length_squared() * b.length_squared()).sqrt();
    cos.clamp(-1.0, 1.0).acos()
}

// False for NaN, so an unmeasurable value never passes a gate
fn within(value: f32, tolerance: f32) -> bool {
    value < tolerance
}

fn axis_angle(a: Vec3, b: Vec3, mirrored: bool) -> f32 {
    if mirrored {
        let angle = angle_between(a * MIRROR_X, b);
        // Pointing the opposite way is also a valid mirror
        if angle > FRAC_PI_2 { (PI - angle).abs() } else { angle }
    } else {
        angle_between(a, b)
    }
}

/// Would `a` land on `b` within `tolerance`?
///
/// Checks head position per axis, then the angle between facing axes, then
/// the angle between roll axes; each must be strictly inside its tolerance.
/// A NaN measurement, such as the axes of a zero-length bone, is a miss.
/// With `mirrored`, `a` is reflected across the YZ plane first and axes
/// pointing opposite ways count as aligned. The result does not depend on
/// argument order.
pub fn compare_bones(
    a: &ResolvedBone,
    b: &ResolvedBone,
    tolerance: Tolerance,
    mirrored: bool,
) -> Equivalence {
    let head_a = if mirrored { a.head() * MIRROR_X } else { a.head() };
    let difference = (head_a - b.head()).abs().to_array();
    for (axis, &difference) in difference.iter().enumerate() {
        if !within(difference, tolerance.position) {
            return Equivalence::Miss(ToleranceMiss::Position {
                axis,
                difference,
                tolerance: tolerance.position,
            });
        }
    }

    let frame_a = a.frame();
    let frame_b = b.frame();

    let angle = axis_angle(frame_a.y_axis, frame_b.y_axis, mirrored);
    if !within(angle, tolerance.angle) {
        return Equivalence::Miss(ToleranceMiss::Facing {
            angle,
            tolerance: tolerance.angle,
        });
    }

    let angle = axis_angle(frame_a.z_axis, frame_b.z_axis, mirrored);
    if !within(angle, tolerance.angle) {
        return Equivalence::Miss(ToleranceMiss::Roll {
            angle,
            tolerance: tolerance.angle,
        });
    }

    Equivalence::Match
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Tolerance = Tolerance {
        position: 0.0001,
        angle: 0.1 * PI / 180.0,
    };

    fn bone(head: Vec3, direction: Vec3, roll: f32) -> ResolvedBone {
        ResolvedBone::new("bone", None, head, head + direction.normalize() * 0.1, roll, false)
    }

    fn cases() -> Vec<(ResolvedBone, ResolvedBone)> {
        let left = bone(Vec3::new(0.3, 0.1, 1.2), Vec3::new(1.0, 0.2, -0.1), 0.4);
        vec![
            (left.clone(), left.clone()),
            (left.clone(), bone(Vec3::new(-0.3, 0.1, 1.2), Vec3::new(-1.0, 0.2, -0.1), -0.4)),
            (left.clone(), bone(Vec3::new(0.3, 0.1, 1.25), Vec3::new(1.0, 0.2, -0.1), 0.4)),
            (left.clone(), bone(Vec3::new(0.3, 0.1, 1.2), Vec3::new(1.0, 0.5, -0.1), 0.4)),
            (left.clone(), bone(Vec3::new(0.3, 0.1, 1.2), Vec3::new(1.0, 0.2, -0.1), 0.9)),
            (left, bone(Vec3::new(-0.3, 0.1, 1.2), Vec3::new(-1.0, 0.2, -0.1), 2.0)),
        ]
    }

    #[test]
    fn test_identical_bones_match() {
        let (a, b) = &cases()[0];
        assert_eq!(compare_bones(a, b, TOLERANCE, false), Equivalence::Match);
    }

    #[test]
    fn test_mirrored_pair_matches_only_when_mirrored() {
        let (a, b) = &cases()[1];
        assert_eq!(compare_bones(a, b, TOLERANCE, true), Equivalence::Match);
        assert!(matches!(
            compare_bones(a, b, TOLERANCE, false),
            Equivalence::Miss(ToleranceMiss::Position { axis: 0, .. })
        ));
    }

    #[test]
    fn test_reports_first_failing_check() {
        let cases = cases();
        let miss = |i: usize| {
            *compare_bones(&cases[i].0, &cases[i].1, TOLERANCE, false)
                .miss()
                .unwrap()
        };

        match miss(2) {
            ToleranceMiss::Position { axis, difference, .. } => {
                assert_eq!(axis, 2);
                assert!((difference - 0.05).abs() < 1e-5);
            }
            other => panic!("expected a position miss, got {other:?}"),
        }
        assert!(matches!(miss(3), ToleranceMiss::Facing { .. }));
        match miss(4) {
            ToleranceMiss::Roll { angle, .. } => assert!((angle - 0.5).abs() < 1e-4),
            other => panic!("expected a roll miss, got {other:?}"),
        }
    }

    #[test]
    fn test_symmetric_under_swap() {
        for (a, b) in cases() {
            for mirrored in [false, true] {
                assert_eq!(
                    compare_bones(&a, &b, TOLERANCE, mirrored),
                    compare_bones(&b, &a, TOLERANCE, mirrored),
                );
            }
        }
    }

    #[test]
    fn test_opposite_axes_are_a_valid_mirror() {
        let a = bone(Vec3::ZERO, Vec3::Y, 0.0);
        let b = bone(Vec3::ZERO, Vec3::Y, std::f32::consts::PI);
        assert!(!compare_bones(&a, &b, TOLERANCE, false).is_match());
        assert!(compare_bones(&a, &b, TOLERANCE, true).is_match());
    }

    #[test]
    fn test_zero_tolerance_never_matches() {
        let (a, b) = &cases()[0];
        assert!(!compare_bones(a, b, Tolerance::new(0.0, 0.0), false).is_match());
    }

    #[test]
    fn test_zero_length_bone_never_matches() {
        let degenerate = ResolvedBone::new("a", None, Vec3::ZERO, Vec3::ZERO, 0.0, false);
        let other = ResolvedBone::new("b", None, Vec3::ZERO, Vec3::Z, 1.0, false);
        for mirrored in [false, true] {
            assert!(matches!(
                compare_bones(&degenerate, &other, TOLERANCE, mirrored),
                Equivalence::Miss(ToleranceMiss::Facing { .. })
            ));
            assert!(!compare_bones(&degenerate, &degenerate, TOLERANCE, mirrored).is_match());
        }
    }

    #[test]
    fn test_nan_head_is_a_position_miss() {
        let (a, _) = &cases()[0];
        let lost = ResolvedBone::new("lost", None, Vec3::NAN, Vec3::Z, 0.0, false);
        assert!(matches!(
            compare_bones(a, &lost, TOLERANCE, false),
            Equivalence::Miss(ToleranceMiss::Position { axis: 0, .. })
        ));
    }

    #[test]
    fn test_miss_display_in_degrees() {
        let miss = ToleranceMiss::Facing {
            angle: 2.0_f32.to_radians(),
            tolerance: 0.5_f32.to_radians(),
        };
        assert_eq!(
            miss.to_string(),
            "facing axes differ by 2.0000 degrees (out of tolerance by 1.5000 degrees)"
        );
    }
}
