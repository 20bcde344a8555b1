//! Bone roll: frames from direction and roll, and back

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Vec3};

const SAFE_THRESHOLD: f32 = 6.1e-3;
const CRITICAL_THRESHOLD: f32 = 2.5e-4;

/// Build a bone frame whose Y axis is `direction`, rolled by `roll` radians.
///
/// The unrolled frame is the smallest rotation taking +Y onto `direction`;
/// roll then turns it about `direction`. Directions within a hair of -Y use
/// a fixed half-turn about Z instead, where the minimal rotation is
/// undefined.
pub fn frame_from_roll(direction: Vec3, roll: f32) -> Mat3 {
    let nor = direction.normalize();
    let Vec3 { x, y, z } = nor;

    let mut theta = 1.0 + y;
    let theta_alt = x * x + z * z;

    let base = if theta > SAFE_THRESHOLD || theta_alt > CRITICAL_THRESHOLD * CRITICAL_THRESHOLD {
        // Near -Y the closed form loses precision; use its series expansion
        if theta <= SAFE_THRESHOLD {
            theta = theta_alt * 0.5 + theta_alt * theta_alt * 0.125;
        }
        Mat3::from_cols(
            Vec3::new(1.0 - x * x / theta, -x, -x * z / theta),
            Vec3::new(x, y, z),
            Vec3::new(-x * z / theta, -z, 1.0 - z * z / theta),
        )
    } else {
        Mat3::from_diagonal(Vec3::new(-1.0, -1.0, 1.0))
    };

    Mat3::from_axis_angle(nor, roll) * base
}

/// Recover the roll of a bone frame, in radians.
///
/// Inverse of [`frame_from_roll`] for orthonormal frames.
pub fn roll_from_frame(frame: Mat3) -> f32 {
    let unrolled = frame_from_roll(frame.y_axis, 0.0);
    let roll_matrix = unrolled.transpose() * frame;
    roll_matrix.z_axis.x.atan2(roll_matrix.z_axis.z)
}

/// Fold a roll into (-pi, pi] and snap it to exactly zero when its magnitude
/// is below `epsilon`.
///
/// Rolls already inside the range keep their exact value, which makes the
/// clamp idempotent.
pub fn clamp_roll(roll: f32, epsilon: f32) -> f32 {
    let mut folded = roll;
    if folded > PI || folded <= -PI {
        folded = folded.rem_euclid(TAU);
        if folded > PI {
            folded -= TAU;
        }
    }
    if folded.abs() < epsilon { 0.0 } else { folded }
}

/// Turn a bone half a turn about its own axis: `(roll mod 2pi) - pi`.
pub fn flip_roll(roll: f32) -> f32 {
    roll.rem_euclid(TAU) - PI
}
