//! Native to host coordinate basis
//!
//! Assets are authored up = +Y, forward = +Z. The host is up = +Z,
//! forward = -Y, a quarter turn about X away.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::model::{Bone, Skeleton};

/// Basis change taking native coordinates to host coordinates.
pub const NATIVE_TO_HOST: Mat3 = Mat3::from_cols(Vec3::X, Vec3::Z, Vec3::NEG_Y);

/// [`NATIVE_TO_HOST`] as a quaternion.
pub fn basis_rotation() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

pub fn remap_position(position: Vec3) -> Vec3 {
    NATIVE_TO_HOST * position
}

/// Express a native rotation in the host basis (conjugation by the basis change).
pub fn remap_rotation(rotation: Quat) -> Quat {
    let basis = basis_rotation();
    (basis * rotation.normalize() * basis.conjugate()).normalize()
}

/// A bone's local transform in the host basis.
pub fn remap_local(bone: &Bone) -> Mat4 {
    Mat4::from_rotation_translation(
        remap_rotation(bone.rotation()),
        remap_position(bone.translation()),
    )
}

/// Host-basis world transform of every bone, in skeleton order.
///
/// Parents always precede their children, so one forward pass suffices.
pub fn world_transforms(skeleton: &Skeleton) -> Vec<Mat4> {
    let mut worlds: Vec<Mat4> = Vec::with_capacity(skeleton.len());
    for bone in skeleton.bones() {
        let local = remap_local(bone);
        let world = match bone.parent() {
            Some(parent) => worlds[parent] * local,
            None => local,
        };
        worlds.push(world);
    }
    worlds
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn quat_wxyz(q: Quat) -> [f32; 4] {
        [q.w, q.x, q.y, q.z]
    }

    #[test]
    fn test_axes_map_to_host_convention() {
        // native up becomes host up, native forward becomes host forward
        assert!(remap_position(Vec3::Y).abs_diff_eq(Vec3::Z, 1e-6));
        assert!(remap_position(Vec3::Z).abs_diff_eq(Vec3::NEG_Y, 1e-6));
        assert!(remap_position(Vec3::X).abs_diff_eq(Vec3::X, 1e-6));
        assert!(Mat3::from_quat(basis_rotation()).abs_diff_eq(NATIVE_TO_HOST, 1e-6));
    }

    #[test]
    fn test_remapped_rotation_turns_about_remapped_axis() {
        // a turn about native up is a turn about host up
        let native = Quat::from_rotation_y(0.7);
        let host = remap_rotation(native);
        assert!(host.abs_diff_eq(Quat::from_rotation_z(0.7), 1e-6));
    }

    #[test]
    fn test_three_bone_chain_world_transform() {
        let quarter_about_y = Quat::from_rotation_y(FRAC_PI_2);
        let skeleton = Skeleton::from_bones([
            Bone::builder("root").position(&[0.0, 1.0, 0.0, 1.0]).build().unwrap(),
            Bone::builder("A")
                .parent(0)
                .position(&[0.0, 0.0, 2.0, 1.0])
                .rotation(&quat_wxyz(quarter_about_y))
                .build()
                .unwrap(),
            Bone::builder("B")
                .parent(1)
                .position(&[1.0, 0.0, 0.0, 1.0])
                .build()
                .unwrap(),
        ])
        .unwrap();

        let worlds = world_transforms(&skeleton);
        let bones = skeleton.bones();
        let composed = remap_local(&bones[0]) * remap_local(&bones[1]) * remap_local(&bones[2]);
        assert!(worlds[2].abs_diff_eq(composed, 1e-6));

        // By hand: natively B sits at (0,1,2) + Ry(90)(1,0,0) = (0,1,1), facing
        // a quarter turn about up. In the host basis that is (0,-1,1), a
        // quarter turn about Z.
        let expected = Mat4::from_rotation_translation(
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(0.0, -1.0, 1.0),
        );
        assert!(worlds[2].abs_diff_eq(expected, 1e-6));
        assert!(worlds[2].w_axis.abs_diff_eq(Vec4::new(0.0, -1.0, 1.0, 1.0), 1e-6));
    }

    #[test]
    fn test_scale_is_not_applied() {
        let skeleton = Skeleton::from_bones([
            Bone::builder("root").scale(&[2.0, 2.0, 2.0, 1.0]).build().unwrap(),
            Bone::builder("child")
                .parent(0)
                .position(&[1.0, 0.0, 0.0, 1.0])
                .build()
                .unwrap(),
        ])
        .unwrap();
        let worlds = world_transforms(&skeleton);
        assert!(worlds[1].w_axis.truncate().abs_diff_eq(Vec3::X, 1e-6));
    }
}
