//! Mirror synthesis across the YZ plane

use glam::{Mat4, Vec3, Vec4};

use super::compare::{Equivalence, Tolerance, ToleranceMiss, compare_bones};
use super::{ResolvedBone, ResolvedSkeleton};

const MIRROR_X: Vec3 = Vec3::new(-1.0, 1.0, 1.0);

/// The mirror image of `bone`: head and tail reflected across X = 0, roll
/// negated. Name, parent and endpoint flag are kept.
pub fn mirror_bone(bone: &ResolvedBone) -> ResolvedBone {
    bone.with_pose(bone.head() * MIRROR_X, bone.tail() * MIRROR_X, -bone.roll())
}

/// Reflect a bone matrix across X = 0, keeping it a proper rotation.
pub fn mirror_matrix(matrix: Mat4) -> Mat4 {
    let reflect = Mat4::from_diagonal(Vec4::new(-1.0, 1.0, 1.0, 1.0));
    reflect * matrix * reflect
}

/// One side of a bilaterally named skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "_L",
            Side::Right => "_R",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// `arm_L` -> `arm_R` for `Side::Left`; `None` if `name` is not on `side`.
pub fn counterpart_name(name: &str, side: Side) -> Option<String> {
    name.strip_suffix(side.suffix())
        .map(|stem| format!("{stem}{}", side.opposite().suffix()))
}

/// A counterpart bone that was replaced by a mirror of its source.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryRepair {
    /// The replaced bone.
    pub bone: String,
    /// The authoritative bone it now mirrors.
    pub source: String,
    /// Why the original was rejected.
    pub miss: ToleranceMiss,
}

/// Make the non-authoritative half of a skeleton mirror the authoritative one.
///
/// Every bone named for `authority` is compared, mirrored, with its
/// counterpart on the other side. Counterparts outside `tolerance` are
/// replaced by the mirror of the authoritative bone, keeping their own name,
/// parent and endpoint flag. Bones without a counterpart are left alone.
pub fn symmetrize(
    skeleton: &ResolvedSkeleton,
    authority: Side,
    tolerance: Tolerance,
) -> (ResolvedSkeleton, Vec<SymmetryRepair>) {
    let mut result = skeleton.clone();
    let mut repairs = Vec::new();

    for source in skeleton.bones() {
        let Some(target_name) = counterpart_name(source.name(), authority) else {
            continue;
        };
        let Some(target_index) = skeleton.find(&target_name) else {
            continue;
        };
        let target = &skeleton.bones()[target_index];

        if let Equivalence::Miss(miss) = compare_bones(source, target, tolerance, true) {
            tracing::warn!(
                "Bone {} does not mirror {} ({}); replacing it",
                target_name,
                source.name(),
                miss
            );
            let mirrored = mirror_bone(source);
            result.replace(
                target_index,
                target.with_pose(mirrored.head(), mirrored.tail(), mirrored.roll()),
            );
            repairs.push(SymmetryRepair {
                bone: target_name,
                source: source.name().to_string(),
                miss,
            });
        }
    }

    if !repairs.is_empty() {
        tracing::info!("Repaired {} asymmetric bone(s)", repairs.len());
    }
    (result, repairs)
}
