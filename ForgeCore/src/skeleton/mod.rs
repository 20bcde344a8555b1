//! Skeleton geometry engine
//!
//! Turns model skeletons (native basis, local transforms) into host-ready
//! bones (host basis, head/tail/roll), and compares, mirrors and
//! symmetrizes the result. Everything here is a pure function of its
//! inputs.

mod basis;
mod compare;
mod mirror;
mod resolve;
mod roll;

pub use basis::{
    NATIVE_TO_HOST, basis_rotation, remap_local, remap_position, remap_rotation, world_transforms,
};
pub use compare::{Equivalence, Tolerance, ToleranceMiss, compare_bones};
pub use mirror::{Side, SymmetryRepair, counterpart_name, mirror_bone, mirror_matrix, symmetrize};
pub use resolve::{BONE_FRAME, ResolvedBone, ResolvedSkeleton, resolve_skeleton};
pub use roll::{clamp_roll, flip_roll, frame_from_roll, roll_from_frame};
