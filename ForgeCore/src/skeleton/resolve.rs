//! Host-ready bones described by head, tail and roll

use glam::{Mat3, Mat4, Vec3};

use super::basis::world_transforms;
use super::roll::{clamp_roll, frame_from_roll, roll_from_frame};
use crate::config::ImportOptions;
use crate::model::Skeleton;

/// Native bones point along local +X with +Y as the roll reference. Host
/// bones point along +Y with +Z as the roll reference. This is the rotation
/// between the two (host X, Y, Z = native Z, X, Y).
pub const BONE_FRAME: Mat3 = Mat3::from_cols(Vec3::NEG_Y, Vec3::X, Vec3::Z);

/// A bone in host coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBone {
    name: String,
    parent: Option<usize>,
    head: Vec3,
    tail: Vec3,
    roll: f32,
    endpoint: bool,
}

impl ResolvedBone {
    pub fn new(
        name: impl Into<String>,
        parent: Option<usize>,
        head: Vec3,
        tail: Vec3,
        roll: f32,
        endpoint: bool,
    ) -> Self {
        Self {
            name: name.into(),
            parent,
            head,
            tail,
            roll,
            endpoint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the parent in the owning [`ResolvedSkeleton`].
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn tail(&self) -> Vec3 {
        self.tail
    }

    /// Radians about the head-to-tail axis.
    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn is_endpoint(&self) -> bool {
        self.endpoint
    }

    pub fn length(&self) -> f32 {
        (self.tail - self.head).length()
    }

    /// Orientation: Y is the facing direction, Z the roll reference.
    pub fn frame(&self) -> Mat3 {
        frame_from_roll(self.tail - self.head, self.roll)
    }

    pub fn x_axis(&self) -> Vec3 {
        self.frame().x_axis
    }

    pub fn y_axis(&self) -> Vec3 {
        self.frame().y_axis
    }

    pub fn z_axis(&self) -> Vec3 {
        self.frame().z_axis
    }

    /// Frame plus head translation.
    pub fn matrix(&self) -> Mat4 {
        let frame = self.frame();
        Mat4::from_cols(
            frame.x_axis.extend(0.0),
            frame.y_axis.extend(0.0),
            frame.z_axis.extend(0.0),
            self.head.extend(1.0),
        )
    }

    pub(crate) fn with_pose(&self, head: Vec3, tail: Vec3, roll: f32) -> Self {
        Self {
            head,
            tail,
            roll,
            ..self.clone()
        }
    }
}

/// Resolved bones in build order; parents precede children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSkeleton {
    bones: Vec<ResolvedBone>,
}

impl ResolvedSkeleton {
    pub fn new(bones: Vec<ResolvedBone>) -> Self {
        Self { bones }
    }

    pub fn bones(&self) -> &[ResolvedBone] {
        &self.bones
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedBone> {
        self.bones.get(index)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub(crate) fn replace(&mut self, index: usize, bone: ResolvedBone) {
        self.bones[index] = bone;
    }
}

fn snap(v: Vec3, epsilon: f32) -> Vec3 {
    Vec3::select(v.abs().cmplt(Vec3::splat(epsilon)), Vec3::ZERO, v)
}

/// Convert a skeleton into host bones.
///
/// Endpoints are dropped unless `options.import_endpoints` is set; bones
/// below a dropped endpoint are re-parented to the nearest kept ancestor.
pub fn resolve_skeleton(skeleton: &Skeleton, options: &ImportOptions) -> ResolvedSkeleton {
    let worlds = world_transforms(skeleton);

    // For every source bone, the resolved index of itself or its nearest kept ancestor
    let mut nearest: Vec<Option<usize>> = Vec::with_capacity(skeleton.len());
    let mut bones = Vec::with_capacity(skeleton.len());

    for (bone, world) in skeleton.bones().iter().zip(&worlds) {
        let inherited = bone.parent().and_then(|p| nearest[p]);

        if bone.is_endpoint() && !options.import_endpoints {
            nearest.push(inherited);
            continue;
        }

        let frame = Mat3::from_mat4(*world) * BONE_FRAME;
        let head = world.w_axis.truncate();
        let tail = head + frame.y_axis * options.bone_size;
        let roll = clamp_roll(roll_from_frame(frame), options.angle_epsilon);

        nearest.push(Some(bones.len()));
        bones.push(ResolvedBone {
            name: bone.name().to_string(),
            parent: inherited,
            head: snap(head, options.position_epsilon),
            tail: snap(tail, options.position_epsilon),
            roll,
            endpoint: bone.is_endpoint(),
        });
    }

    let dropped = skeleton.len() - bones.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} endpoint bone(s)", dropped);
    }
    tracing::debug!("Resolved {} bone(s)", bones.len());

    ResolvedSkeleton { bones }
}
