//! Bones and skeletons

use glam::{Mat4, Quat, Vec3, Vec4};

use super::fixed;
use crate::error::{Error, Result};

/// Raw parent index container tables use for root bones.
pub const NO_PARENT_RAW: u32 = 0xFFFF;

/// A bone in a skeleton, with its transform relative to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    name: String,
    parent: Option<usize>,
    position: Vec4,
    rotation: Quat,
    scale: Vec4,
    endpoint: bool,
}

impl Bone {
    /// Start building a bone with identity transform.
    pub fn builder(name: impl Into<String>) -> BoneBuilder {
        BoneBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the parent bone in the owning skeleton, `None` for roots.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Homogeneous local position (w is normally 1).
    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec4 {
        self.scale
    }

    /// Endpoints mark the tip of a chain and are not rendered.
    pub fn is_endpoint(&self) -> bool {
        self.endpoint
    }

    /// Local transform from translation and rotation. Scale is not applied.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation.normalize(), self.position.truncate())
    }

    pub fn translation(&self) -> Vec3 {
        self.position.truncate()
    }
}

/// Collects raw bone fields and validates them in [`BoneBuilder::build`].
#[derive(Debug, Clone)]
pub struct BoneBuilder {
    name: String,
    parent: Option<usize>,
    position: Vec<f32>,
    rotation: Vec<f32>,
    scale: Vec<f32>,
    endpoint: bool,
}

impl BoneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: vec![0.0, 0.0, 0.0, 1.0],
            rotation: vec![1.0, 0.0, 0.0, 0.0],
            scale: vec![1.0, 1.0, 1.0, 1.0],
            endpoint: false,
        }
    }

    #[must_use]
    pub fn parent(mut self, index: usize) -> Self {
        self.parent = Some(index);
        self
    }

    /// Parent index as stored in a bone table.
    ///
    /// [`NO_PARENT_RAW`] and negative values mean "no parent".
    #[must_use]
    pub fn parent_raw(mut self, raw: i64) -> Self {
        self.parent = if raw < 0 || raw == i64::from(NO_PARENT_RAW) {
            None
        } else {
            usize::try_from(raw).ok()
        };
        self
    }

    /// Local position as x, y, z, w.
    #[must_use]
    pub fn position(mut self, values: &[f32]) -> Self {
        self.position = values.to_vec();
        self
    }

    /// Local rotation as a w-first quaternion.
    #[must_use]
    pub fn rotation(mut self, values: &[f32]) -> Self {
        self.rotation = values.to_vec();
        self
    }

    /// Local scale as x, y, z, w.
    #[must_use]
    pub fn scale(mut self, values: &[f32]) -> Self {
        self.scale = values.to_vec();
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: bool) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Validate every field and produce the bone.
    ///
    /// # Errors
    /// [`Error::ShapeViolation`] if position, rotation or scale is not
    /// 4 components, [`Error::TypeViolation`] for non-finite values or a
    /// zero-length rotation.
    pub fn build(self) -> Result<Bone> {
        let position = fixed::<4>("Bone.position", &self.position)?;
        let [w, x, y, z] = fixed::<4>("Bone.rotation", &self.rotation)?;
        let scale = fixed::<4>("Bone.scale", &self.scale)?;

        let rotation = Quat::from_xyzw(x, y, z, w);
        if rotation.length_squared() == 0.0 {
            return Err(Error::kind("Bone.rotation", "quaternion has zero length"));
        }

        Ok(Bone {
            name: self.name,
            parent: self.parent,
            position: Vec4::from_array(position),
            rotation,
            scale: Vec4::from_array(scale),
            endpoint: self.endpoint,
        })
    }
}

/// An ordered bone sequence.
///
/// Every bone's parent sits at an earlier position, so storage order is a
/// valid build order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a skeleton from bones in table order.
    pub fn from_bones(bones: impl IntoIterator<Item = Bone>) -> Result<Self> {
        let mut skeleton = Self::new();
        for bone in bones {
            skeleton.push(bone)?;
        }
        Ok(skeleton)
    }

    /// Append a bone, returning its index.
    ///
    /// # Errors
    /// [`Error::InvalidReference`] if the bone's parent is not already present.
    pub fn push(&mut self, bone: Bone) -> Result<usize> {
        let index = self.bones.len();
        if let Some(parent) = bone.parent {
            if parent >= index {
                return Err(Error::reference("Bone.parent", parent, index));
            }
        }
        self.bones.push(bone);
        Ok(index)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn get(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Index of the first bone called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent.is_none())
            .map(|(i, _)| i)
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent == Some(index))
            .map(|(i, _)| i)
    }
}
