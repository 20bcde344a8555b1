//! Import hand-off containers

use std::collections::BTreeSet;

use super::{Mesh, Skeleton};

/// Describes one mesh stored in a payload file.
///
/// Several headers may describe the same mesh at different levels of
/// detail; lower LOD ranks carry more detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHeader {
    mesh_id: u32,
    flags: u32,
    vertex_table_index: usize,
    face_table_index: usize,
    material_index: usize,
    lod: u32,
}

impl MeshHeader {
    pub fn new(
        mesh_id: u32,
        flags: u32,
        vertex_table_index: usize,
        face_table_index: usize,
        material_index: usize,
        lod: u32,
    ) -> Self {
        Self {
            mesh_id,
            flags,
            vertex_table_index,
            face_table_index,
            material_index,
            lod,
        }
    }

    pub fn mesh_id(&self) -> u32 {
        self.mesh_id
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn vertex_table_index(&self) -> usize {
        self.vertex_table_index
    }

    pub fn face_table_index(&self) -> usize {
        self.face_table_index
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }
}

/// Describes one morph shape stored in a payload file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeHeader {
    name: String,
    vertex_table_index: usize,
    shape_table_index: usize,
}

impl ShapeHeader {
    pub fn new(
        name: impl Into<String>,
        vertex_table_index: usize,
        shape_table_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            vertex_table_index,
            shape_table_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base vertex table the shape displaces.
    pub fn vertex_table_index(&self) -> usize {
        self.vertex_table_index
    }

    /// The payload table holding the displaced vertices.
    pub fn shape_table_index(&self) -> usize {
        self.shape_table_index
    }
}

/// Result of parsing a definitions file, handed to the payload parse.
///
/// A definitions file holds exactly one skeleton.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    skeleton: Skeleton,
    mesh_headers: Vec<MeshHeader>,
    shape_headers: Vec<ShapeHeader>,
}

impl Package {
    pub fn new(
        skeleton: Skeleton,
        mesh_headers: Vec<MeshHeader>,
        shape_headers: Vec<ShapeHeader>,
    ) -> Self {
        Self {
            skeleton,
            mesh_headers,
            shape_headers,
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn mesh_headers(&self) -> &[MeshHeader] {
        &self.mesh_headers
    }

    pub fn shape_headers(&self) -> &[ShapeHeader] {
        &self.shape_headers
    }

    /// Distinct LOD ranks in ascending order.
    pub fn lod_list(&self) -> Vec<u32> {
        self.mesh_headers
            .iter()
            .map(MeshHeader::lod)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The most detailed LOD, or `None` without mesh headers.
    pub fn best_lod(&self) -> Option<u32> {
        self.mesh_headers.iter().map(MeshHeader::lod).min()
    }

    /// Finish an import that has no payload file: skeleton only.
    pub fn into_imported(self) -> ImportedPackage {
        let mut imported = ImportedPackage::default();
        imported.push_skeleton(self.skeleton);
        imported
    }
}

/// Fully resolved import result, free of file offsets and table indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedPackage {
    skeletons: Vec<Skeleton>,
    meshes: Vec<Mesh>,
}

impl ImportedPackage {
    pub fn new(skeletons: Vec<Skeleton>, meshes: Vec<Mesh>) -> Self {
        Self { skeletons, meshes }
    }

    pub fn skeletons(&self) -> &[Skeleton] {
        &self.skeletons
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn push_skeleton(&mut self, skeleton: Skeleton) {
        self.skeletons.push(skeleton);
    }

    pub fn push_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }
}
