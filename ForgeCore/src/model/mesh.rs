//! Meshes, faces and morph shapes

use std::collections::{BTreeMap, BTreeSet};

use glam::{Vec2, Vec3, Vec4};

use super::{Vertex, finite};
use crate::error::{Error, Result};

/// A polygon: vertex indices in winding order plus a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    vertex_indices: Vec<usize>,
    material_index: usize,
}

impl Face {
    /// # Errors
    /// [`Error::TypeViolation`] for fewer than three vertices.
    pub fn new(vertex_indices: Vec<usize>, material_index: usize) -> Result<Self> {
        if vertex_indices.len() < 3 {
            return Err(Error::kind(
                "Face.vertex_indices",
                format!("a face needs at least 3 vertices, found {}", vertex_indices.len()),
            ));
        }
        Ok(Self {
            vertex_indices,
            material_index,
        })
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    #[must_use]
    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }
}

/// A morph shape: displaced copies of only the vertices that move.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshShape {
    name: String,
    vertex_table_index: usize,
    vertices: BTreeMap<usize, Vertex>,
}

impl MeshShape {
    pub fn new(
        name: impl Into<String>,
        vertex_table_index: usize,
        vertices: BTreeMap<usize, Vertex>,
    ) -> Self {
        Self {
            name: name.into(),
            vertex_table_index,
            vertices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex table this shape displaces.
    pub fn vertex_table_index(&self) -> usize {
        self.vertex_table_index
    }

    /// Displaced vertices keyed by base vertex index.
    pub fn vertices(&self) -> &BTreeMap<usize, Vertex> {
        &self.vertices
    }
}

/// A mesh ready for scene construction.
///
/// Attribute predicates are answered by scanning the vertices each call.
/// Meshes are assumed to be uniform (if one vertex has normals they all do),
/// but that is not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    weight_sets: BTreeMap<usize, Vec<f32>>,
    shapes: Vec<MeshShape>,
}

impl Mesh {
    pub fn builder(name: impl Into<String>) -> MeshBuilder {
        MeshBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Shared pre-bake weights keyed by weight-set index.
    pub fn weight_sets(&self) -> &BTreeMap<usize, Vec<f32>> {
        &self.weight_sets
    }

    pub fn weight_set(&self, index: usize) -> Option<&[f32]> {
        self.weight_sets.get(&index).map(Vec::as_slice)
    }

    pub fn shapes(&self) -> &[MeshShape] {
        &self.shapes
    }

    pub fn has_uvs(&self) -> bool {
        self.vertices.iter().any(Vertex::has_uvs)
    }

    pub fn has_normals(&self) -> bool {
        self.vertices.iter().any(Vertex::has_normal)
    }

    pub fn has_colours(&self) -> bool {
        self.vertices.iter().any(Vertex::has_colour)
    }

    pub fn has_weight_indexes(&self) -> bool {
        self.vertices.iter().any(Vertex::has_weight_index)
    }

    pub fn has_weights(&self) -> bool {
        self.vertices.iter().any(Vertex::has_weights)
    }

    pub fn has_shapes(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Assign ids `0..len` in current vertex order.
    ///
    /// Run once all vertices are in place and before any id lookup. Shapes
    /// refer to vertices by position, so the vertex order must not change
    /// afterwards.
    pub fn reindex(&mut self) {
        for (id, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.assign_id(id);
        }
    }

    /// Whether every vertex carries the id matching its position.
    pub fn is_indexed(&self) -> bool {
        self.vertices
            .iter()
            .enumerate()
            .all(|(i, v)| v.id() == Some(i))
    }

    /// Look a vertex up by id. Only meaningful after [`Mesh::reindex`].
    pub fn vertex_by_id(&self, id: usize) -> Option<&Vertex> {
        self.vertices.get(id).filter(|v| v.id() == Some(id))
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(Vertex::position).collect()
    }

    /// Every UV layer used by at least one vertex.
    pub fn uv_layers(&self) -> BTreeSet<usize> {
        self.vertices
            .iter()
            .flat_map(|v| v.uvs().keys().copied())
            .collect()
    }

    pub fn uvs_for_layer(&self, layer: usize) -> Vec<Option<Vec2>> {
        self.vertices.iter().map(|v| v.uv(layer)).collect()
    }

    pub fn normals(&self) -> Vec<Option<Vec3>> {
        self.vertices.iter().map(Vertex::normal).collect()
    }

    pub fn colours(&self) -> Vec<Option<Vec4>> {
        self.vertices.iter().map(Vertex::colour).collect()
    }

    pub fn weight_set_indexes(&self) -> Vec<Option<usize>> {
        self.vertices.iter().map(Vertex::weight_set_index).collect()
    }

    pub fn weight_maps(&self) -> Vec<&BTreeMap<usize, f32>> {
        self.vertices.iter().map(Vertex::weights).collect()
    }

    /// Vertices carrying a post-bake weight for `group`.
    pub fn vertices_in_weight_group(&self, group: usize) -> Vec<&Vertex> {
        self.vertices
            .iter()
            .filter(|v| v.weights().contains_key(&group))
            .collect()
    }

    pub fn face_vertex_indices(&self) -> Vec<&[usize]> {
        self.faces.iter().map(Face::vertex_indices).collect()
    }
}

/// Collects mesh parts and checks every cross reference in [`MeshBuilder::build`].
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    weight_sets: BTreeMap<usize, Vec<f32>>,
    shapes: Vec<MeshShape>,
}

impl MeshBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            faces: Vec::new(),
            weight_sets: BTreeMap::new(),
            shapes: Vec::new(),
        }
    }

    #[must_use]
    pub fn vertex(mut self, vertex: Vertex) -> Self {
        self.vertices.push(vertex);
        self
    }

    #[must_use]
    pub fn vertices(mut self, vertices: impl IntoIterator<Item = Vertex>) -> Self {
        self.vertices.extend(vertices);
        self
    }

    #[must_use]
    pub fn face(mut self, face: Face) -> Self {
        self.faces.push(face);
        self
    }

    #[must_use]
    pub fn faces(mut self, faces: impl IntoIterator<Item = Face>) -> Self {
        self.faces.extend(faces);
        self
    }

    #[must_use]
    pub fn weight_set(mut self, index: usize, weights: Vec<f32>) -> Self {
        self.weight_sets.insert(index, weights);
        self
    }

    #[must_use]
    pub fn weight_sets(mut self, sets: BTreeMap<usize, Vec<f32>>) -> Self {
        self.weight_sets.extend(sets);
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: MeshShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// # Errors
    /// [`Error::InvalidReference`] if a face or shape names a vertex that
    /// does not exist, or a vertex names an unknown weight set;
    /// [`Error::TypeViolation`] for non-finite weight-set values.
    pub fn build(self) -> Result<Mesh> {
        let count = self.vertices.len();

        for face in &self.faces {
            if let Some(&bad) = face.vertex_indices.iter().find(|&&i| i >= count) {
                return Err(Error::reference("Face.vertex_indices", bad, count));
            }
        }

        for shape in &self.shapes {
            if let Some(&bad) = shape.vertices.keys().find(|&&i| i >= count) {
                return Err(Error::reference("MeshShape.vertices", bad, count));
            }
        }

        for vertex in &self.vertices {
            if let Some(index) = vertex.weight_set_index() {
                if !self.weight_sets.contains_key(&index) {
                    return Err(Error::reference(
                        "Vertex.weight_set_index",
                        index,
                        self.weight_sets.len(),
                    ));
                }
            }
        }

        for weights in self.weight_sets.values() {
            finite("Mesh.weight_sets", weights)?;
        }

        Ok(Mesh {
            name: self.name,
            vertices: self.vertices,
            faces: self.faces,
            weight_sets: self.weight_sets,
            shapes: self.shapes,
        })
    }
}
