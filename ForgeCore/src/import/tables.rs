//! Decoded payload tables, addressed by index from the definitions

use std::collections::BTreeMap;

use crate::model::{Face, Vertex};

/// One vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexTable {
    pub vertices: Vec<Vertex>,
    /// Weight table the vertices' weight-set indices refer to, if any
    pub weight_table: Option<usize>,
}

/// Shared pre-bake weight sets, keyed by weight-set index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    pub sets: BTreeMap<usize, Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceTable {
    pub faces: Vec<Face>,
}

/// Displaced vertices of one morph shape, keyed by base vertex index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeTable {
    pub vertices: BTreeMap<usize, Vertex>,
}

/// Everything a payload parse produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadTables {
    pub vertex_tables: Vec<VertexTable>,
    pub weight_tables: Vec<WeightTable>,
    pub face_tables: Vec<FaceTable>,
    pub shape_tables: Vec<ShapeTable>,
}
