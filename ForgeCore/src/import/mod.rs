//! Two-phase import pipeline
//!
//! Some titles keep skeletons and mesh descriptors in a definitions file and
//! the bulk vertex and face data in a separate payload file. An import runs
//! as two pure steps joined by a [`Package`]:
//!
//! 1. a [`DefinitionParser`] reads the definitions into a `Package`
//! 2. a [`PayloadParser`] reads the payload into [`PayloadTables`], and
//!    [`assemble`] joins the two into an [`ImportedPackage`]
//!
//! Per-title parsers implement the two traits; nothing in here knows about
//! container layouts.

mod tables;

pub use tables::{FaceTable, PayloadTables, ShapeTable, VertexTable, WeightTable};

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::{Read, Seek};

use crate::config::ImportOptions;
use crate::error::{Error, Result};
use crate::model::{ImportedPackage, Mesh, MeshHeader, MeshShape, Package};
use crate::skeleton::{ResolvedSkeleton, resolve_skeleton};

/// Reads a definitions file.
pub trait DefinitionParser {
    /// # Errors
    /// Malformed input, model construction failures, or [`Error::Parse`].
    fn parse_definitions<R: Read + Seek>(&self, reader: &mut R) -> Result<Package>;
}

/// Reads a payload file, guided by the definitions already parsed.
pub trait PayloadParser {
    /// # Errors
    /// Malformed input, model construction failures, or [`Error::Parse`].
    fn parse_payload<R: Read + Seek>(
        &self,
        reader: &mut R,
        package: &Package,
    ) -> Result<PayloadTables>;
}

/// Join definitions and payload tables into meshes.
///
/// Only the most detailed LOD is kept unless `options.also_import_lods` is
/// set. Each mesh takes its vertices from the header's vertex table and its
/// faces from the header's face table, stamped with the header's material.
/// Weight sets come from the vertex table's weight table, or from
/// `options.weight_table_override` for every mesh when set. Shapes attach to
/// every mesh built from the vertex table they displace. Meshes are
/// reindexed before they are returned.
///
/// # Errors
/// [`Error::InvalidOption`] for bad options, `Missing*Table` when a header
/// names a table the payload lacks, and any mesh validation failure.
pub fn assemble(
    package: &Package,
    tables: &PayloadTables,
    options: &ImportOptions,
) -> Result<ImportedPackage> {
    options.validate()?;

    let best_lod = package.best_lod();
    let headers: Vec<&MeshHeader> = package
        .mesh_headers()
        .iter()
        .filter(|h| options.also_import_lods || Some(h.lod()) == best_lod)
        .collect();

    tracing::debug!(
        "Assembling {} of {} mesh header(s) (best LOD {:?})",
        headers.len(),
        package.mesh_headers().len(),
        best_lod
    );

    let mut imported = ImportedPackage::default();
    imported.push_skeleton(package.skeleton().clone());

    for header in headers {
        let mesh = assemble_mesh(package, header, tables, options, best_lod)?;
        tracing::debug!(
            "Built {} with {} vertices, {} faces, {} shapes",
            mesh.name(),
            mesh.vertices().len(),
            mesh.faces().len(),
            mesh.shapes().len()
        );
        imported.push_mesh(mesh);
    }

    tracing::info!("Assembled {} mesh(es)", imported.meshes().len());
    Ok(imported)
}

fn assemble_mesh(
    package: &Package,
    header: &MeshHeader,
    tables: &PayloadTables,
    options: &ImportOptions,
    best_lod: Option<u32>,
) -> Result<Mesh> {
    let mesh_id = header.mesh_id();
    let vertex_index = header.vertex_table_index();

    let vertex_table = tables
        .vertex_tables
        .get(vertex_index)
        .ok_or(Error::MissingVertexTable {
            mesh_id,
            index: vertex_index,
        })?;
    let face_table = tables
        .face_tables
        .get(header.face_table_index())
        .ok_or(Error::MissingFaceTable {
            mesh_id,
            index: header.face_table_index(),
        })?;

    let weight_sets = match options.weight_table_override.or(vertex_table.weight_table) {
        Some(index) => tables
            .weight_tables
            .get(index)
            .ok_or(Error::MissingWeightTable { mesh_id, index })?
            .sets
            .clone(),
        None => BTreeMap::new(),
    };

    let name = if Some(header.lod()) == best_lod {
        format!("mesh{mesh_id}")
    } else {
        format!("mesh{mesh_id}_lod{}", header.lod())
    };

    let mut builder = Mesh::builder(name)
        .vertices(vertex_table.vertices.iter().cloned())
        .faces(
            face_table
                .faces
                .iter()
                .map(|f| f.clone().with_material(header.material_index())),
        )
        .weight_sets(weight_sets);

    for shape in package
        .shape_headers()
        .iter()
        .filter(|s| s.vertex_table_index() == vertex_index)
    {
        let table = tables
            .shape_tables
            .get(shape.shape_table_index())
            .ok_or_else(|| Error::MissingShapeTable {
                name: shape.name().to_string(),
                index: shape.shape_table_index(),
            })?;
        builder = builder.shape(MeshShape::new(
            shape.name(),
            vertex_index,
            table.vertices.clone(),
        ));
    }

    let mut mesh = builder.build()?;
    mesh.reindex();
    Ok(mesh)
}

/// Run both phases of an import.
///
/// # Errors
/// Whatever either parser or [`assemble`] reports. A failure abandons this
/// import only.
pub fn import_two_phase<D, P, R1, R2>(
    definitions: &mut R1,
    payload: &mut R2,
    definition_parser: &D,
    payload_parser: &P,
    options: &ImportOptions,
) -> Result<ImportedPackage>
where
    D: DefinitionParser,
    P: PayloadParser,
    R1: Read + Seek,
    R2: Read + Seek,
{
    let package = definition_parser.parse_definitions(definitions)?;
    tracing::info!(
        "Parsed definitions: {} bone(s), {} mesh header(s), {} shape header(s)",
        package.skeleton().len(),
        package.mesh_headers().len(),
        package.shape_headers().len()
    );

    let tables = payload_parser.parse_payload(payload, &package)?;
    tracing::info!(
        "Parsed payload: {} vertex table(s), {} face table(s), {} weight table(s), {} shape table(s)",
        tables.vertex_tables.len(),
        tables.face_tables.len(),
        tables.weight_tables.len(),
        tables.shape_tables.len()
    );

    assemble(&package, &tables, options)
}

/// Import a definitions file on its own: skeleton only, no meshes.
///
/// # Errors
/// Whatever the parser reports.
pub fn import_definitions_only<D, R>(definitions: &mut R, parser: &D) -> Result<ImportedPackage>
where
    D: DefinitionParser,
    R: Read + Seek,
{
    let package = parser.parse_definitions(definitions)?;
    tracing::info!("Parsed definitions: {} bone(s)", package.skeleton().len());
    Ok(package.into_imported())
}

/// Resolve every skeleton of an import into host bones, in parallel.
pub fn resolve_skeletons(
    imported: &ImportedPackage,
    options: &ImportOptions,
) -> Vec<ResolvedSkeleton> {
    imported
        .skeletons()
        .par_iter()
        .map(|skeleton| resolve_skeleton(skeleton, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bone, Face, ShapeHeader, Skeleton, Vertex};

    fn vertex(x: f32) -> Vertex {
        Vertex::builder().position(&[x, 0.0, 0.0]).build().unwrap()
    }

    fn triangle_table() -> VertexTable {
        VertexTable {
            vertices: (0..3).map(|i| vertex(i as f32)).collect(),
            weight_table: None,
        }
    }

    fn package(headers: Vec<MeshHeader>, shapes: Vec<ShapeHeader>) -> Package {
        let skeleton = Skeleton::from_bones([Bone::builder("root").build().unwrap()]).unwrap();
        Package::new(skeleton, headers, shapes)
    }

    fn tables() -> PayloadTables {
        PayloadTables {
            vertex_tables: vec![triangle_table(), triangle_table()],
            weight_tables: Vec::new(),
            face_tables: vec![FaceTable {
                faces: vec![Face::new(vec![0, 1, 2], 0).unwrap()],
            }],
            shape_tables: Vec::new(),
        }
    }

    #[test]
    fn test_best_lod_only() {
        let package = package(
            vec![
                MeshHeader::new(0, 0, 0, 0, 4, 1),
                MeshHeader::new(1, 0, 1, 0, 4, 2),
            ],
            Vec::new(),
        );
        let imported = assemble(&package, &tables(), &ImportOptions::default()).unwrap();
        let names: Vec<_> = imported.meshes().iter().map(Mesh::name).collect();
        assert_eq!(names, vec!["mesh0"]);
        assert_eq!(imported.meshes()[0].faces()[0].material_index(), 4);
        assert!(imported.meshes()[0].is_indexed());
        assert_eq!(imported.skeletons().len(), 1);

        let all = assemble(&package, &tables(), &ImportOptions::default().with_all_lods()).unwrap();
        let names: Vec<_> = all.meshes().iter().map(Mesh::name).collect();
        assert_eq!(names, vec!["mesh0", "mesh1_lod2"]);
    }

    #[test]
    fn test_missing_tables() {
        let options = ImportOptions::default();
        let missing_vertices = package(vec![MeshHeader::new(7, 0, 5, 0, 0, 0)], Vec::new());
        assert!(matches!(
            assemble(&missing_vertices, &tables(), &options),
            Err(Error::MissingVertexTable { mesh_id: 7, index: 5 })
        ));

        let missing_faces = package(vec![MeshHeader::new(7, 0, 0, 3, 0, 0)], Vec::new());
        assert!(matches!(
            assemble(&missing_faces, &tables(), &options),
            Err(Error::MissingFaceTable { mesh_id: 7, index: 3 })
        ));

        let missing_shape = package(
            vec![MeshHeader::new(7, 0, 0, 0, 0, 0)],
            vec![ShapeHeader::new("blink", 0, 2)],
        );
        assert!(matches!(
            assemble(&missing_shape, &tables(), &options),
            Err(Error::MissingShapeTable { index: 2, .. })
        ));

        let missing_weights = package(vec![MeshHeader::new(7, 0, 0, 0, 0, 0)], Vec::new());
        assert!(matches!(
            assemble(&missing_weights, &tables(), &options.clone().with_weight_table_override(1)),
            Err(Error::MissingWeightTable { mesh_id: 7, index: 1 })
        ));
    }

    #[test]
    fn test_shapes_follow_vertex_table() {
        let package = package(
            vec![
                MeshHeader::new(0, 0, 0, 0, 0, 0),
                MeshHeader::new(1, 0, 1, 0, 0, 0),
            ],
            vec![ShapeHeader::new("blink", 1, 0)],
        );
        let mut tables = tables();
        tables.shape_tables.push(ShapeTable {
            vertices: BTreeMap::from([(2, vertex(9.0))]),
        });

        let imported = assemble(&package, &tables, &ImportOptions::default()).unwrap();
        assert!(!imported.meshes()[0].has_shapes());
        let shapes = imported.meshes()[1].shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].name(), "blink");
        assert_eq!(shapes[0].vertex_table_index(), 1);
    }

    #[test]
    fn test_weight_table_override() {
        let package = package(vec![MeshHeader::new(0, 0, 0, 0, 0, 0)], Vec::new());
        let mut tables = tables();
        tables.vertex_tables[0].weight_table = Some(0);
        tables.vertex_tables[0].vertices[0] = vertex(0.0).with_weight_set(Some(1));
        tables.weight_tables = vec![
            WeightTable {
                sets: BTreeMap::from([(1, vec![1.0])]),
            },
            WeightTable {
                sets: BTreeMap::from([(1, vec![0.5, 0.5])]),
            },
        ];

        let native = assemble(&package, &tables, &ImportOptions::default()).unwrap();
        assert_eq!(native.meshes()[0].weight_set(1), Some(&[1.0][..]));

        let forced = assemble(
            &package,
            &tables,
            &ImportOptions::default().with_weight_table_override(1),
        )
        .unwrap();
        assert_eq!(forced.meshes()[0].weight_set(1), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn test_no_mesh_headers() {
        let imported = assemble(
            &package(Vec::new(), Vec::new()),
            &PayloadTables::default(),
            &ImportOptions::default(),
        )
        .unwrap();
        assert!(imported.meshes().is_empty());
        assert_eq!(imported.skeletons().len(), 1);
    }

    #[test]
    fn test_resolve_every_skeleton() {
        let skeleton = package(Vec::new(), Vec::new()).skeleton().clone();
        let imported = ImportedPackage::new(vec![skeleton.clone(), skeleton], Vec::new());
        let resolved = resolve_skeletons(&imported, &ImportOptions::default());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0], resolved[1]);
    }
}
