//! Game-agnostic intermediate asset model
//!
//! Per-title parsers decode their own container layouts and build these
//! types; everything downstream (geometry engine, host scene construction)
//! only ever sees this model.
//!
//! Entities are created through a single validating builder pass. Fixed-size
//! vectors arrive as slices straight from decoded tables and must have the
//! declared number of components; nothing is padded, truncated or coerced.
//! Cross references are plain indices into the owning sequence and are
//! checked when the owner is built.

mod bone;
mod mesh;
mod package;
mod vertex;

pub use bone::{Bone, BoneBuilder, NO_PARENT_RAW, Skeleton};
pub use mesh::{Face, Mesh, MeshBuilder, MeshShape};
pub use package::{ImportedPackage, MeshHeader, Package, ShapeHeader};
pub use vertex::{NO_WEIGHT_SET_RAW, Vertex, VertexBuilder};

use crate::error::{Error, Result};

/// Check that `values` holds exactly `N` finite components.
fn fixed<const N: usize>(field: &'static str, values: &[f32]) -> Result<[f32; N]> {
    let array: [f32; N] = values
        .try_into()
        .map_err(|_| Error::shape(field, N, values.len()))?;
    finite(field, &array)?;
    Ok(array)
}

fn finite(field: &'static str, values: &[f32]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(Error::kind(field, format!("expected finite values, found {bad}"))),
        None => Ok(()),
    }
}
