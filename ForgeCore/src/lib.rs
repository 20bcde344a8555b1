//! # ForgeCore
//!
//! A pure-Rust core for importing skeletons and meshes from the binary
//! containers of several related game titles into one game-agnostic model.
//!
//! ## Layers
//!
//! - **[`binary`]** - endian-per-call primitive reads over any `Read`
//! - **[`model`]** - validated bones, skeletons, vertices, faces, shapes and meshes
//! - **[`skeleton`]** - basis conversion, roll math, tolerant bone comparison, mirroring
//! - **[`import`]** - the definitions/payload two-phase pipeline
//! - **[`config`]** - import options, loadable from TOML or JSON
//!
//! Per-title container layouts are not part of this crate; they plug in
//! through [`import::DefinitionParser`] and [`import::PayloadParser`].
//!
//! ## Quick Start
//!
//! ```
//! use forgecore::prelude::*;
//!
//! let skeleton = Skeleton::from_bones([
//!     Bone::builder("root").build()?,
//!     Bone::builder("spine").parent(0).position(&[0.0, 1.0, 0.0, 1.0]).build()?,
//! ])?;
//!
//! let resolved = resolve_skeleton(&skeleton, &ImportOptions::default());
//! assert_eq!(resolved.len(), 2);
//! # Ok::<(), forgecore::Error>(())
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod skeleton;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::binary::{Endian, read_cstring, read_f32, read_fixed_string, read_int, read_uint};
    pub use crate::config::ImportOptions;
    pub use crate::error::{Error, Result};

    pub use crate::model::{
        Bone, Face, ImportedPackage, Mesh, MeshHeader, MeshShape, Package, ShapeHeader, Skeleton,
        Vertex,
    };

    pub use crate::skeleton::{
        Equivalence, ResolvedBone, ResolvedSkeleton, Side, Tolerance, ToleranceMiss, clamp_roll,
        compare_bones, mirror_bone, resolve_skeleton, symmetrize,
    };

    pub use crate::import::{
        DefinitionParser, PayloadParser, PayloadTables, assemble, import_two_phase,
        resolve_skeletons,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
