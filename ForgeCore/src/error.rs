//! Error types for `ForgeCore`

use thiserror::Error;

/// The error type for `ForgeCore` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from the underlying stream.
    #[error("IO error: {0}")]
    Io(std::io::Error),

    // ==================== Malformed Input ====================
    /// A read ran past the end of the stream.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// An integer read was requested with a width other than 1, 2 or 4 bytes.
    #[error("invalid integer width: {width} bytes (supported: 1, 2, 4)")]
    InvalidWidth {
        /// The requested width in bytes.
        width: usize,
    },

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== Construction Errors ====================
    /// A fixed-length vector had the wrong number of components.
    #[error("{field}: expected {expected} components, found {found}")]
    ShapeViolation {
        /// The field being set.
        field: &'static str,
        /// The declared dimensionality.
        expected: usize,
        /// The number of components supplied.
        found: usize,
    },

    /// A value was of the wrong kind for its field.
    #[error("{field}: {message}")]
    TypeViolation {
        /// The field being set.
        field: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// An index pointed outside of (or ahead of) the sequence it refers to.
    #[error("{field}: index {index} does not reference one of the {len} known entries")]
    InvalidReference {
        /// The referencing field.
        field: &'static str,
        /// The offending index.
        index: usize,
        /// Number of entries the index may refer to.
        len: usize,
    },

    // ==================== Import Pipeline Errors ====================
    /// A mesh header names a vertex table the payload does not contain.
    #[error("mesh {mesh_id}: vertex table {index} not found in payload")]
    MissingVertexTable {
        /// The mesh ID from the header.
        mesh_id: u32,
        /// The missing table index.
        index: usize,
    },

    /// A mesh header names a face table the payload does not contain.
    #[error("mesh {mesh_id}: face table {index} not found in payload")]
    MissingFaceTable {
        /// The mesh ID from the header.
        mesh_id: u32,
        /// The missing table index.
        index: usize,
    },

    /// A vertex table (or the configured override) names a weight table the
    /// payload does not contain.
    #[error("mesh {mesh_id}: weight table {index} not found in payload")]
    MissingWeightTable {
        /// The mesh ID from the header.
        mesh_id: u32,
        /// The missing table index.
        index: usize,
    },

    /// A shape header names a shape table the payload does not contain.
    #[error("shape '{name}': shape table {index} not found in payload")]
    MissingShapeTable {
        /// The shape name from the header.
        name: String,
        /// The missing table index.
        index: usize,
    },

    /// A per-title parser rejected its input.
    #[error("parse error: {message}")]
    Parse {
        /// Description of what could not be parsed.
        message: String,
    },

    // ==================== Configuration Errors ====================
    /// TOML import options could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML import options could not be serialized.
    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An import option is out of range.
    #[error("invalid import option {option}: {message}")]
    InvalidOption {
        /// The option name.
        option: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

// Stream exhaustion is reported as malformed input rather than a generic IO failure
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

impl Error {
    /// Whether this error means the input bytes themselves were unusable
    /// (as opposed to a model construction or pipeline problem).
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::UnexpectedEof | Error::InvalidWidth { .. } | Error::Utf8Error(_)
        )
    }

    pub(crate) fn shape(field: &'static str, expected: usize, found: usize) -> Self {
        Error::ShapeViolation {
            field,
            expected,
            found,
        }
    }

    pub(crate) fn kind(field: &'static str, message: impl Into<String>) -> Self {
        Error::TypeViolation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn reference(field: &'static str, index: usize, len: usize) -> Self {
        Error::InvalidReference { field, index, len }
    }
}

/// A specialized Result type for `ForgeCore` operations.
pub type Result<T> = std::result::Result<T, Error>;
