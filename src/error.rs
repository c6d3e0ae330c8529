//! Error types.
//!
//! Two kinds of failure exist:
//!
//! - [`Error::MissingArtifact`]: the reference dataset or the model artifact
//!   could not be loaded. Raised only by [`crate::service::load`], fatal for
//!   the process.
//! - [`InferenceError`]: a single prediction failed. The loaded state is
//!   untouched and later requests are served normally.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which startup artifact failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The reference dataset (CSV).
    Dataset,
    /// The serialized model.
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Dataset => f.write_str("reference dataset"),
            ArtifactKind::Model => f.write_str("model artifact"),
        }
    }
}

/// Top-level error returned by the service layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A startup artifact is absent, unreadable or unusable.
    #[error("{artifact} {path:?} could not be loaded: {source}")]
    MissingArtifact {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    /// The model could not produce a prediction for a request.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl Error {
    pub(crate) fn missing(artifact: ArtifactKind, path: impl Into<PathBuf>, source: ArtifactError) -> Self {
        Error::MissingArtifact {
            artifact,
            path: path.into(),
            source,
        }
    }
}

/// Reasons an artifact file cannot be turned into usable state.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// I/O error while opening or reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the dataset header.
    #[error("column {0:?} not found in header")]
    MissingColumn(String),

    /// The artifact's declared input columns differ from the record schema.
    #[error("schema mismatch: model expects {found:?}, record schema is {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The artifact was written by an unsupported format version.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    /// Structurally invalid model content.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Failure to produce a prediction for one request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// The table's columns differ from those the model was trained with.
    #[error("column mismatch: model expects {expected:?}, got {found:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A column holds values of the wrong type for its encoder.
    #[error("column {column:?} expected {expected} values")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    /// A categorical level the encoder was not fitted on.
    #[error("unknown category {value:?} for column {column:?}")]
    UnknownCategory { column: String, value: String },

    /// The model produced a NaN or infinite value.
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    /// The model returned a different number of outputs than input rows.
    #[error("model returned {actual} predictions for {expected} rows")]
    OutputLength { expected: usize, actual: usize },

    /// Backend-specific failure.
    #[error("inference failed: {0}")]
    Backend(String),
}

/// Result alias for service operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
