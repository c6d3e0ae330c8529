//! Runtime configuration.
//!
//! Values come from an optional JSON file; CLI flags and environment
//! variables are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::Parallelism;

/// Default location of the reference dataset.
pub const DEFAULT_DATASET_PATH: &str = "dataset/cleaned_data.csv";

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "laptop_price_model.json";

/// What to do with a categorical value that is not in its observed domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    /// Log a warning and forward the value to the model.
    #[default]
    PassThrough,
    /// Fail the request before it reaches the model.
    Reject,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Paths and policies for one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Reference dataset (CSV with a header row).
    pub dataset_path: PathBuf,

    /// Model artifact (JSON pipeline).
    pub model_path: PathBuf,

    /// Handling of out-of-domain categorical input.
    pub domain_policy: DomainPolicy,

    /// Score batch rows on the rayon pool.
    pub parallel_batch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            domain_policy: DomainPolicy::default(),
            parallel_batch: false,
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parallelism(&self) -> Parallelism {
        Parallelism::from_flag(self.parallel_batch)
    }
}
