//! Test fixtures and stand-in regressors.
//!
//! Shared by unit tests and the integration tests under `tests/`. The
//! fixture files live in `tests/test-cases/` and are embedded here so unit
//! tests do not depend on the working directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::InferenceError;
use crate::model::Regressor;
use crate::record::{Column, FeatureTable};

/// Reference dataset fixture (five laptops, includes the three presets).
pub const REFERENCE_CSV: &str = include_str!("../tests/test-cases/laptops.csv");

/// Model artifact fixture: a four-tree ensemble over all fifteen columns.
pub const MODEL_JSON: &str = include_str!("../tests/test-cases/laptop_price_model.json");

/// Fixture model output for [`crate::presets::hp_victus`].
pub const HP_VICTUS_PRICE: f64 = 62_990.5;
/// Fixture model output for [`crate::presets::acer_aspire`].
pub const ACER_ASPIRE_PRICE: f64 = 49_000.0;
/// Fixture model output for [`crate::presets::lenovo_yoga`].
pub const LENOVO_YOGA_PRICE: f64 = 49_750.0;

/// Write both fixtures into `dir`, returning `(dataset_path, model_path)`.
pub fn write_fixtures(dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
    let dataset = dir.join("cleaned_data.csv");
    let model = dir.join("laptop_price_model.json");
    std::fs::write(&dataset, REFERENCE_CSV)?;
    std::fs::write(&model, MODEL_JSON)?;
    Ok((dataset, model))
}

/// Regressor returning the same value for every row.
///
/// Declares the record columns and counts calls.
#[derive(Debug, Default)]
pub struct ConstantRegressor {
    pub value: f64,
    calls: AtomicUsize,
}

impl ConstantRegressor {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Regressor for ConstantRegressor {
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.value; table.n_rows()])
    }

    fn input_columns(&self) -> Option<Vec<&str>> {
        Some(Column::names())
    }
}

/// Regressor that always fails.
#[derive(Debug, Default)]
pub struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn infer(&self, _table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError::Backend("backend unavailable".into()))
    }
}

/// Regressor that echoes one numeric column, for checking what reached the model.
#[derive(Debug)]
pub struct EchoRegressor {
    pub column: &'static str,
}

impl Regressor for EchoRegressor {
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        let column = table
            .column(self.column)
            .ok_or_else(|| InferenceError::Backend(format!("no column {}", self.column)))?;
        (0..table.n_rows())
            .map(|row| {
                column.data().number(row).ok_or_else(|| InferenceError::TypeMismatch {
                    column: self.column.to_string(),
                    expected: "numeric",
                })
            })
            .collect()
    }
}
