//! Fixture locations for integration tests.
//!
//! For fixture contents and stand-in regressors, use `laptop_price::testing`.

#![allow(dead_code)]

use std::path::PathBuf;

/// Base directory for test cases.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Reference dataset fixture.
pub fn dataset_path() -> PathBuf {
    test_cases_dir().join("laptops.csv")
}

/// Model artifact fixture.
pub fn model_path() -> PathBuf {
    test_cases_dir().join("laptop_price_model.json")
}
