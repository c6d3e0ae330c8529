//! The prediction model boundary and the bundled pipeline backend.
//!
//! The service only knows the [`Regressor`] trait: a table in, one value
//! per row out. [`PipelineModel`] is the backend shipped with the crate,
//! loaded from a JSON artifact that carries its own column encoders and a
//! tree-ensemble or linear estimator. Any other backend can be plugged in
//! through [`crate::service::Context::new`].

pub mod encode;
pub mod forest;
pub mod linear;
pub mod pipeline;
pub mod schema;
pub mod tree;

use std::sync::Arc;

use crate::error::InferenceError;
use crate::record::FeatureTable;

pub use pipeline::{Estimator, PipelineModel, TargetTransform};

/// A fitted regression model.
///
/// Implementations must be side-effect free: the service calls `infer`
/// from any number of threads at once without synchronization.
pub trait Regressor: Send + Sync {
    /// Predict one value per table row.
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError>;

    /// Input columns the model was fitted on, in order, if it declares them.
    ///
    /// When declared, the service checks them against the record schema at
    /// load time.
    fn input_columns(&self) -> Option<Vec<&str>> {
        None
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        (**self).infer(table)
    }

    fn input_columns(&self) -> Option<Vec<&str>> {
        (**self).input_columns()
    }
}

impl<R: Regressor + ?Sized> Regressor for Arc<R> {
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        (**self).infer(table)
    }

    fn input_columns(&self) -> Option<Vec<&str>> {
        (**self).input_columns()
    }
}
