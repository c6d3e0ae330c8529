//! Prediction service.
//!
//! [`load`] is the only way to obtain a [`Context`], so holding one means
//! both artifacts were read and checked. A context is immutable and can be
//! shared across threads; every call to [`Context::predict`] is independent.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ArtifactError, ArtifactKind, Error, InferenceError, Result};
use crate::model::{PipelineModel, Regressor};
use crate::quote::PriceQuote;
use crate::record::{Column, FeatureTable, LaptopRecord};
use crate::reference::{self, CategoricalDomains};
use crate::utils::Parallelism;

/// Loaded reference domains and model.
pub struct Context {
    domains: CategoricalDomains,
    model: Box<dyn Regressor>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}

/// Load the reference dataset and the bundled pipeline model.
///
/// Fails with [`Error::MissingArtifact`] if either file is absent,
/// unreadable, malformed or declares a column layout other than the record
/// schema.
pub fn load(dataset_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Context> {
    load_inner(dataset_path.as_ref(), model_path.as_ref(), Parallelism::Sequential)
}

/// Like [`load`], with paths and batch parallelism taken from `config`.
pub fn load_with(config: &Config) -> Result<Context> {
    load_inner(&config.dataset_path, &config.model_path, config.parallelism())
}

fn load_inner(dataset_path: &Path, model_path: &Path, parallelism: Parallelism) -> Result<Context> {
    let domains = reference::load_domains(dataset_path)
        .map_err(|e| Error::missing(ArtifactKind::Dataset, dataset_path, e))?;
    let model = PipelineModel::load_json(model_path)
        .map_err(|e| Error::missing(ArtifactKind::Model, model_path, e))?
        .with_parallelism(parallelism);
    Context::new(domains, model).map_err(|e| Error::missing(ArtifactKind::Model, model_path, e))
}

impl Context {
    /// Assemble a context from already-loaded parts.
    ///
    /// If the model declares its input columns they must equal the record
    /// schema, name for name and in order.
    pub fn new<R>(domains: CategoricalDomains, model: R) -> Result<Self, ArtifactError>
    where
        R: Regressor + 'static,
    {
        if let Some(found) = model.input_columns() {
            let expected = Column::names();
            if found != expected {
                return Err(ArtifactError::SchemaMismatch {
                    expected: expected.into_iter().map(String::from).collect(),
                    found: found.into_iter().map(String::from).collect(),
                });
            }
        }
        info!(
            categorical_columns = domains.iter().count(),
            reference_rows = domains.n_rows(),
            "prediction context ready"
        );
        Ok(Self {
            domains,
            model: Box::new(model),
        })
    }

    /// Categorical choice lists derived from the reference dataset.
    pub fn domains(&self) -> &CategoricalDomains {
        &self.domains
    }

    /// Predict the price of one laptop.
    pub fn predict(&self, record: &LaptopRecord) -> Result<PriceQuote, InferenceError> {
        let table = record.to_table();
        let price = self.infer(&table)?[0];
        let quote = PriceQuote::new(price)?;
        debug!(brand = %record.brand, name = %record.name, price, "predicted");
        Ok(quote)
    }

    /// Predict many laptops with a single model call.
    ///
    /// Fails as a whole if the model fails or any output is not finite.
    pub fn predict_batch(&self, records: &[LaptopRecord]) -> Result<Vec<PriceQuote>, InferenceError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let table = FeatureTable::from_records(records);
        let prices = self.infer(&table)?;
        debug!(rows = records.len(), "predicted batch");
        prices.into_iter().map(PriceQuote::new).collect()
    }

    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        let out = self.model.infer(table)?;
        if out.len() != table.n_rows() {
            return Err(InferenceError::OutputLength {
                expected: table.n_rows(),
                actual: out.len(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::reference::read_domains;
    use crate::testing::{
        ConstantRegressor, EchoRegressor, FailingRegressor, HP_VICTUS_PRICE, MODEL_JSON, REFERENCE_CSV,
    };
    use std::sync::Arc;

    fn domains() -> CategoricalDomains {
        read_domains(REFERENCE_CSV.as_bytes()).unwrap()
    }

    fn fixture_context() -> Context {
        let model = PipelineModel::from_reader(MODEL_JSON.as_bytes()).unwrap();
        Context::new(domains(), model).unwrap()
    }

    #[test]
    fn predicts_fixture_price() {
        let quote = fixture_context().predict(&presets::hp_victus()).unwrap();
        assert_eq!(quote.price(), HP_VICTUS_PRICE);
        assert_eq!(quote.to_string(), "💰 Predicted Price: ₹62,990.50");
    }

    #[test]
    fn prediction_is_deterministic() {
        let ctx = fixture_context();
        let record = presets::lenovo_yoga();
        assert_eq!(
            ctx.predict(&record).unwrap().to_string(),
            ctx.predict(&record).unwrap().to_string()
        );
    }

    #[test]
    fn batch_matches_single_predictions() {
        let ctx = fixture_context();
        let records = presets::all();
        let batch = ctx.predict_batch(&records).unwrap();
        let single: Vec<_> = records.iter().map(|r| ctx.predict(r).unwrap()).collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn empty_batch_skips_the_model() {
        let model = Arc::new(ConstantRegressor::new(1.0));
        let ctx = Context::new(domains(), Arc::clone(&model)).unwrap();
        assert!(ctx.predict_batch(&[]).unwrap().is_empty());
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn model_sees_record_values() {
        let ctx = Context::new(domains(), EchoRegressor { column: "Ram" }).unwrap();
        assert_eq!(ctx.predict(&presets::hp_victus()).unwrap().price(), 8.0);

        let ctx = Context::new(domains(), EchoRegressor { column: "display_size" }).unwrap();
        let price = ctx.predict(&presets::lenovo_yoga()).unwrap().price();
        assert_eq!(price, 14.0);
    }

    #[test]
    fn failure_leaves_context_usable() {
        let ctx = Context::new(domains(), FailingRegressor).unwrap();
        assert!(matches!(
            ctx.predict(&presets::hp_victus()),
            Err(InferenceError::Backend(_))
        ));

        let ctx = fixture_context();
        let mut bad = presets::hp_victus();
        bad.ram_type = "DDR6".into();
        assert!(matches!(
            ctx.predict(&bad),
            Err(InferenceError::UnknownCategory { .. })
        ));
        assert!(ctx.predict(&presets::hp_victus()).is_ok());
    }

    #[test]
    fn non_finite_output_is_an_inference_error() {
        let ctx = Context::new(domains(), ConstantRegressor::new(f64::NAN)).unwrap();
        assert!(matches!(
            ctx.predict(&presets::acer_aspire()),
            Err(InferenceError::NonFinite(_))
        ));
    }

    #[test]
    fn short_output_is_an_inference_error() {
        struct Empty;
        impl Regressor for Empty {
            fn infer(&self, _table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
                Ok(Vec::new())
            }
        }
        let ctx = Context::new(domains(), Empty).unwrap();
        assert_eq!(
            ctx.predict(&presets::acer_aspire()).unwrap_err(),
            InferenceError::OutputLength {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn permuted_model_columns_are_rejected() {
        struct Permuted;
        impl Regressor for Permuted {
            fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
                Ok(vec![0.0; table.n_rows()])
            }
            fn input_columns(&self) -> Option<Vec<&str>> {
                let mut names = Column::names();
                names.swap(0, 1);
                Some(names)
            }
        }
        let err = Context::new(domains(), Permuted).unwrap_err();
        assert!(matches!(err, ArtifactError::SchemaMismatch { .. }));
    }

    #[test]
    fn concurrent_predictions_agree() {
        let ctx = fixture_context();
        let expected = ctx.predict(&presets::hp_victus()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| ctx.predict(&presets::hp_victus()).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
