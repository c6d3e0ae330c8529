//! Encoder + estimator pipeline loaded from a JSON artifact.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use super::encode::{CategoryIndex, ColumnEncoder, FeatureEncoder, HandleUnknown};
use super::forest::Forest;
use super::linear::LinearModel;
use super::schema::{
    EncoderSchema, EstimatorSchema, HandleUnknownSchema, PipelineSchema, TargetTransformSchema,
    FORMAT_VERSION,
};
use super::Regressor;
use crate::error::{ArtifactError, InferenceError};
use crate::record::FeatureTable;
use crate::utils::Parallelism;

/// Transform from estimator output back to price units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetTransform {
    #[default]
    Identity,
    Exp,
    Expm1,
}

impl TargetTransform {
    #[inline]
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            TargetTransform::Identity => raw,
            TargetTransform::Exp => raw.exp(),
            TargetTransform::Expm1 => raw.exp_m1(),
        }
    }
}

impl From<TargetTransformSchema> for TargetTransform {
    fn from(t: TargetTransformSchema) -> Self {
        match t {
            TargetTransformSchema::Identity => TargetTransform::Identity,
            TargetTransformSchema::Exp => TargetTransform::Exp,
            TargetTransformSchema::Expm1 => TargetTransform::Expm1,
        }
    }
}

impl From<HandleUnknownSchema> for HandleUnknown {
    fn from(h: HandleUnknownSchema) -> Self {
        match h {
            HandleUnknownSchema::Error => HandleUnknown::Error,
            HandleUnknownSchema::Ignore => HandleUnknown::Ignore,
        }
    }
}

/// The fitted estimator.
#[derive(Debug, Clone)]
pub enum Estimator {
    Forest(Forest),
    Linear(LinearModel),
}

impl Estimator {
    fn predict(&self, features: ndarray::ArrayView2<'_, f32>, parallelism: Parallelism) -> Vec<f64> {
        match self {
            Estimator::Forest(forest) => forest.predict(features, parallelism),
            Estimator::Linear(linear) => linear.predict(features),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Forest(_) => "forest",
            Estimator::Linear(_) => "linear",
        }
    }

    /// Number of trees; zero for a linear estimator.
    pub fn n_trees(&self) -> usize {
        match self {
            Estimator::Forest(forest) => forest.n_trees(),
            Estimator::Linear(_) => 0,
        }
    }
}

/// Column encoders, an estimator and an output transform.
#[derive(Debug, Clone)]
pub struct PipelineModel {
    encoder: FeatureEncoder,
    estimator: Estimator,
    target_transform: TargetTransform,
    parallelism: Parallelism,
    description: Option<String>,
}

impl PipelineModel {
    /// Load an artifact from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let model = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            estimator = model.estimator.kind(),
            trees = model.estimator.n_trees(),
            n_features = model.n_features(),
            target_transform = ?model.target_transform(),
            description = model.description().unwrap_or_default(),
            "loaded model artifact"
        );
        Ok(model)
    }

    /// Parse an artifact from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let schema: PipelineSchema = serde_json::from_reader(reader)?;
        Self::from_schema(schema)
    }

    /// Convert and validate a parsed artifact.
    pub fn from_schema(schema: PipelineSchema) -> Result<Self, ArtifactError> {
        if schema.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(schema.format_version));
        }

        let columns = schema
            .columns
            .into_iter()
            .map(|col| {
                let encoder = convert_encoder(&col.name, col.encoder)?;
                Ok((col.name, encoder))
            })
            .collect::<Result<Vec<_>, ArtifactError>>()?;
        let encoder = FeatureEncoder::new(columns);
        let n_features = encoder.n_features();

        let estimator = match &schema.estimator {
            EstimatorSchema::Forest(forest) => Estimator::Forest(
                Forest::from_schema(forest, n_features)
                    .map_err(|e| ArtifactError::InvalidModel(e.to_string()))?,
            ),
            EstimatorSchema::Linear(linear) => Estimator::Linear(
                LinearModel::from_schema(linear, n_features).map_err(ArtifactError::InvalidModel)?,
            ),
        };

        Ok(Self {
            encoder,
            estimator,
            target_transform: schema.target_transform.into(),
            parallelism: Parallelism::Sequential,
            description: schema.description,
        })
    }

    /// Allow row-parallel prediction for multi-row tables.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn target_transform(&self) -> TargetTransform {
        self.target_transform
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Width of the encoded feature matrix.
    pub fn n_features(&self) -> usize {
        self.encoder.n_features()
    }
}

fn convert_encoder(name: &str, schema: EncoderSchema) -> Result<ColumnEncoder, ArtifactError> {
    let index = |categories: Vec<String>| {
        CategoryIndex::new(categories).map_err(|dup| {
            ArtifactError::InvalidModel(format!("column {name:?} lists category {dup:?} twice"))
        })
    };
    Ok(match schema {
        EncoderSchema::Numeric => ColumnEncoder::Numeric,
        EncoderSchema::Ordinal {
            categories,
            handle_unknown,
        } => ColumnEncoder::Ordinal {
            index: index(categories)?,
            handle_unknown: handle_unknown.into(),
        },
        EncoderSchema::OneHot {
            categories,
            handle_unknown,
        } => ColumnEncoder::OneHot {
            index: index(categories)?,
            handle_unknown: handle_unknown.into(),
        },
    })
}

impl Regressor for PipelineModel {
    fn infer(&self, table: &FeatureTable) -> Result<Vec<f64>, InferenceError> {
        let features = self.encoder.encode(table)?;
        let raw = self.estimator.predict(features.view(), self.parallelism);
        Ok(raw.into_iter().map(|v| self.target_transform.apply(v)).collect())
    }

    fn input_columns(&self) -> Option<Vec<&str>> {
        Some(self.encoder.column_names())
    }
}
