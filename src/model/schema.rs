//! Serialization schema of the model artifact.
//!
//! These types mirror the JSON file one-to-one and carry no behavior. They
//! are converted into runtime types by [`super::pipeline::PipelineModel`],
//! which validates structure on the way in.

use serde::{Deserialize, Serialize};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// Top-level artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSchema {
    /// Format version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Input columns with their encoders, in training order.
    pub columns: Vec<ColumnSchema>,
    /// The fitted estimator.
    pub estimator: EstimatorSchema,
    /// Transform applied to the estimator output.
    #[serde(default)]
    pub target_transform: TargetTransformSchema,
    /// Free-form description (training date, source notebook, metrics).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One input column and its encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub encoder: EncoderSchema,
}

/// How a column is turned into model features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderSchema {
    /// Numeric passthrough (one feature).
    Numeric,
    /// Category index (one feature).
    Ordinal {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknownSchema,
    },
    /// One indicator feature per category.
    OneHot {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknownSchema,
    },
}

/// Policy for categorical levels not seen during fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknownSchema {
    /// Fail the prediction.
    #[default]
    Error,
    /// Encode as missing (ordinal) or all-zero (one-hot).
    Ignore,
}

/// Output transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransformSchema {
    #[default]
    Identity,
    /// Model was trained on `ln(price)`.
    Exp,
    /// Model was trained on `ln(1 + price)`.
    Expm1,
}

/// Estimator variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSchema {
    Forest(ForestSchema),
    Linear(LinearSchema),
}

/// Additive tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    /// Starting value added to every prediction.
    #[serde(default)]
    pub base_score: f64,
    /// Trees in boosting order.
    pub trees: Vec<TreeSchema>,
}

/// Tree in SoA layout. All arrays are indexed by node id; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Encoded feature index for each split node.
    pub split_indices: Vec<u32>,
    /// Threshold for each numeric split node.
    pub thresholds: Vec<f64>,
    /// Left child per node (0 marks a leaf).
    pub children_left: Vec<u32>,
    /// Right child per node (0 marks a leaf).
    pub children_right: Vec<u32>,
    /// Direction taken on a missing value (true = left).
    pub default_left: Vec<bool>,
    /// Value per node; only read at leaves.
    pub leaf_values: Vec<f64>,
    /// Categorical splits.
    #[serde(default, skip_serializing_if = "CategoriesSchema::is_empty")]
    pub categories: CategoriesSchema,
}

/// Category sets for categorical split nodes.
///
/// A sample whose category id is in the node's set goes right.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesSchema {
    pub node_indices: Vec<u32>,
    pub category_sets: Vec<Vec<u32>>,
}

impl CategoriesSchema {
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }
}

/// Linear estimator over encoded features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSchema {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}
