//! Additive tree ensemble.

use ndarray::{ArrayView1, ArrayView2};

use super::schema::ForestSchema;
use super::tree::{Tree, TreeValidationError};
use crate::utils::Parallelism;

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    NoTrees,
    #[error("base score is not finite")]
    NonFiniteBaseScore,
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Sum of regression trees plus a base score.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f64,
}

impl Forest {
    /// Build and validate a forest from its serialized form.
    pub fn from_schema(schema: &ForestSchema, n_features: usize) -> Result<Self, ForestValidationError> {
        if schema.trees.is_empty() {
            return Err(ForestValidationError::NoTrees);
        }
        if !schema.base_score.is_finite() {
            return Err(ForestValidationError::NonFiniteBaseScore);
        }
        let trees = schema
            .trees
            .iter()
            .enumerate()
            .map(|(tree_idx, t)| {
                Tree::from_schema(t, n_features)
                    .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            base_score: schema.base_score,
        })
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Predict for a single row of encoded features.
    pub fn predict_row(&self, features: &[f32]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.predict_row(features)).sum::<f64>()
    }

    /// Predict every row of a `(n_rows, n_features)` matrix.
    pub fn predict(&self, features: ArrayView2<'_, f32>, parallelism: Parallelism) -> Vec<f64> {
        parallelism.maybe_par_map(features.nrows(), |i| self.predict_view(features.row(i)))
    }

    fn predict_view(&self, row: ArrayView1<'_, f32>) -> f64 {
        match row.as_slice() {
            Some(slice) => self.predict_row(slice),
            None => self.predict_row(&row.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{CategoriesSchema, TreeSchema};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn stump(feature: u32, threshold: f64, left: f64, right: f64) -> TreeSchema {
        TreeSchema {
            split_indices: vec![feature, 0, 0],
            thresholds: vec![threshold, 0.0, 0.0],
            children_left: vec![1, 0, 0],
            children_right: vec![2, 0, 0],
            default_left: vec![true, false, false],
            leaf_values: vec![0.0, left, right],
            categories: CategoriesSchema::default(),
        }
    }

    fn forest() -> Forest {
        let schema = ForestSchema {
            base_score: 100.0,
            trees: vec![stump(0, 5.0, -10.0, 10.0), stump(1, 0.5, 1.5, 2.5)],
        };
        Forest::from_schema(&schema, 2).unwrap()
    }

    #[test]
    fn prediction_is_base_plus_leaves() {
        let f = forest();
        assert_abs_diff_eq!(f.predict_row(&[6.0, 0.0]), 111.5);
        assert_abs_diff_eq!(f.predict_row(&[1.0, 1.0]), 92.5);
    }

    #[test]
    fn batch_matches_row_prediction() {
        let f = forest();
        let m = array![[6.0f32, 0.0], [1.0, 1.0], [f32::NAN, f32::NAN]];
        for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
            let out = f.predict(m.view(), parallelism);
            assert_eq!(out.len(), 3);
            assert_abs_diff_eq!(out[0], 111.5);
            assert_abs_diff_eq!(out[1], 92.5);
            assert_abs_diff_eq!(out[2], 100.0 - 10.0 + 1.5);
        }
    }

    #[test]
    fn invalid_tree_is_reported_with_index() {
        let mut bad = stump(0, 1.0, 0.0, 0.0);
        bad.split_indices[0] = 9;
        let schema = ForestSchema {
            base_score: 0.0,
            trees: vec![stump(0, 1.0, 0.0, 0.0), bad],
        };
        assert!(matches!(
            Forest::from_schema(&schema, 2),
            Err(ForestValidationError::InvalidTree { tree_idx: 1, .. })
        ));
    }

    #[test]
    fn empty_forest_is_rejected() {
        let schema = ForestSchema {
            base_score: 0.0,
            trees: vec![],
        };
        assert_eq!(
            Forest::from_schema(&schema, 1).unwrap_err(),
            ForestValidationError::NoTrees
        );
    }
}
