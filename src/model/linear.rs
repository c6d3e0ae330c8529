//! Linear estimator over encoded features.

use ndarray::{Array1, ArrayView2};

use super::schema::LinearSchema;

/// Linear model: `bias + features · weights`.
///
/// # Example
///
/// ```
/// use laptop_price::model::linear::LinearModel;
/// use ndarray::array;
///
/// let model = LinearModel::new(array![2.0, -1.0], 10.0);
/// let out = model.predict(array![[1.0f32, 3.0]].view());
/// assert_eq!(out, vec![9.0]);
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearModel {
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Build from the serialized form, checking the weight count.
    pub fn from_schema(schema: &LinearSchema, n_features: usize) -> Result<Self, String> {
        if schema.weights.len() != n_features {
            return Err(format!(
                "linear weights length {} doesn't match encoded width {}",
                schema.weights.len(),
                n_features
            ));
        }
        if !schema.bias.is_finite() || schema.weights.iter().any(|w| !w.is_finite()) {
            return Err("linear coefficients must be finite".to_string());
        }
        Ok(Self::new(Array1::from(schema.weights.clone()), schema.bias))
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn weight(&self, feature: usize) -> f64 {
        self.weights[feature]
    }

    /// Predict every row of a `(n_rows, n_features)` matrix.
    ///
    /// A NaN feature (an ignored unknown ordinal level) contributes nothing.
    pub fn predict(&self, features: ArrayView2<'_, f32>) -> Vec<f64> {
        debug_assert_eq!(features.ncols(), self.n_features());
        features
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(self.weights.iter())
                    .filter(|(x, _)| !x.is_nan())
                    .fold(self.bias, |acc, (&x, &w)| acc + f64::from(x) * w)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn predicts_dot_product_plus_bias() {
        let model = LinearModel::new(array![0.5, 2.0, -1.0], 3.0);
        let out = model.predict(array![[2.0f32, 1.0, 4.0], [0.0, 0.0, 0.0]].view());
        assert_abs_diff_eq!(out[0], 3.0 + 1.0 + 2.0 - 4.0);
        assert_abs_diff_eq!(out[1], 3.0);
    }

    #[test]
    fn nan_features_are_skipped() {
        let model = LinearModel::new(array![1.0, 1.0], 0.0);
        let out = model.predict(array![[f32::NAN, 2.0f32]].view());
        assert_abs_diff_eq!(out[0], 2.0);
    }

    #[test]
    fn schema_width_must_match() {
        let schema = LinearSchema {
            weights: vec![1.0, 2.0],
            bias: 0.0,
        };
        assert!(LinearModel::from_schema(&schema, 3).is_err());
        assert_eq!(LinearModel::from_schema(&schema, 2).unwrap().weight(1), 2.0);
    }
}
