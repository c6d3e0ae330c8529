//! Column encoders: typed table columns to a dense `f32` feature matrix.
//!
//! Encoded layout is the concatenation of each column's features in column
//! order. Numeric and ordinal columns contribute one feature, one-hot
//! columns one feature per fitted category.

use std::collections::HashMap;

use ndarray::Array2;

use crate::error::InferenceError;
use crate::record::{ColumnData, FeatureTable};

/// Policy for categorical levels the encoder was not fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

/// Fitted category list with a reverse index.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    categories: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl CategoryIndex {
    /// Build the index. Returns the first duplicated category on failure.
    pub fn new(categories: Vec<String>) -> Result<Self, String> {
        let mut lookup = HashMap::with_capacity(categories.len());
        for (i, cat) in categories.iter().enumerate() {
            if lookup.insert(cat.clone(), i as u32).is_some() {
                return Err(cat.clone());
            }
        }
        Ok(Self { categories, lookup })
    }

    #[inline]
    pub fn get(&self, value: &str) -> Option<u32> {
        self.lookup.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Encoder for a single column.
#[derive(Debug, Clone)]
pub enum ColumnEncoder {
    Numeric,
    Ordinal {
        index: CategoryIndex,
        handle_unknown: HandleUnknown,
    },
    OneHot {
        index: CategoryIndex,
        handle_unknown: HandleUnknown,
    },
}

impl ColumnEncoder {
    /// Number of features this column contributes.
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoder::Numeric | ColumnEncoder::Ordinal { .. } => 1,
            ColumnEncoder::OneHot { index, .. } => index.len(),
        }
    }

    /// Write the features of `row` into `out` (length [`width`](Self::width)).
    ///
    /// `out` must be zero-initialized.
    fn encode_into(
        &self,
        name: &str,
        data: &ColumnData,
        row: usize,
        out: &mut [f32],
    ) -> Result<(), InferenceError> {
        match self {
            ColumnEncoder::Numeric => {
                let value = data.number(row).ok_or_else(|| InferenceError::TypeMismatch {
                    column: name.to_string(),
                    expected: "numeric",
                })?;
                out[0] = value as f32;
            }
            ColumnEncoder::Ordinal {
                index,
                handle_unknown,
            } => {
                out[0] = match lookup(name, data, row, index, *handle_unknown)? {
                    Some(code) => code as f32,
                    None => f32::NAN,
                };
            }
            ColumnEncoder::OneHot {
                index,
                handle_unknown,
            } => {
                if let Some(code) = lookup(name, data, row, index, *handle_unknown)? {
                    out[code as usize] = 1.0;
                }
            }
        }
        Ok(())
    }
}

fn lookup(
    name: &str,
    data: &ColumnData,
    row: usize,
    index: &CategoryIndex,
    handle_unknown: HandleUnknown,
) -> Result<Option<u32>, InferenceError> {
    let value = data.text(row).ok_or_else(|| InferenceError::TypeMismatch {
        column: name.to_string(),
        expected: "text",
    })?;
    match (index.get(value), handle_unknown) {
        (Some(code), _) => Ok(Some(code)),
        (None, HandleUnknown::Ignore) => Ok(None),
        (None, HandleUnknown::Error) => Err(InferenceError::UnknownCategory {
            column: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Ordered set of column encoders.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    columns: Vec<(String, ColumnEncoder)>,
    n_features: usize,
}

impl FeatureEncoder {
    pub fn new(columns: Vec<(String, ColumnEncoder)>) -> Self {
        let n_features = columns.iter().map(|(_, e)| e.width()).sum();
        Self {
            columns,
            n_features,
        }
    }

    /// Width of the encoded feature matrix.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Expected input column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Encode a table into a row-major matrix of shape `(n_rows, n_features)`.
    ///
    /// The table must have exactly the fitted columns in the fitted order.
    pub fn encode(&self, table: &FeatureTable) -> Result<Array2<f32>, InferenceError> {
        let found = table.column_names();
        if found != self.column_names() {
            return Err(InferenceError::ColumnMismatch {
                expected: self.column_names().into_iter().map(String::from).collect(),
                found: found.into_iter().map(String::from).collect(),
            });
        }

        let n_rows = table.n_rows();
        let mut flat = vec![0.0f32; n_rows * self.n_features];
        for (row, out) in flat.chunks_exact_mut(self.n_features.max(1)).enumerate().take(n_rows) {
            let mut offset = 0;
            for ((name, encoder), column) in self.columns.iter().zip(table.columns()) {
                let width = encoder.width();
                encoder.encode_into(name, column.data(), row, &mut out[offset..offset + width])?;
                offset += width;
            }
        }

        Array2::from_shape_vec((n_rows, self.n_features), flat)
            .map_err(|e| InferenceError::Backend(e.to_string()))
    }
}
