//! Columnar model input table.
//!
//! A [`FeatureTable`] is the structured value handed to a
//! [`Regressor`](crate::model::Regressor): named, ordered, typed columns of
//! equal length. It is the Rust counterpart of a one-row data frame.

use super::{Column, LaptopRecord};

/// Values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<String>),
    Float(Vec<f64>),
    Integer(Vec<i64>),
}

impl ColumnData {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Float(_) => "float",
            ColumnData::Integer(_) => "integer",
        }
    }

    /// Text value at `row`, `None` for numeric columns.
    #[inline]
    pub fn text(&self, row: usize) -> Option<&str> {
        match self {
            ColumnData::Text(v) => v.get(row).map(String::as_str),
            _ => None,
        }
    }

    /// Numeric value at `row` as `f64`, `None` for text columns.
    #[inline]
    pub fn number(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Float(v) => v.get(row).copied(),
            ColumnData::Integer(v) => v.get(row).map(|&x| x as f64),
            ColumnData::Text(_) => None,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    name: String,
    data: ColumnData,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }
}

/// Columns of unequal length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {name:?} has {len} rows, expected {expected}")]
pub struct ShapeError {
    pub name: String,
    pub len: usize,
    pub expected: usize,
}

/// Named, ordered, typed columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    columns: Vec<TableColumn>,
    n_rows: usize,
}

impl FeatureTable {
    /// Build a table from columns, checking that all have the same length.
    pub fn from_columns(columns: Vec<TableColumn>) -> Result<Self, ShapeError> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != n_rows) {
            return Err(ShapeError {
                name: bad.name.clone(),
                len: bad.data.len(),
                expected: n_rows,
            });
        }
        Ok(Self { columns, n_rows })
    }

    /// Serialize records into the model's column layout.
    ///
    /// This is the only place that maps record fields to model columns.
    /// Column order comes from [`Column::ALL`]; the match below is
    /// exhaustive, so adding a column without mapping it fails to compile.
    pub fn from_records(records: &[LaptopRecord]) -> Self {
        let columns = Column::ALL
            .into_iter()
            .map(|column| {
                let data = match column {
                    Column::Brand => text(records, |r| r.brand.as_str()),
                    Column::Name => text(records, |r| r.name.as_str()),
                    Column::SpecRating => float(records, |r| r.spec_rating),
                    Column::Processor => text(records, |r| r.processor.as_str()),
                    Column::Cpu => text(records, |r| r.cpu.as_str()),
                    Column::Ram => integer(records, |r| r.ram),
                    Column::RamType => text(records, |r| r.ram_type.as_str()),
                    Column::Rom => integer(records, |r| r.rom),
                    Column::RomType => text(records, |r| r.rom_type.as_str()),
                    Column::Gpu => text(records, |r| r.gpu.as_str()),
                    Column::DisplaySize => float(records, |r| r.display_size),
                    Column::ResolutionWidth => float(records, |r| r.resolution_width),
                    Column::ResolutionHeight => float(records, |r| r.resolution_height),
                    Column::Os => text(records, |r| r.os.as_str()),
                    Column::Warranty => integer(records, |r| r.warranty),
                };
                TableColumn::new(column.name(), data)
            })
            .collect();

        Self {
            columns,
            n_rows: records.len(),
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Columns in table order.
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn text(records: &[LaptopRecord], field: fn(&LaptopRecord) -> &str) -> ColumnData {
    ColumnData::Text(records.iter().map(|r| field(r).to_owned()).collect())
}

fn float(records: &[LaptopRecord], field: fn(&LaptopRecord) -> f64) -> ColumnData {
    ColumnData::Float(records.iter().map(field).collect())
}

fn integer(records: &[LaptopRecord], field: fn(&LaptopRecord) -> u32) -> ColumnData {
    ColumnData::Integer(records.iter().map(|r| i64::from(field(r))).collect())
}
