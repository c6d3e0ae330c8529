//! The laptop record and its fixed column schema.
//!
//! The model was trained on fifteen named columns in a fixed order. That
//! order lives in exactly one place, [`Column::ALL`], and the only way to
//! turn records into model input is [`FeatureTable::from_records`], which
//! walks that array and matches every column exhaustively.

pub mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use table::{ColumnData, FeatureTable, ShapeError, TableColumn};

// =============================================================================
// Column schema
// =============================================================================

/// Semantic type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string restricted (at the input surface) to an observed domain.
    Categorical,
    /// Bounded floating-point value.
    Float,
    /// Bounded integer value.
    Integer,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            FieldKind::Categorical => "categorical",
            FieldKind::Float => "float",
            FieldKind::Integer => "integer",
        })
    }
}

/// Inclusive range and step of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumericBounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Whether `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `value` sits on the `min + k * step` grid.
    ///
    /// Uses a relative tolerance so that decimal steps like `0.1` accept
    /// values such as `15.6` despite binary rounding.
    pub fn on_step(&self, value: f64) -> bool {
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-6
    }
}

/// One of the fifteen model input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Brand,
    Name,
    SpecRating,
    Processor,
    Cpu,
    Ram,
    RamType,
    Rom,
    RomType,
    Gpu,
    DisplaySize,
    ResolutionWidth,
    ResolutionHeight,
    Os,
    Warranty,
}

impl Column {
    /// Every column in the order the model was trained with.
    pub const ALL: [Column; 15] = [
        Column::Brand,
        Column::Name,
        Column::SpecRating,
        Column::Processor,
        Column::Cpu,
        Column::Ram,
        Column::RamType,
        Column::Rom,
        Column::RomType,
        Column::Gpu,
        Column::DisplaySize,
        Column::ResolutionWidth,
        Column::ResolutionHeight,
        Column::Os,
        Column::Warranty,
    ];

    /// The categorical columns, in schema order.
    pub const CATEGORICAL: [Column; 8] = [
        Column::Brand,
        Column::Name,
        Column::Processor,
        Column::Cpu,
        Column::RamType,
        Column::RomType,
        Column::Gpu,
        Column::Os,
    ];

    /// Column name as it appears in the dataset header and the model schema.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Brand => "brand",
            Column::Name => "name",
            Column::SpecRating => "spec_rating",
            Column::Processor => "processor",
            Column::Cpu => "CPU",
            Column::Ram => "Ram",
            Column::RamType => "Ram_type",
            Column::Rom => "ROM",
            Column::RomType => "ROM_type",
            Column::Gpu => "GPU",
            Column::DisplaySize => "display_size",
            Column::ResolutionWidth => "resolution_width",
            Column::ResolutionHeight => "resolution_height",
            Column::Os => "OS",
            Column::Warranty => "warranty",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Column::Brand
            | Column::Name
            | Column::Processor
            | Column::Cpu
            | Column::RamType
            | Column::RomType
            | Column::Gpu
            | Column::Os => FieldKind::Categorical,
            Column::SpecRating
            | Column::DisplaySize
            | Column::ResolutionWidth
            | Column::ResolutionHeight => FieldKind::Float,
            Column::Ram | Column::Rom | Column::Warranty => FieldKind::Integer,
        }
    }

    /// Range and step for numeric columns, `None` for categorical ones.
    pub const fn bounds(self) -> Option<NumericBounds> {
        match self {
            Column::SpecRating => Some(NumericBounds::new(0.0, 100.0, 0.1)),
            Column::Ram => Some(NumericBounds::new(2.0, 64.0, 1.0)),
            Column::Rom => Some(NumericBounds::new(128.0, 2048.0, 128.0)),
            Column::DisplaySize => Some(NumericBounds::new(10.0, 20.0, 0.1)),
            Column::ResolutionWidth => Some(NumericBounds::new(1000.0, 4000.0, 10.0)),
            Column::ResolutionHeight => Some(NumericBounds::new(700.0, 3000.0, 10.0)),
            Column::Warranty => Some(NumericBounds::new(0.0, 5.0, 1.0)),
            _ => None,
        }
    }

    /// Human-readable label used by the input surface.
    pub const fn label(self) -> &'static str {
        match self {
            Column::Brand => "Brand",
            Column::Name => "Model Name",
            Column::SpecRating => "Specification Rating",
            Column::Processor => "Processor",
            Column::Cpu => "CPU",
            Column::Ram => "RAM (in GB)",
            Column::RamType => "RAM Type",
            Column::Rom => "ROM (in GB)",
            Column::RomType => "ROM Type",
            Column::Gpu => "GPU",
            Column::DisplaySize => "Display Size (in inches)",
            Column::ResolutionWidth => "Resolution Width",
            Column::ResolutionHeight => "Resolution Height",
            Column::Os => "Operating System",
            Column::Warranty => "Warranty (in years)",
        }
    }

    /// Column names in schema order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned when parsing an unknown column name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column {0:?}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

// =============================================================================
// LaptopRecord
// =============================================================================

/// A single laptop description submitted for pricing.
///
/// Serde names match the model column names, so JSON objects and CSV rows
/// keyed by the dataset header deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopRecord {
    pub brand: String,
    pub name: String,
    pub spec_rating: f64,
    pub processor: String,
    #[serde(rename = "CPU")]
    pub cpu: String,
    #[serde(rename = "Ram")]
    pub ram: u32,
    #[serde(rename = "Ram_type")]
    pub ram_type: String,
    #[serde(rename = "ROM")]
    pub rom: u32,
    #[serde(rename = "ROM_type")]
    pub rom_type: String,
    #[serde(rename = "GPU")]
    pub gpu: String,
    pub display_size: f64,
    pub resolution_width: f64,
    pub resolution_height: f64,
    #[serde(rename = "OS")]
    pub os: String,
    pub warranty: u32,
}

/// A borrowed field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Float(f64),
    Integer(i64),
}

impl FieldValue<'_> {
    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Text(_) => None,
            FieldValue::Float(v) => Some(v),
            FieldValue::Integer(v) => Some(v as f64),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Integer(v) => write!(f, "{v}"),
        }
    }
}

impl LaptopRecord {
    /// Value of one column.
    pub fn value(&self, column: Column) -> FieldValue<'_> {
        match column {
            Column::Brand => FieldValue::Text(&self.brand),
            Column::Name => FieldValue::Text(&self.name),
            Column::SpecRating => FieldValue::Float(self.spec_rating),
            Column::Processor => FieldValue::Text(&self.processor),
            Column::Cpu => FieldValue::Text(&self.cpu),
            Column::Ram => FieldValue::Integer(i64::from(self.ram)),
            Column::RamType => FieldValue::Text(&self.ram_type),
            Column::Rom => FieldValue::Integer(i64::from(self.rom)),
            Column::RomType => FieldValue::Text(&self.rom_type),
            Column::Gpu => FieldValue::Text(&self.gpu),
            Column::DisplaySize => FieldValue::Float(self.display_size),
            Column::ResolutionWidth => FieldValue::Float(self.resolution_width),
            Column::ResolutionHeight => FieldValue::Float(self.resolution_height),
            Column::Os => FieldValue::Text(&self.os),
            Column::Warranty => FieldValue::Integer(i64::from(self.warranty)),
        }
    }

    /// Build the single-row model input table for this record.
    pub fn to_table(&self) -> FeatureTable {
        FeatureTable::from_records(std::slice::from_ref(self))
    }
}
