//! `domains`, `schema` and `examples`.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use super::GlobalArgs;
use crate::presets;
use crate::record::{Column, FieldKind};

/// Print the categorical choice lists
#[derive(Args, Debug, Clone)]
pub struct DomainsCommand {
    /// Only print this column (e.g. `brand`, `GPU`)
    #[arg(long)]
    pub column: Option<Column>,
}

impl DomainsCommand {
    pub fn run(&self, global: &GlobalArgs, out: &mut dyn Write) -> Result<()> {
        let (_, ctx) = global.load()?;
        let domains = ctx.domains();

        if let Some(column) = self.column {
            if column.kind() != FieldKind::Categorical {
                anyhow::bail!("{column} is a numeric column");
            }
            for value in domains.values(column) {
                writeln!(out, "{value}")?;
            }
            return Ok(());
        }

        for (column, values) in domains.iter() {
            writeln!(out, "{} ({}): {} values", column.label(), column, values.len())?;
            for value in values {
                writeln!(out, "  {value}")?;
            }
        }
        Ok(())
    }
}

/// Print the model input columns
#[derive(Args, Debug, Clone)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        for (position, column) in Column::ALL.into_iter().enumerate() {
            write!(out, "{position:>2}  {:<18} {:<12}", column.name(), column.kind())?;
            match column.bounds() {
                Some(b) => writeln!(out, " [{}, {}] step {}", b.min, b.max, b.step)?,
                None => writeln!(out)?,
            }
        }
        Ok(())
    }
}

/// Predict the built-in example laptops
#[derive(Args, Debug, Clone)]
pub struct ExamplesCommand {}

impl ExamplesCommand {
    pub fn run(&self, global: &GlobalArgs, out: &mut dyn Write) -> Result<()> {
        let (_, ctx) = global.load()?;
        for record in presets::all() {
            let quote = ctx.predict(&record)?;
            writeln!(out, "{} {}: {quote}", record.brand, record.name)?;
        }
        Ok(())
    }
}
