//! `batch`: price every row of a CSV file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::GlobalArgs;
use crate::input::InputSurface;
use crate::quote::PriceQuote;
use crate::record::LaptopRecord;
use crate::service::Context;

/// Predict every row of a CSV file
///
/// The header must name the fifteen model columns; other columns (such as
/// a recorded `price`) are ignored. Rows that cannot be parsed or fail the
/// input checks are reported and skipped.
#[derive(Args, Debug, Clone)]
pub struct BatchCommand {
    /// CSV file of laptop records
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Emit one JSON object per row instead of text
    #[arg(long)]
    pub json: bool,
}

/// Result for one input row. Rows are numbered from 1, excluding the header.
#[derive(Debug, Serialize)]
struct RowOutcome {
    row: usize,
    #[serde(flatten)]
    result: RowResult,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RowResult {
    Priced {
        brand: String,
        name: String,
        price: f64,
        quote: String,
    },
    Skipped {
        error: String,
    },
}

impl RowOutcome {
    fn priced(row: usize, record: &LaptopRecord, quote: PriceQuote) -> Self {
        Self {
            row,
            result: RowResult::Priced {
                brand: record.brand.clone(),
                name: record.name.clone(),
                price: quote.price(),
                quote: quote.to_string(),
            },
        }
    }

    fn skipped(row: usize, error: impl ToString) -> Self {
        let error = error.to_string();
        warn!(row, %error, "skipping row");
        Self {
            row,
            result: RowResult::Skipped { error },
        }
    }

    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        match &self.result {
            RowResult::Priced {
                brand, name, quote, ..
            } => writeln!(out, "{}\t{brand} {name}\t{quote}", self.row),
            RowResult::Skipped { error } => writeln!(out, "{}\tskipped: {error}", self.row),
        }
    }
}

impl BatchCommand {
    pub fn run(&self, global: &GlobalArgs, out: &mut dyn Write) -> Result<()> {
        let (config, ctx) = global.load()?;
        let surface = InputSurface::new(ctx.domains(), config.domain_policy);

        let mut reader = csv::Reader::from_path(&self.input)
            .with_context(|| format!("failed to open {:?}", self.input))?;

        let mut outcomes = Vec::new();
        let mut accepted = Vec::new();
        for (idx, row) in reader.deserialize::<LaptopRecord>().enumerate() {
            let row_number = idx + 1;
            match row {
                Ok(record) => match surface.admit(&record) {
                    Ok(()) => accepted.push((row_number, record)),
                    Err(e) => outcomes.push(RowOutcome::skipped(row_number, e)),
                },
                Err(e) => outcomes.push(RowOutcome::skipped(row_number, e)),
            }
        }

        outcomes.extend(price_rows(&ctx, &accepted));
        outcomes.sort_by_key(|o| o.row);

        let priced = outcomes
            .iter()
            .filter(|o| matches!(o.result, RowResult::Priced { .. }))
            .count();
        info!(priced, skipped = outcomes.len() - priced, "batch finished");

        for outcome in &outcomes {
            if self.json {
                serde_json::to_writer(&mut *out, outcome)?;
                writeln!(out)?;
            } else {
                outcome.write_text(out)?;
            }
        }
        Ok(())
    }
}

/// Price accepted rows in one model call, falling back to one call per row
/// when the batch fails so a single bad row does not sink the rest.
fn price_rows(ctx: &Context, rows: &[(usize, LaptopRecord)]) -> Vec<RowOutcome> {
    let records: Vec<LaptopRecord> = rows.iter().map(|(_, r)| r.clone()).collect();
    match ctx.predict_batch(&records) {
        Ok(quotes) => rows
            .iter()
            .zip(quotes)
            .map(|((row, record), quote)| RowOutcome::priced(*row, record, quote))
            .collect(),
        Err(e) => {
            warn!(error = %e, "batch prediction failed, retrying row by row");
            rows.iter()
                .map(|(row, record)| match ctx.predict(record) {
                    Ok(quote) => RowOutcome::priced(*row, record, quote),
                    Err(e) => RowOutcome::skipped(*row, e),
                })
                .collect()
        }
    }
}
