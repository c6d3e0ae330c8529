//! `predict`: price one laptop given on the command line or as JSON.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use super::GlobalArgs;
use crate::input::InputSurface;
use crate::record::LaptopRecord;

/// Laptop fields. Each is required unless `--json` is given.
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Read the record from a JSON object keyed by column name
    #[arg(long, conflicts_with_all = FIELD_FLAGS)]
    pub json: Option<PathBuf>,

    #[arg(long, required_unless_present = "json")]
    pub brand: Option<String>,

    /// Model name
    #[arg(long, required_unless_present = "json")]
    pub name: Option<String>,

    #[arg(long, required_unless_present = "json")]
    pub spec_rating: Option<f64>,

    #[arg(long, required_unless_present = "json")]
    pub processor: Option<String>,

    /// Core and thread description, e.g. "Hexa Core, 12 Threads"
    #[arg(long, required_unless_present = "json")]
    pub cpu: Option<String>,

    /// RAM in GB
    #[arg(long, required_unless_present = "json")]
    pub ram: Option<u32>,

    #[arg(long, required_unless_present = "json")]
    pub ram_type: Option<String>,

    /// Storage in GB
    #[arg(long, required_unless_present = "json")]
    pub rom: Option<u32>,

    #[arg(long, required_unless_present = "json")]
    pub rom_type: Option<String>,

    #[arg(long, required_unless_present = "json")]
    pub gpu: Option<String>,

    /// Display diagonal in inches
    #[arg(long, required_unless_present = "json")]
    pub display_size: Option<f64>,

    #[arg(long, required_unless_present = "json")]
    pub resolution_width: Option<f64>,

    #[arg(long, required_unless_present = "json")]
    pub resolution_height: Option<f64>,

    #[arg(long, required_unless_present = "json")]
    pub os: Option<String>,

    /// Warranty in years
    #[arg(long, required_unless_present = "json")]
    pub warranty: Option<u32>,
}

const FIELD_FLAGS: [&str; 15] = [
    "brand",
    "name",
    "spec_rating",
    "processor",
    "cpu",
    "ram",
    "ram_type",
    "rom",
    "rom_type",
    "gpu",
    "display_size",
    "resolution_width",
    "resolution_height",
    "os",
    "warranty",
];

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.with_context(|| format!("--{flag} is required"))
}

impl RecordArgs {
    pub fn into_record(self) -> Result<LaptopRecord> {
        if let Some(path) = self.json {
            let file = File::open(&path).with_context(|| format!("failed to open {path:?}"))?;
            return serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse record from {path:?}"));
        }
        Ok(LaptopRecord {
            brand: required(self.brand, "brand")?,
            name: required(self.name, "name")?,
            spec_rating: required(self.spec_rating, "spec-rating")?,
            processor: required(self.processor, "processor")?,
            cpu: required(self.cpu, "cpu")?,
            ram: required(self.ram, "ram")?,
            ram_type: required(self.ram_type, "ram-type")?,
            rom: required(self.rom, "rom")?,
            rom_type: required(self.rom_type, "rom-type")?,
            gpu: required(self.gpu, "gpu")?,
            display_size: required(self.display_size, "display-size")?,
            resolution_width: required(self.resolution_width, "resolution-width")?,
            resolution_height: required(self.resolution_height, "resolution-height")?,
            os: required(self.os, "os")?,
            warranty: required(self.warranty, "warranty")?,
        })
    }
}

/// Predict the price of one laptop
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    #[command(flatten)]
    pub record: RecordArgs,
}

impl PredictCommand {
    pub fn run(&self, global: &GlobalArgs, out: &mut dyn Write) -> Result<()> {
        let record = self.record.clone().into_record()?;
        let (config, ctx) = global.load()?;

        InputSurface::new(ctx.domains(), config.domain_policy).admit(&record)?;
        let quote = ctx.predict(&record)?;
        info!(brand = %record.brand, name = %record.name, price = quote.price(), "prediction served");
        writeln!(out, "{quote}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{fixture_args, run};
    use crate::input::InputError;
    use crate::presets;
    use crate::InferenceError;

    const HP_VICTUS_FLAGS: [&str; 31] = [
        "predict",
        "--brand",
        "HP",
        "--name",
        "Victus 15-fb0157AX Gaming Laptop",
        "--spec-rating",
        "73",
        "--processor",
        "5th Gen AMD Ryzen 5 5600H",
        "--cpu",
        "Hexa Core, 12 Threads",
        "--ram",
        "8",
        "--ram-type",
        "DDR4",
        "--rom",
        "512",
        "--rom-type",
        "SSD",
        "--gpu",
        "4GB AMD Radeon RX 6500M",
        "--display-size",
        "15.6",
        "--resolution-width",
        "1920",
        "--resolution-height",
        "1080",
        "--os",
        "Windows 11 OS",
        "--warranty",
        "1",
    ];

    #[test]
    fn predicts_from_flags() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(&fixture_args(dir.path()), &HP_VICTUS_FLAGS).unwrap();
        assert_eq!(out, "💰 Predicted Price: ₹62,990.50\n");
    }

    #[test]
    fn predicts_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, serde_json::to_string(&presets::hp_victus()).unwrap()).unwrap();

        let out = run(&fixture_args(dir.path()), &["predict", "--json", path.to_str().unwrap()]).unwrap();
        assert_eq!(out, "💰 Predicted Price: ₹62,990.50\n");
    }

    #[test]
    fn missing_field_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&fixture_args(dir.path()), &HP_VICTUS_FLAGS[..29]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }

    #[test]
    fn out_of_range_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = HP_VICTUS_FLAGS;
        args[12] = "128";
        let err = run(&fixture_args(dir.path()), &args).unwrap_err();
        assert!(err.downcast_ref::<InputError>().is_some());
    }

    #[test]
    fn unseen_gpu_passes_through_to_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = HP_VICTUS_FLAGS;
        args[20] = "Apple M2 GPU";
        let out = run(&fixture_args(dir.path()), &args).unwrap();
        assert!(out.starts_with("💰 Predicted Price: ₹"));
    }

    #[test]
    fn unseen_os_fails_inference() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = HP_VICTUS_FLAGS;
        args[28] = "macOS";
        let err = run(&fixture_args(dir.path()), &args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InferenceError>(),
            Some(InferenceError::UnknownCategory { .. })
        ));
    }
}
