//! Command-line interface.
//!
//! ```bash
//! laptop-price domains --column brand
//! laptop-price schema
//! laptop-price predict --json record.json
//! laptop-price examples
//! laptop-price batch --input laptops.csv
//! ```
//!
//! Results go to stdout, logs to stderr.

mod batch;
mod info;
mod predict;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{Config, DomainPolicy};
use crate::service::{self, Context};

pub use batch::BatchCommand;
pub use info::{DomainsCommand, ExamplesCommand, SchemaCommand};
pub use predict::{PredictCommand, RecordArgs};

/// Laptop price predictor
///
/// Loads a reference dataset and a trained model, then prices laptop
/// specifications.
#[derive(Parser, Debug)]
#[command(name = "laptop-price")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the categorical choice lists derived from the dataset
    Domains(DomainsCommand),

    /// Print the model input columns, their kinds and numeric bounds
    Schema(SchemaCommand),

    /// Predict the price of one laptop
    Predict(PredictCommand),

    /// Predict the built-in example laptops
    Examples(ExamplesCommand),

    /// Predict every row of a CSV file
    Batch(BatchCommand),
}

impl Commands {
    pub fn run(&self, global: &GlobalArgs, out: &mut dyn std::io::Write) -> Result<()> {
        match self {
            Commands::Domains(cmd) => cmd.run(global, out),
            Commands::Schema(cmd) => cmd.run(out),
            Commands::Predict(cmd) => cmd.run(global, out),
            Commands::Examples(cmd) => cmd.run(global, out),
            Commands::Batch(cmd) => cmd.run(global, out),
        }
    }
}

/// Categorical domain handling on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Warn and forward unseen categorical values
    PassThrough,
    /// Refuse unseen categorical values
    Reject,
}

impl From<PolicyArg> for DomainPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PassThrough => DomainPolicy::PassThrough,
            PolicyArg::Reject => DomainPolicy::Reject,
        }
    }
}

/// Options shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true, env = "LAPTOP_PRICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference dataset (CSV)
    #[arg(long, global = true, env = "LAPTOP_PRICE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Model artifact (JSON)
    #[arg(long, global = true, env = "LAPTOP_PRICE_MODEL")]
    pub model: Option<PathBuf>,

    /// Handling of categorical values missing from the dataset
    #[arg(long, global = true, value_enum)]
    pub domain_policy: Option<PolicyArg>,

    /// Score batch rows in parallel
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Log level for this crate (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    /// Config file values with command-line overrides applied.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(policy) = self.domain_policy {
            config.domain_policy = policy.into();
        }
        config.parallel_batch |= self.parallel;
        Ok(config)
    }

    /// Resolve the config and load both artifacts.
    pub fn load(&self) -> Result<(Config, Context)> {
        let config = self.resolve()?;
        let ctx = service::load_with(&config).context("cannot start without both artifacts")?;
        Ok((config, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    pub(super) fn fixture_args(dir: &std::path::Path) -> GlobalArgs {
        let (dataset, model) = testing::write_fixtures(dir).unwrap();
        GlobalArgs {
            dataset: Some(dataset),
            model: Some(model),
            ..GlobalArgs::default()
        }
    }

    pub(super) fn run(global: &GlobalArgs, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("laptop-price").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        cli.command.run(global, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model_path": "a.json", "domain_policy": "reject"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "laptop-price",
            "--config",
            path.to_str().unwrap(),
            "--model",
            "b.json",
            "--parallel",
            "schema",
        ])
        .unwrap();
        let config = cli.global.resolve().unwrap();
        assert_eq!(config.model_path, PathBuf::from("b.json"));
        assert_eq!(config.domain_policy, DomainPolicy::Reject);
        assert!(config.parallel_batch);
    }

    #[test]
    fn missing_model_fails_before_any_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut global = fixture_args(dir.path());
        global.model = Some(dir.path().join("absent.json"));

        let err = run(&global, &["examples"]).unwrap_err();
        let err = err.downcast_ref::<crate::Error>().unwrap();
        assert!(matches!(
            err,
            crate::Error::MissingArtifact {
                artifact: crate::ArtifactKind::Model,
                ..
            }
        ));
    }
}
