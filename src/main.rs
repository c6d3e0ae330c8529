//! laptop-price: predict laptop prices from the command line.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use laptop_price::cli::{Cli, GlobalArgs};

fn init_tracing(global: &GlobalArgs) -> Result<()> {
    let filter = match &global.log_level {
        Some(level) => EnvFilter::try_new(format!("laptop_price={level}"))?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("laptop_price=info"))?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.global)?;
    debug!(?cli, "parsed arguments");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.command.run(&cli.global, &mut out)
}
