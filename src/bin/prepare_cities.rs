//! Turns a raw US cities table into the catalog the dashboard loads.

use anyhow::Context;
use clap::Parser;
use heatpump_counter::{default_catalog_path, prepare_catalog, DEFAULT_MIN_POPULATION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prepare-cities",
    version,
    about = "Build the city catalog from a raw cities CSV"
)]
struct Cli {
    /// Raw table with at least city, state_name, lat, lng and population columns
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value_os_t = default_catalog_path())]
    output: PathBuf,

    /// Cities smaller than this are left out
    #[arg(long, default_value_t = DEFAULT_MIN_POPULATION)]
    min_population: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let written = prepare_catalog(&cli.input, &cli.output, cli.min_population)
        .with_context(|| format!("preparing catalog from {}", cli.input.display()))?;
    println!(
        "Wrote {} cities with population >= {} to {}",
        written,
        cli.min_population,
        cli.output.display()
    );
    Ok(())
}
