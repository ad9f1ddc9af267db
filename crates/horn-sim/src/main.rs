//! Horn loudspeaker simulator CLI
//!
//! Run a frequency sweep of a driver on a horn and write the response as CSV.
//!
//! # Usage
//!
//! ```bash
//! # Built-in reference system, CSV to stdout
//! horn-sim
//!
//! # Start a config from the defaults
//! horn-sim --print-default > horn.json
//!
//! # Run a config and write the result to a file
//! horn-sim --config horn.json --output response.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use horn_core::SimConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "horn-sim")]
#[command(about = "Simulate a loudspeaker driver on an acoustic horn")]
#[command(version)]
struct Cli {
    /// Path to a JSON simulation config (built-in reference system if absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the CSV response here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the default config as JSON and exit
    #[arg(long)]
    print_default: bool,

    /// Override the number of sweep points
    #[arg(long)]
    points: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.print_default {
        println!("{}", SimConfig::default().to_json_pretty()?);
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            log::info!("no config given, using the reference system");
            SimConfig::default()
        }
    };
    if let Some(points) = cli.points {
        config.sweep.points = points;
    }

    let driver = &config.driver;
    log::info!(
        "driver fs {:.1} Hz, Qts {:.3}",
        driver.resonance_frequency(),
        driver.qts()
    );

    let result = horn_core::compute(&config).context("simulation failed")?;
    let csv = result.to_csv();

    match &cli.output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} points to {}", result.len(), path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}
