//! Command-line sampler: reduce the full application export to a small
//! reproducible `clients.csv` for the dashboard.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorecard_sdk::config;
use scorecard_sdk::sampler::{sample_clients, SampleConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sample-clients",
    version,
    about = "Draw a reproducible sample of scoring-ready clients from the full application export"
)]
struct Cli {
    /// Source CSV with the full application table (.gz accepted)
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_SOURCE_FILE)]
    source: PathBuf,

    /// Where to write the sampled table
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_CLIENTS_FILE)]
    out: PathBuf,

    /// Number of rows to draw
    #[arg(long, default_value_t = config::DEFAULT_SAMPLE_SIZE)]
    size: usize,

    /// RNG seed; same source, size, and seed reproduce the same table
    #[arg(long, default_value_t = config::DEFAULT_SAMPLE_SEED)]
    seed: u64,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> scorecard_sdk::Result<()> {
    let cli = Cli::parse();
    let config = SampleConfig {
        source: cli.source,
        out: cli.out,
        size: cli.size,
        seed: cli.seed,
    };
    let summary = sample_clients(&config)?;
    println!(
        "sampled {} of {} usable rows -> {}",
        summary.rows_written,
        summary.rows_read - summary.rows_missing - summary.rows_invalid,
        config.out.display()
    );
    println!(
        "source: {} rows read, {} dropped as incomplete, {} dropped as out of domain",
        summary.rows_read, summary.rows_missing, summary.rows_invalid
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
