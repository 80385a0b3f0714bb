//! `starling` — the single run entry point for the sales-mart ETL.
//!
//! Reads `etl.toml` (or the path given with `--config`), loads the XML
//! source files, rebuilds the normalized store and the star schema, and
//! prints a run summary.

use anyhow::Context as _;
use clap::Parser;
use starling_etl::{EtlConfig, ingest, pipeline};
use starling_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Starling sales-mart ETL")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "etl.toml")]
  config: std::path::PathBuf,

  /// Print the run summary as JSON instead of a log line.
  #[arg(long)]
  json: bool,
}

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config))
    .add_source(config::Environment::with_prefix("STARLING"))
    .build()
    .context("failed to read config file")?;

  let etl_cfg: EtlConfig = settings
    .try_deserialize()
    .context("failed to deserialise EtlConfig")?;

  // Parse the source documents.
  let reps = ingest::load_reps(&etl_cfg.reps_file)?;
  let txns = ingest::load_transactions(&etl_cfg.transaction_files)?;

  // Open the store and run the pipeline.
  let store = SqliteStore::open(&etl_cfg.store_path).with_context(|| {
    format!("failed to open store at {:?}", etl_cfg.store_path)
  })?;

  let summary = pipeline::run(&store, &reps, &txns)?;

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    println!(
      "loaded {} transactions into {} product-fact and {} rep-fact rows \
       (grand total {})",
      summary.normalized.transactions,
      summary.product_fact_rows,
      summary.rep_fact_rows,
      summary.grand_total,
    );
  }

  Ok(())
}
