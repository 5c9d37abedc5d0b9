//! Loads generated CSV files into the warehouse `raw` schema.
//!
//! Every run truncates and reloads all six tables in one transaction, so
//! running it twice on the same files leaves the same table contents.
//!
//! Run with:
//! ```text
//! WAREHOUSE_HOST=localhost WAREHOUSE_DB=warehouse WAREHOUSE_USER=loader \
//! WAREHOUSE_PASSWORD=secret cargo run -p noorsports-data --bin load-raw -- --ensure-schema
//! ```

use std::path::PathBuf;

use clap::Parser;
use noorsports_data::config::WarehouseConfig;
use noorsports_data::db::{self, RawLoader};
use tracing_subscriber::EnvFilter;

/// Load the noorsports raw tables
#[derive(Parser, Debug)]
#[command(name = "load-raw")]
#[command(about = "Idempotently load generated CSV files into the raw warehouse schema")]
struct Args {
    /// Directory holding the generated CSV files
    #[arg(long, env = "RAW_DATA_DIR", default_value = "data/raw")]
    data_dir: PathBuf,

    /// Apply the raw schema migration before loading
    #[arg(long, default_value = "false")]
    ensure_schema: bool,

    #[command(flatten)]
    warehouse: WarehouseConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Fail on missing files before touching the warehouse at all
    db::verify_inputs(&args.data_dir)?;

    let pool = db::connect(&args.warehouse).await?;
    tracing::info!("Connected to warehouse");

    if args.ensure_schema {
        db::ensure_raw_schema(&pool).await?;
    }

    let loader = RawLoader::new(pool, &args.data_dir);
    loader.load().await?;

    tracing::info!("Load completed!");
    for (table, count) in loader.row_counts().await? {
        tracing::info!("  {}: {} rows", table.qualified_name(), count);
    }

    Ok(())
}
