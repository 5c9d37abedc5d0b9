//! Warehouse integration for loading raw tables.
//!
//! The [`RawLoader`] replaces the contents of the six raw tables with the
//! CSV files of a generation run, inside a single transaction.

mod loader;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::WarehouseConfig;

pub use loader::{LoadError, LoadInput, LoadSummary, RawLoader, ensure_raw_schema, verify_inputs};

/// Opens a small connection pool to the warehouse.
pub async fn connect(config: &WarehouseConfig) -> Result<PgPool, LoadError> {
    info!(
        "Connecting to warehouse {}:{}/{}",
        config.host, config.port, config.database
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(config.connect_options())
        .await?;

    Ok(pool)
}
