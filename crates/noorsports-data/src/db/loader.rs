//! Idempotent truncate-and-reload of the raw tables.

use std::path::{Path, PathBuf};

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::tables::RawTable;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Missing input file {0}; run the generate step first")]
    MissingInputFile(PathBuf),
    #[error("Header mismatch in {path}: expected [{expected}], found [{found}]")]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("CSV error reading {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Loading {table} failed, transaction rolled back: {source}")]
    TransactionFailure {
        table: String,
        #[source]
        source: sqlx::Error,
    },
}

/// A verified input file and the table it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadInput {
    pub table: RawTable,
    pub path: PathBuf,
}

/// Rows copied per table by a committed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<(RawTable, u64)>,
}

impl LoadSummary {
    pub fn rows_for(&self, table: RawTable) -> Option<u64> {
        self.tables
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, rows)| *rows)
    }
}

/// Checks that every required file exists and carries the expected header.
///
/// Existence is checked for all tables before any header is read, so a missing
/// file is always reported as [`LoadError::MissingInputFile`].
pub fn verify_inputs(data_dir: &Path) -> Result<Vec<LoadInput>, LoadError> {
    let inputs: Vec<LoadInput> = RawTable::ALL
        .iter()
        .map(|&table| LoadInput {
            table,
            path: data_dir.join(table.file_name()),
        })
        .collect();

    for input in &inputs {
        if !input.path.is_file() {
            return Err(LoadError::MissingInputFile(input.path.clone()));
        }
    }

    for input in &inputs {
        verify_header(input)?;
    }

    Ok(inputs)
}

fn verify_header(input: &LoadInput) -> Result<(), LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: input.path.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(&input.path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?;
    let found: Vec<&str> = headers.iter().collect();

    if found.as_slice() != input.table.columns() {
        return Err(LoadError::HeaderMismatch {
            path: input.path.clone(),
            expected: input.table.columns().join(","),
            found: found.join(","),
        });
    }

    Ok(())
}

/// Replaces the contents of all raw tables with the files in a data directory.
///
/// All six truncate+copy steps run in one transaction: either every table is
/// replaced, or the transaction is rolled back and every table keeps its
/// previous contents.
pub struct RawLoader {
    pool: PgPool,
    data_dir: PathBuf,
}

impl RawLoader {
    pub fn new(pool: PgPool, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Runs preflight checks, then reloads every table atomically.
    pub async fn load(&self) -> Result<LoadSummary, LoadError> {
        let inputs = verify_inputs(&self.data_dir)?;
        info!(
            "Loading {} raw tables from {}",
            inputs.len(),
            self.data_dir.display()
        );

        let mut tx = self.pool.begin().await?;

        match load_all(&mut *tx, &inputs).await {
            Ok(summary) => {
                tx.commit()
                    .await
                    .map_err(|source| LoadError::TransactionFailure {
                        table: "commit".into(),
                        source,
                    })?;
                info!("Raw load committed");
                Ok(summary)
            }
            Err(err) => {
                warn!("Raw load failed, rolling back: {err}");
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Current row count of every raw table, in load order.
    pub async fn row_counts(&self) -> Result<Vec<(RawTable, i64)>, LoadError> {
        let mut counts = Vec::with_capacity(RawTable::ALL.len());
        for table in RawTable::ALL {
            let count: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.qualified_name()))
                    .fetch_one(&self.pool)
                    .await?;
            counts.push((table, count));
        }
        Ok(counts)
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn load_all(conn: &mut PgConnection, inputs: &[LoadInput]) -> Result<LoadSummary, LoadError> {
    let mut summary = LoadSummary::default();

    for input in inputs {
        let rows = load_table(conn, input).await?;
        info!("  Loaded {} rows into {}", rows, input.table.qualified_name());
        summary.tables.push((input.table, rows));
    }

    Ok(summary)
}

/// Truncates one table and copies its file in.
async fn load_table(conn: &mut PgConnection, input: &LoadInput) -> Result<u64, LoadError> {
    let data = tokio::fs::read(&input.path).await?;
    let fail = |source| LoadError::TransactionFailure {
        table: input.table.qualified_name(),
        source,
    };

    sqlx::query(&input.table.truncate_sql())
        .execute(&mut *conn)
        .await
        .map_err(fail)?;

    let mut copy = conn
        .copy_in_raw(&input.table.copy_sql())
        .await
        .map_err(fail)?;

    let sent = copy.send(data).await.map(|_| ());
    if let Err(source) = sent {
        if let Err(abort_err) = copy.abort("input stream failed").await {
            debug!("COPY abort reported: {abort_err}");
        }
        return Err(fail(source));
    }

    copy.finish().await.map_err(fail)
}

/// Applies the raw schema migration (create-if-absent).
pub async fn ensure_raw_schema(pool: &PgPool) -> Result<(), LoadError> {
    info!("Applying raw schema migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
