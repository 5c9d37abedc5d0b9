//! CSV export of generated datasets.
//!
//! Each entity collection becomes one header-prefixed CSV file named after its
//! raw table. Timestamps are RFC 3339, flags are `0`/`1`, and a missing parent
//! category is an empty field.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::builders::Dataset;
use crate::tables::RawTable;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: Vec<(RawTable, PathBuf, usize)>,
}

impl WriteSummary {
    pub fn rows_for(&self, table: RawTable) -> Option<usize> {
        self.files
            .iter()
            .find(|(t, _, _)| *t == table)
            .map(|(_, _, rows)| *rows)
    }
}

/// Writes a [`Dataset`] into a directory of CSV files.
pub struct DatasetWriter {
    out_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Writes all six files, creating the output directory if needed.
    pub fn write(&self, dataset: &Dataset) -> Result<WriteSummary, WriteError> {
        std::fs::create_dir_all(&self.out_dir)?;
        info!("Writing dataset to {}", self.out_dir.display());

        let mut summary = WriteSummary::default();
        for table in RawTable::ALL {
            let (path, rows) = match table {
                RawTable::Users => self.write_table(table, &dataset.users)?,
                RawTable::Content => self.write_table(table, &dataset.content)?,
                RawTable::Sessions => self.write_table(table, &dataset.sessions)?,
                RawTable::UserContentEvents => self.write_table(table, &dataset.events)?,
                RawTable::Categories => self.write_table(table, &dataset.categories)?,
                RawTable::ContentCategory => {
                    self.write_table(table, &dataset.content_categories)?
                }
            };
            summary.files.push((table, path, rows));
        }

        info!("Wrote {} files", summary.files.len());
        Ok(summary)
    }

    /// Writes one table's rows; the file is flushed and closed before returning.
    fn write_table<T: Serialize>(
        &self,
        table: RawTable,
        rows: &[T],
    ) -> Result<(PathBuf, usize), WriteError> {
        let path = self.out_dir.join(table.file_name());
        let csv_err = |source| WriteError::Csv {
            path: path.clone(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(csv_err)?;

        // Explicit header so empty tables still carry their column list
        writer.write_record(table.columns()).map_err(csv_err)?;
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush()?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok((path, rows.len()))
    }
}
