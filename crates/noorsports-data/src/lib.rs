//! Synthetic dataset generation and raw warehouse loading for noorsports.
//!
//! This crate generates a referentially consistent sports-media dataset
//! (categories, users, content, sessions, interaction events and
//! content-category links), writes it as CSV files, and loads those files into
//! the warehouse's `raw` schema with an idempotent truncate-and-reload.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use noorsports_data::prelude::*;
//!
//! let dataset = DatasetBuilder::new()
//!     .with_users(250)
//!     .with_sessions(1200)
//!     .with_seed(42)
//!     .build_data()?;
//! DatasetWriter::new("data/raw").write(&dataset)?;
//!
//! let pool = db::connect(&warehouse).await?;
//! RawLoader::new(pool, "data/raw").load().await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod export;
pub mod generators;
pub mod tables;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{Dataset, DatasetBuilder, DatasetSummary};
    pub use crate::config::{GenerationConfig, SimulationWindow, WarehouseConfig};
    pub use crate::db::{self, LoadError, LoadSummary, RawLoader};
    pub use crate::export::{DatasetWriter, WriteError, WriteSummary};
    pub use crate::generators::{
        AssociationGenerator, CategoryLevel, ContentGenerator, EventGenerator, GenerationError,
        IdSequence, SessionGenerator, Taxonomy, TaxonomyBuilder, UserGenerator,
    };
    pub use crate::tables::RawTable;
}
