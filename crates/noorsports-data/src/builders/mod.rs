//! Fluent builder APIs for generation runs.
//!
//! The [`DatasetBuilder`] wires the entity generators together in their fixed
//! order and produces a complete, referentially consistent [`Dataset`].

mod dataset;

pub use dataset::{Dataset, DatasetBuilder, DatasetSummary};
