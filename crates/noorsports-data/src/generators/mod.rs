//! Entity generators for the synthetic dataset.
//!
//! This module provides generators for every raw entity:
//! - [`TaxonomyBuilder`]: Build the sport → league → team category tree
//! - [`UserGenerator`]: Generate users with signup and acquisition attributes
//! - [`ContentGenerator`]: Generate content items with weighted content types
//! - [`SessionGenerator`]: Generate sessions with atomic geo-tuples
//! - [`EventGenerator`]: Generate per-session content interaction events
//! - [`AssociationGenerator`]: Link content to categories
//!
//! All generators draw from a caller-supplied random stream, and id
//! assignment that spans several calls goes through an explicit [`IdSequence`].

pub mod association;
pub mod content;
pub mod event;
pub mod sequence;
pub mod session;
pub mod taxonomy;
pub mod user;

use rand::Rng;
use rand::distributions::WeightedIndex;
use rand_distr::Distribution;
use thiserror::Error;

pub use association::{
    AssociationGenConfig, AssociationGenerator, GeneratedContentCategory, LinkSource,
    RelationshipType,
};
pub use content::{ContentGenConfig, ContentGenerator, ContentType, GeneratedContent};
pub use event::{EventGenConfig, EventGenerator, EventType, GeneratedEvent};
pub use sequence::IdSequence;
pub use session::{GEO_TUPLES, GeneratedSession, GeoTuple, Platform, SessionGenerator};
pub use taxonomy::{
    CategoryLevel, CategoryTree, GeneratedCategory, LeagueSpec, SportSpec, Taxonomy,
    TaxonomyBuilder,
};
pub use user::{GeneratedUser, UserGenConfig, UserGenerator};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Weighted draw over a fixed list of values.
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedChoice<T> {
    /// Builds the distribution from `(value, weight)` pairs.
    ///
    /// Weights need not sum to one, but must be non-negative with a positive total.
    pub fn new(weighted: &[(T, f64)]) -> Result<Self, GenerationError> {
        let index = WeightedIndex::new(weighted.iter().map(|(_, weight)| *weight))
            .map_err(|e| GenerationError::Configuration(format!("invalid weights: {e}")))?;

        Ok(Self {
            values: weighted.iter().map(|(value, _)| *value).collect(),
            index,
        })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> T {
        self.values[self.index.sample(rng)]
    }
}

/// Rounds to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
