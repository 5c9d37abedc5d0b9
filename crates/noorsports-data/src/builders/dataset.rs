//! Fluent builder for a complete generation run.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::{GenerationConfig, SimulationWindow};
use crate::generators::{
    AssociationGenerator, ContentGenerator, EventGenerator, GeneratedCategory, GeneratedContent,
    GeneratedContentCategory, GeneratedEvent, GeneratedSession, GeneratedUser, GenerationError,
    IdSequence, SessionGenerator, Taxonomy, TaxonomyBuilder, UserGenerator,
};

/// All entity collections of one generation run, in generation order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub categories: Vec<GeneratedCategory>,
    pub users: Vec<GeneratedUser>,
    pub content: Vec<GeneratedContent>,
    pub content_categories: Vec<GeneratedContentCategory>,
    pub sessions: Vec<GeneratedSession>,
    pub events: Vec<GeneratedEvent>,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            category_count: self.categories.len(),
            user_count: self.users.len(),
            content_count: self.content.len(),
            content_category_count: self.content_categories.len(),
            session_count: self.sessions.len(),
            event_count: self.events.len(),
        }
    }
}

/// Row counts of a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub category_count: usize,
    pub user_count: usize,
    pub content_count: usize,
    pub content_category_count: usize,
    pub session_count: usize,
    pub event_count: usize,
}

/// Builder for generating a dataset.
///
/// # Example
///
/// ```rust,ignore
/// let dataset = DatasetBuilder::new()
///     .with_users(500)
///     .with_sessions(3000)
///     .with_seed(7)
///     .build_data()?;
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    config: GenerationConfig,
    taxonomy: Taxonomy,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    /// Creates a builder with the default run size and taxonomy.
    pub fn new() -> Self {
        Self::from_config(GenerationConfig::default())
    }

    /// Creates a builder from a full configuration.
    pub fn from_config(config: GenerationConfig) -> Self {
        Self {
            config,
            taxonomy: Taxonomy::default(),
        }
    }

    /// Sets the number of users to generate.
    pub fn with_users(mut self, count: usize) -> Self {
        self.config.user_count = count;
        self
    }

    /// Sets the number of content items to generate.
    pub fn with_content(mut self, count: usize) -> Self {
        self.config.content_count = count;
        self
    }

    /// Sets the number of sessions to generate.
    pub fn with_sessions(mut self, count: usize) -> Self {
        self.config.session_count = count;
        self
    }

    /// Sets the simulation window.
    pub fn with_window(mut self, window: SimulationWindow) -> Self {
        self.config.window = window;
        self
    }

    /// Sets the upper bound on events per touched content item.
    pub fn with_max_events_per_session(mut self, max: usize) -> Self {
        self.config.max_events_per_session = max;
        self
    }

    /// Replaces the category taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates the dataset from the configured seed.
    pub fn build_data(&self) -> Result<Dataset, GenerationError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.build_data_with_rng(&mut rng)
    }

    /// Generates the dataset from a caller-supplied random stream.
    ///
    /// Generators are always called in the same order (taxonomy, users,
    /// content, content-category links, sessions, events), so a given stream
    /// always produces the same dataset.
    pub fn build_data_with_rng(&self, rng: &mut impl Rng) -> Result<Dataset, GenerationError> {
        self.config.validate()?;

        let user_gen = UserGenerator::new();
        let content_gen = ContentGenerator::new()?;
        let assoc_gen = AssociationGenerator::new()?;
        let event_gen = EventGenerator::new()?;
        user_gen.validate_window(&self.config.window)?;
        event_gen.validate_window(&self.config.window)?;

        let start = Instant::now();
        let window = self.config.window;

        info!(
            "Generating dataset: {} users, {} content, {} sessions (seed {})",
            self.config.user_count,
            self.config.content_count,
            self.config.session_count,
            self.config.seed
        );

        let tree = TaxonomyBuilder::new(&self.taxonomy).build(&mut IdSequence::default())?;

        let users = user_gen.generate_batch(
            self.config.user_count,
            &window,
            tree.sport_names(),
            rng,
        );

        let content = content_gen.generate_batch(self.config.content_count, &window, rng);
        let content_ids: Vec<i64> = content.iter().map(|c| c.content_id).collect();

        let content_categories = assoc_gen.generate_batch(&content_ids, &tree, rng);

        let sessions = SessionGenerator::new().generate_batch(
            self.config.session_count,
            self.config.user_count,
            &window,
            rng,
        );

        let events = event_gen.generate_for_sessions(
            &sessions,
            &content_ids,
            self.config.max_events_per_session,
            &mut IdSequence::default(),
            rng,
        );

        let dataset = Dataset {
            categories: tree.into_categories(),
            users,
            content,
            content_categories,
            sessions,
            events,
        };

        let summary = dataset.summary();
        info!("Generated dataset in {}ms", start.elapsed().as_millis());
        info!(
            "  {} categories, {} users, {} content, {} links, {} sessions, {} events",
            summary.category_count,
            summary.user_count,
            summary.content_count,
            summary.content_category_count,
            summary.session_count,
            summary.event_count
        );

        Ok(dataset)
    }
}

/// Preset runs.
impl DatasetBuilder {
    /// A handful of rows over the default window; useful for smoke tests.
    ///
    /// - 5 users, 3 content items, 4 sessions
    pub fn tiny() -> Self {
        Self::new().with_users(5).with_content(3).with_sessions(4)
    }
}
