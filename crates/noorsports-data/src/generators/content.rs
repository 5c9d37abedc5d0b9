//! Content generation with weighted content types.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{GenerationError, WeightedChoice};
use crate::config::SimulationWindow;

/// Kind of content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    News,
    Video,
    GameEvent,
    HomePage,
}

impl ContentType {
    /// Returns the warehouse string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Video => "video",
            ContentType::GameEvent => "game_event",
            ContentType::HomePage => "home_page",
        }
    }
}

/// Generated content row ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    pub content_id: i64,
    pub content_title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub publish_ts: OffsetDateTime,
    pub content_type: ContentType,
    pub author_id: i64,
    pub content_url: String,
}

/// Configuration for content generation.
#[derive(Debug, Clone)]
pub struct ContentGenConfig {
    /// Relative frequency of each content type.
    pub type_weights: Vec<(ContentType, f64)>,
    /// Tags appended to generated titles.
    pub descriptors: Vec<String>,
    /// Inclusive range of author ids.
    pub author_ids: (i64, i64),
    /// Publish timestamps are aligned to this step from the window start.
    pub publish_granularity: Duration,
}

impl Default for ContentGenConfig {
    fn default() -> Self {
        Self {
            type_weights: vec![
                (ContentType::News, 0.35),
                (ContentType::Video, 0.40),
                (ContentType::GameEvent, 0.20),
                (ContentType::HomePage, 0.05),
            ],
            descriptors: ["Highlights", "Recap", "Preview", "Analysis"]
                .into_iter()
                .map(String::from)
                .collect(),
            author_ids: (1, 30),
            publish_granularity: Duration::hours(1),
        }
    }
}

/// Generates content published inside the simulation window.
pub struct ContentGenerator {
    config: ContentGenConfig,
    content_types: WeightedChoice<ContentType>,
}

impl ContentGenerator {
    /// Creates a content generator with default configuration.
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_config(ContentGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ContentGenConfig) -> Result<Self, GenerationError> {
        if config.descriptors.is_empty() {
            return Err(GenerationError::Configuration(
                "content descriptors must not be empty".into(),
            ));
        }
        if config.author_ids.0 > config.author_ids.1 {
            return Err(GenerationError::Configuration(format!(
                "author id range {}..={} is empty",
                config.author_ids.0, config.author_ids.1
            )));
        }

        let content_types = WeightedChoice::new(&config.type_weights)?;
        Ok(Self {
            config,
            content_types,
        })
    }

    /// Generates a single content item.
    pub fn generate(
        &self,
        content_id: i64,
        window: &SimulationWindow,
        rng: &mut impl Rng,
    ) -> GeneratedContent {
        let publish_ts = window.random_instant(self.config.publish_granularity, rng);
        let content_type = self.content_types.sample(rng);
        let descriptor = &self.config.descriptors[rng.gen_range(0..self.config.descriptors.len())];
        let (min_author, max_author) = self.config.author_ids;

        GeneratedContent {
            content_id,
            content_title: format!(
                "{} #{}: {}",
                content_type.as_str().to_uppercase(),
                content_id,
                descriptor
            ),
            publish_ts,
            content_type,
            author_id: rng.gen_range(min_author..=max_author),
            content_url: format!("/content/{content_id}"),
        }
    }

    /// Generates content with ids `1..=count`.
    pub fn generate_batch(
        &self,
        count: usize,
        window: &SimulationWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedContent> {
        (1..=count as i64)
            .map(|content_id| self.generate(content_id, window, rng))
            .collect()
    }
}
