//! Content → category links.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::taxonomy::{CategoryLevel, CategoryTree};
use super::{GenerationError, WeightedChoice, round_to};

/// How a category relates to a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Primary,
    Mentioned,
    Tagged,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 3] = [
        RelationshipType::Primary,
        RelationshipType::Mentioned,
        RelationshipType::Tagged,
    ];
}

/// Who or what attributed the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    Editorial,
    Nlp,
    User,
}

impl LinkSource {
    pub const ALL: [LinkSource; 3] = [LinkSource::Editorial, LinkSource::Nlp, LinkSource::User];
}

/// Generated content-category link ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContentCategory {
    pub content_id: i64,
    pub category_id: i64,
    pub relationship_type: RelationshipType,
    pub source: LinkSource,
    pub confidence_score: f64,
    pub attribution_weight: f64,
}

/// Configuration for association generation.
#[derive(Debug, Clone)]
pub struct AssociationGenConfig {
    /// Weights for how many category draws a content item gets.
    pub link_count_weights: Vec<(usize, f64)>,
    /// Weights for which taxonomy level each draw comes from.
    pub level_weights: Vec<(CategoryLevel, f64)>,
    /// Inclusive range for `confidence_score`.
    pub confidence_range: (f64, f64),
    /// Inclusive range for `attribution_weight`.
    pub attribution_range: (f64, f64),
    /// Decimal places kept on both scores.
    pub score_decimals: i32,
}

impl Default for AssociationGenConfig {
    fn default() -> Self {
        Self {
            link_count_weights: vec![(1, 0.55), (2, 0.35), (3, 0.10)],
            level_weights: vec![
                (CategoryLevel::Team, 0.70),
                (CategoryLevel::League, 0.20),
                (CategoryLevel::Sport, 0.10),
            ],
            confidence_range: (0.6, 0.99),
            attribution_range: (0.2, 1.0),
            score_decimals: 3,
        }
    }
}

/// Links content items to categories of the taxonomy.
///
/// Each item gets `k` draws; draws that land on an already chosen category are
/// dropped rather than redrawn, so an item can end up with fewer than `k` links.
pub struct AssociationGenerator {
    config: AssociationGenConfig,
    link_counts: WeightedChoice<usize>,
    levels: WeightedChoice<CategoryLevel>,
}

impl AssociationGenerator {
    /// Creates an association generator with default configuration.
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_config(AssociationGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: AssociationGenConfig) -> Result<Self, GenerationError> {
        for (name, (low, high)) in [
            ("confidence", config.confidence_range),
            ("attribution", config.attribution_range),
        ] {
            if low > high {
                return Err(GenerationError::Configuration(format!(
                    "{name} range {low}..={high} is empty"
                )));
            }
        }

        let link_counts = WeightedChoice::new(&config.link_count_weights)?;
        let levels = WeightedChoice::new(&config.level_weights)?;

        Ok(Self {
            config,
            link_counts,
            levels,
        })
    }

    /// Generates the links for one content item.
    pub fn generate_for_content(
        &self,
        content_id: i64,
        tree: &CategoryTree,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedContentCategory> {
        let draws = self.link_counts.sample(rng);

        // Insertion-ordered so output does not depend on hashing
        let mut chosen: Vec<i64> = Vec::with_capacity(draws);
        for _ in 0..draws {
            let pool = tree.ids_at(self.levels.sample(rng));
            let category_id = pool[rng.gen_range(0..pool.len())];
            if !chosen.contains(&category_id) {
                chosen.push(category_id);
            }
        }

        chosen
            .into_iter()
            .map(|category_id| self.generate_link(content_id, category_id, rng))
            .collect()
    }

    /// Generates links for every content id, in order.
    pub fn generate_batch(
        &self,
        content_ids: &[i64],
        tree: &CategoryTree,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedContentCategory> {
        content_ids
            .iter()
            .flat_map(|&content_id| self.generate_for_content(content_id, tree, rng))
            .collect()
    }

    fn generate_link(
        &self,
        content_id: i64,
        category_id: i64,
        rng: &mut impl Rng,
    ) -> GeneratedContentCategory {
        let relationship_type =
            RelationshipType::ALL[rng.gen_range(0..RelationshipType::ALL.len())];
        let source = LinkSource::ALL[rng.gen_range(0..LinkSource::ALL.len())];
        let (min_conf, max_conf) = self.config.confidence_range;
        let (min_attr, max_attr) = self.config.attribution_range;

        GeneratedContentCategory {
            content_id,
            category_id,
            relationship_type,
            source,
            confidence_score: round_to(
                rng.gen_range(min_conf..=max_conf),
                self.config.score_decimals,
            ),
            attribution_weight: round_to(
                rng.gen_range(min_attr..=max_attr),
                self.config.score_decimals,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{IdSequence, Taxonomy, TaxonomyBuilder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn tree() -> CategoryTree {
        TaxonomyBuilder::new(&Taxonomy::default())
            .build(&mut IdSequence::default())
            .unwrap()
    }

    #[test]
    fn test_links_are_unique_per_content() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let tree = tree();
        let mut rng = StdRng::seed_from_u64(42);
        let content_ids: Vec<i64> = (1..=500).collect();

        let links = assoc_gen.generate_batch(&content_ids, &tree, &mut rng);

        let mut per_content: HashMap<i64, HashSet<i64>> = HashMap::new();
        for link in &links {
            let fresh = per_content
                .entry(link.content_id)
                .or_default()
                .insert(link.category_id);
            assert!(fresh, "duplicate link {} -> {}", link.content_id, link.category_id);
        }

        assert_eq!(per_content.len(), 500);
        for categories in per_content.values() {
            assert!((1..=3).contains(&categories.len()));
        }
    }

    #[test]
    fn test_links_reference_real_categories() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let tree = tree();
        let mut rng = StdRng::seed_from_u64(5);
        let known: HashSet<i64> = tree.categories().iter().map(|c| c.category_id).collect();

        for link in assoc_gen.generate_batch(&[1, 2, 3, 4, 5], &tree, &mut rng) {
            assert!(known.contains(&link.category_id));
        }
    }

    #[test]
    fn test_scores_in_range_and_rounded() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let tree = tree();
        let mut rng = StdRng::seed_from_u64(77);
        let content_ids: Vec<i64> = (1..=300).collect();

        for link in assoc_gen.generate_batch(&content_ids, &tree, &mut rng) {
            assert!((0.6..=0.99).contains(&link.confidence_score));
            assert!((0.2..=1.0).contains(&link.attribution_weight));

            let scaled = link.confidence_score * 1000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
            let scaled = link.attribution_weight * 1000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_link_count_distribution_roughly_matches_weights() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(31);

        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            counts[assoc_gen.link_counts.sample(&mut rng)] += 1;
        }

        let share = |k: usize| counts[k] as f64 / 10_000.0;
        assert_eq!(counts[0], 0);
        assert!((share(1) - 0.55).abs() < 0.03);
        assert!((share(2) - 0.35).abs() < 0.03);
        assert!((share(3) - 0.10).abs() < 0.03);
    }

    #[test]
    fn test_level_distribution_roughly_matches_weights() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(37);

        let mut counts: HashMap<CategoryLevel, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(assoc_gen.levels.sample(&mut rng)).or_default() += 1;
        }

        let share = |l: CategoryLevel| counts.get(&l).copied().unwrap_or(0) as f64 / 10_000.0;
        assert!((share(CategoryLevel::Team) - 0.70).abs() < 0.03);
        assert!((share(CategoryLevel::League) - 0.20).abs() < 0.03);
        assert!((share(CategoryLevel::Sport) - 0.10).abs() < 0.03);
    }

    #[test]
    fn test_every_level_gets_links() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let tree = tree();
        let mut rng = StdRng::seed_from_u64(41);
        let content_ids: Vec<i64> = (1..=2000).collect();

        let links = assoc_gen.generate_batch(&content_ids, &tree, &mut rng);
        let at_level = |level: CategoryLevel| {
            let ids: HashSet<i64> = tree.ids_at(level).iter().copied().collect();
            links.iter().filter(|l| ids.contains(&l.category_id)).count()
        };

        assert!(at_level(CategoryLevel::League) > 0);
        assert!(at_level(CategoryLevel::Sport) > 0);
        assert_eq!(
            at_level(CategoryLevel::Team)
                + at_level(CategoryLevel::League)
                + at_level(CategoryLevel::Sport),
            links.len()
        );
    }

    #[test]
    fn test_team_level_dominates() {
        let assoc_gen = AssociationGenerator::new().unwrap();
        let tree = tree();
        let teams: HashSet<i64> = tree.ids_at(CategoryLevel::Team).iter().copied().collect();
        let mut rng = StdRng::seed_from_u64(3);
        let content_ids: Vec<i64> = (1..=2000).collect();

        let links = assoc_gen.generate_batch(&content_ids, &tree, &mut rng);
        let team_links = links.iter().filter(|l| teams.contains(&l.category_id)).count();

        assert!(team_links as f64 / links.len() as f64 > 0.6);
    }
}
