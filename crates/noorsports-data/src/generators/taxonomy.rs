//! Sport → league → team category hierarchy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationError, IdSequence};

/// Depth of a category in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLevel {
    Sport,
    League,
    Team,
}

impl CategoryLevel {
    /// Returns the warehouse string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLevel::Sport => "sport",
            CategoryLevel::League => "league",
            CategoryLevel::Team => "team",
        }
    }
}

/// Category row ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedCategory {
    pub category_id: i64,
    pub category_name: String,
    pub category_level: CategoryLevel,
    pub parent_category_id: Option<i64>,
    pub category_desc: String,
}

/// A league and its ordered teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSpec {
    pub name: String,
    pub teams: Vec<String>,
}

/// A sport and its ordered leagues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportSpec {
    pub name: String,
    pub leagues: Vec<LeagueSpec>,
}

/// Static taxonomy mapping; iteration order is significant for id assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    pub sports: Vec<SportSpec>,
}

impl Taxonomy {
    /// Builds a taxonomy from nested `(sport, [(league, [team])])` slices.
    pub fn from_static(mapping: &[(&str, &[(&str, &[&str])])]) -> Self {
        let sports = mapping
            .iter()
            .map(|(sport, leagues)| SportSpec {
                name: sport.to_string(),
                leagues: leagues
                    .iter()
                    .map(|(league, teams)| LeagueSpec {
                        name: league.to_string(),
                        teams: teams.iter().map(|t| t.to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { sports }
    }

    /// Checks that every sport and league has concrete children.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.sports.is_empty() {
            return Err(GenerationError::Configuration(
                "taxonomy has no sports".into(),
            ));
        }

        for sport in &self.sports {
            if sport.leagues.is_empty() {
                return Err(GenerationError::Configuration(format!(
                    "sport '{}' has no leagues",
                    sport.name
                )));
            }
            for league in &sport.leagues {
                if league.teams.is_empty() {
                    return Err(GenerationError::Configuration(format!(
                        "league '{}' under sport '{}' has no teams",
                        league.name, sport.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::from_static(&[
            (
                "Basketball",
                &[("NBA", &["Raptors", "Lakers", "Celtics", "Warriors"])],
            ),
            (
                "Hockey",
                &[("NHL", &["Leafs", "Canadiens", "Oilers", "Canucks"])],
            ),
            (
                "Soccer",
                &[("EPL", &["Arsenal", "Chelsea", "Liverpool", "City"])],
            ),
        ])
    }
}

/// Category rows plus level-filtered lookups used by downstream generators.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    categories: Vec<GeneratedCategory>,
    sport_ids: Vec<i64>,
    league_ids: Vec<i64>,
    team_ids: Vec<i64>,
    sport_names: Vec<String>,
}

impl CategoryTree {
    pub fn categories(&self) -> &[GeneratedCategory] {
        &self.categories
    }

    pub fn into_categories(self) -> Vec<GeneratedCategory> {
        self.categories
    }

    /// Category ids at `level`, in id order. Never empty for a built tree.
    pub fn ids_at(&self, level: CategoryLevel) -> &[i64] {
        match level {
            CategoryLevel::Sport => &self.sport_ids,
            CategoryLevel::League => &self.league_ids,
            CategoryLevel::Team => &self.team_ids,
        }
    }

    /// Sport names in taxonomy order.
    pub fn sport_names(&self) -> &[String] {
        &self.sport_names
    }

    fn push(&mut self, category: GeneratedCategory) {
        match category.category_level {
            CategoryLevel::Sport => {
                self.sport_ids.push(category.category_id);
                self.sport_names.push(category.category_name.clone());
            }
            CategoryLevel::League => self.league_ids.push(category.category_id),
            CategoryLevel::Team => self.team_ids.push(category.category_id),
        }
        self.categories.push(category);
    }
}

/// Turns a [`Taxonomy`] into category rows.
///
/// Ids come from two passes over the mapping: first every sport in order,
/// then for each sport its leagues, each league immediately followed by its
/// teams.
pub struct TaxonomyBuilder<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> TaxonomyBuilder<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn build(&self, ids: &mut IdSequence) -> Result<CategoryTree, GenerationError> {
        self.taxonomy.validate()?;

        let mut tree = CategoryTree {
            categories: Vec::new(),
            sport_ids: Vec::new(),
            league_ids: Vec::new(),
            team_ids: Vec::new(),
            sport_names: Vec::new(),
        };

        // Pass 1: sports
        for sport in &self.taxonomy.sports {
            tree.push(GeneratedCategory {
                category_id: ids.next_id(),
                category_name: sport.name.clone(),
                category_level: CategoryLevel::Sport,
                parent_category_id: None,
                category_desc: format!("{} root node", sport.name),
            });
        }

        // Pass 2: leagues, each followed by its teams
        let sport_ids = tree.sport_ids.clone();
        for (sport, &sport_id) in self.taxonomy.sports.iter().zip(&sport_ids) {
            for league in &sport.leagues {
                let league_id = ids.next_id();
                tree.push(GeneratedCategory {
                    category_id: league_id,
                    category_name: league.name.clone(),
                    category_level: CategoryLevel::League,
                    parent_category_id: Some(sport_id),
                    category_desc: format!("{} league under {}", league.name, sport.name),
                });

                for team in &league.teams {
                    tree.push(GeneratedCategory {
                        category_id: ids.next_id(),
                        category_name: team.clone(),
                        category_level: CategoryLevel::Team,
                        parent_category_id: Some(league_id),
                        category_desc: format!("{} team under {}", team, league.name),
                    });
                }
            }
        }

        debug!(
            "Built taxonomy: {} sports, {} leagues, {} teams",
            tree.sport_ids.len(),
            tree.league_ids.len(),
            tree.team_ids.len()
        );

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn build_default() -> CategoryTree {
        let taxonomy = Taxonomy::default();
        TaxonomyBuilder::new(&taxonomy)
            .build(&mut IdSequence::default())
            .unwrap()
    }

    #[test]
    fn test_sport_ids_assigned_first() {
        let tree = build_default();

        assert_eq!(tree.ids_at(CategoryLevel::Sport), &[1, 2, 3]);
        assert_eq!(tree.sport_names(), &["Basketball", "Hockey", "Soccer"]);
    }

    #[test]
    fn test_league_then_teams_ordering() {
        let tree = build_default();

        assert_eq!(tree.ids_at(CategoryLevel::League), &[4, 9, 14]);
        assert_eq!(tree.ids_at(CategoryLevel::Team).len(), 12);

        let raptors = &tree.categories()[4];
        assert_eq!(raptors.category_id, 5);
        assert_eq!(raptors.category_name, "Raptors");
        assert_eq!(raptors.parent_category_id, Some(4));
        assert_eq!(raptors.category_desc, "Raptors team under NBA");

        let last = tree.categories().last().unwrap();
        assert_eq!(last.category_id, 18);
        assert_eq!(last.category_name, "City");
        assert_eq!(last.parent_category_id, Some(14));
    }

    #[test]
    fn test_parent_levels_are_consistent() {
        let tree = build_default();
        let by_id: HashMap<i64, &GeneratedCategory> = tree
            .categories()
            .iter()
            .map(|c| (c.category_id, c))
            .collect();

        for category in tree.categories() {
            let parent_level = category
                .parent_category_id
                .map(|id| by_id[&id].category_level);

            match category.category_level {
                CategoryLevel::Sport => assert_eq!(parent_level, None),
                CategoryLevel::League => assert_eq!(parent_level, Some(CategoryLevel::Sport)),
                CategoryLevel::Team => assert_eq!(parent_level, Some(CategoryLevel::League)),
            }
        }
    }

    #[test]
    fn test_multiple_leagues_per_sport() {
        let taxonomy = Taxonomy::from_static(&[
            ("Soccer", &[("EPL", &["Arsenal"]), ("MLS", &["Toronto FC", "LAFC"])]),
            ("Hockey", &[("NHL", &["Leafs"])]),
        ]);
        let tree = TaxonomyBuilder::new(&taxonomy)
            .build(&mut IdSequence::default())
            .unwrap();

        let names: Vec<(i64, &str)> = tree
            .categories()
            .iter()
            .map(|c| (c.category_id, c.category_name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (1, "Soccer"),
                (2, "Hockey"),
                (3, "EPL"),
                (4, "Arsenal"),
                (5, "MLS"),
                (6, "Toronto FC"),
                (7, "LAFC"),
                (8, "NHL"),
                (9, "Leafs"),
            ]
        );
    }

    #[test]
    fn test_degenerate_nodes_rejected() {
        let empty_league = Taxonomy::from_static(&[("Hockey", &[("NHL", &[])])]);
        let mut ids = IdSequence::default();
        let err = TaxonomyBuilder::new(&empty_league).build(&mut ids);
        assert!(matches!(err, Err(GenerationError::Configuration(_))));
        // No ids are consumed when validation fails
        assert_eq!(ids.peek(), 1);

        let no_leagues = Taxonomy::from_static(&[("Hockey", &[])]);
        assert!(TaxonomyBuilder::new(&no_leagues)
            .build(&mut IdSequence::default())
            .is_err());

        let empty = Taxonomy::from_static(&[]);
        assert!(TaxonomyBuilder::new(&empty)
            .build(&mut IdSequence::default())
            .is_err());
    }
}
