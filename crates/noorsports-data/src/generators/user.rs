//! User generation with signup and acquisition attributes.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::GenerationError;
use crate::config::SimulationWindow;

/// Generated user row ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedUser {
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub signup_ts: OffsetDateTime,
    pub country: String,
    pub marketing_channel: String,
    pub fav_sport: String,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Countries a user can sign up from.
    pub countries: Vec<String>,
    /// Acquisition channels.
    pub marketing_channels: Vec<String>,
    /// How many days before the window start a signup can happen (inclusive).
    pub signup_lookback_days: (i64, i64),
    /// Extra hours subtracted from the signup time (inclusive).
    pub signup_hour_jitter: (i64, i64),
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            countries: ["CA", "US", "GB", "IN", "AU"]
                .into_iter()
                .map(String::from)
                .collect(),
            marketing_channels: ["organic", "paid_search", "social", "referral", "email"]
                .into_iter()
                .map(String::from)
                .collect(),
            signup_lookback_days: (1, 180),
            signup_hour_jitter: (0, 23),
        }
    }
}

/// Generates users who all signed up before the simulation window opens.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Checks that the earliest possible signup before `window` is representable.
    pub fn validate_window(&self, window: &SimulationWindow) -> Result<(), GenerationError> {
        let (_, max_days) = self.config.signup_lookback_days;
        let (_, max_hours) = self.config.signup_hour_jitter;

        window
            .start
            .checked_sub(Duration::days(max_days))
            .and_then(|ts| ts.checked_sub(Duration::hours(max_hours)))
            .map(|_| ())
            .ok_or_else(|| {
                GenerationError::Configuration(format!(
                    "signups up to {max_days} days before {} are out of range",
                    window.start
                ))
            })
    }

    /// Generates a single user.
    ///
    /// `sport_names` must not be empty, and `window` must pass
    /// [`validate_window`](Self::validate_window).
    pub fn generate(
        &self,
        user_id: i64,
        window: &SimulationWindow,
        sport_names: &[String],
        rng: &mut impl Rng,
    ) -> GeneratedUser {
        let (min_days, max_days) = self.config.signup_lookback_days;
        let (min_hours, max_hours) = self.config.signup_hour_jitter;
        let signup_ts = window.start
            - Duration::days(rng.gen_range(min_days..=max_days))
            - Duration::hours(rng.gen_range(min_hours..=max_hours));

        GeneratedUser {
            user_id,
            signup_ts,
            country: pick(&self.config.countries, rng),
            marketing_channel: pick(&self.config.marketing_channels, rng),
            fav_sport: pick(sport_names, rng),
        }
    }

    /// Generates users with ids `1..=count`.
    pub fn generate_batch(
        &self,
        count: usize,
        window: &SimulationWindow,
        sport_names: &[String],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedUser> {
        (1..=count as i64)
            .map(|user_id| self.generate(user_id, window, sport_names, rng))
            .collect()
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(values: &[String], rng: &mut impl Rng) -> String {
    values.choose(rng).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sports() -> Vec<String> {
        vec!["Basketball".into(), "Hockey".into(), "Soccer".into()]
    }

    #[test]
    fn test_generate_batch_ids_are_dense() {
        let user_gen = UserGenerator::new();
        let mut rng = StdRng::seed_from_u64(42);
        let users = user_gen.generate_batch(25, &SimulationWindow::default(), &sports(), &mut rng);

        let ids: Vec<i64> = users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_signup_precedes_window() {
        let user_gen = UserGenerator::new();
        let window = SimulationWindow::default();
        let mut rng = StdRng::seed_from_u64(42);

        for user in user_gen.generate_batch(200, &window, &sports(), &mut rng) {
            assert!(user.signup_ts < window.start);
            assert!(user.signup_ts >= window.start - Duration::days(180) - Duration::hours(23));
        }
    }

    #[test]
    fn test_window_near_min_date_rejected() {
        let user_gen = UserGenerator::new();
        let start = time::Date::MIN.midnight().assume_utc() + Duration::days(100);
        let window = SimulationWindow::new(start, start + Duration::days(21));

        assert!(matches!(
            user_gen.validate_window(&window),
            Err(GenerationError::Configuration(_))
        ));
        assert!(user_gen.validate_window(&SimulationWindow::default()).is_ok());
    }

    #[test]
    fn test_attributes_come_from_enumerations() {
        let user_gen = UserGenerator::new();
        let config = UserGenConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        for user in user_gen.generate_batch(100, &SimulationWindow::default(), &sports(), &mut rng)
        {
            assert!(config.countries.contains(&user.country));
            assert!(config.marketing_channels.contains(&user.marketing_channel));
            assert!(sports().contains(&user.fav_sport));
        }
    }
}
