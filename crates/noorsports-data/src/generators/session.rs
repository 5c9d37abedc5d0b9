//! Session generation.
//!
//! Session geography is always one of [`GEO_TUPLES`], drawn as a unit so that
//! country, state and city can never disagree.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Builder;

use crate::config::SimulationWindow;

/// Client platform a session ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Web,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ios, Platform::Android, Platform::Web];

    /// Returns the warehouse string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Web => "Web",
        }
    }
}

/// A consistent (country, state/province, city) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoTuple {
    pub country: &'static str,
    pub state_province: &'static str,
    pub city: &'static str,
}

impl GeoTuple {
    const fn new(country: &'static str, state_province: &'static str, city: &'static str) -> Self {
        Self {
            country,
            state_province,
            city,
        }
    }
}

pub const GEO_TUPLES: [GeoTuple; 7] = [
    GeoTuple::new("CA", "ON", "Toronto"),
    GeoTuple::new("CA", "BC", "Vancouver"),
    GeoTuple::new("US", "NY", "New York"),
    GeoTuple::new("US", "CA", "San Francisco"),
    GeoTuple::new("GB", "ENG", "London"),
    GeoTuple::new("IN", "DL", "Delhi"),
    GeoTuple::new("AU", "NSW", "Sydney"),
];

/// Generated session row ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSession {
    pub session_id: String,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub session_start_ts: OffsetDateTime,
    pub platform_type: Platform,
    pub country: String,
    pub state_province: String,
    pub city: String,
}

impl GeneratedSession {
    /// The session's geography as a tuple of borrowed fields.
    pub fn geo(&self) -> (&str, &str, &str) {
        (&self.country, &self.state_province, &self.city)
    }
}

/// Generates sessions for existing users.
pub struct SessionGenerator {
    start_granularity: Duration,
}

impl SessionGenerator {
    pub fn new() -> Self {
        Self {
            start_granularity: Duration::minutes(1),
        }
    }

    /// Generates the session at 1-based position `index` in the batch.
    ///
    /// `user_count` must be positive.
    pub fn generate(
        &self,
        index: usize,
        user_count: usize,
        window: &SimulationWindow,
        rng: &mut impl Rng,
    ) -> GeneratedSession {
        let user_id = rng.gen_range(1..=user_count as i64);
        let session_start_ts = window.random_instant(self.start_granularity, rng);
        let platform_type = Platform::ALL[rng.gen_range(0..Platform::ALL.len())];
        let geo = GEO_TUPLES.choose(rng).copied().unwrap_or(GEO_TUPLES[0]);

        GeneratedSession {
            session_id: session_token(index, rng),
            user_id,
            session_start_ts,
            platform_type,
            country: geo.country.to_string(),
            state_province: geo.state_province.to_string(),
            city: geo.city.to_string(),
        }
    }

    /// Generates `count` sessions spread over users `1..=user_count`.
    ///
    /// `user_count` must be positive unless `count` is zero.
    pub fn generate_batch(
        &self,
        count: usize,
        user_count: usize,
        window: &SimulationWindow,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedSession> {
        (1..=count)
            .map(|index| self.generate(index, user_count, window, rng))
            .collect()
    }
}

impl Default for SessionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// `ses_{index}_{8 hex}`; the index keeps tokens unique, the suffix comes from the run's stream.
fn session_token(index: usize, rng: &mut impl Rng) -> String {
    let suffix = Builder::from_random_bytes(rng.r#gen()).into_uuid().simple().to_string();
    format!("ses_{index}_{}", &suffix[..8])
}
