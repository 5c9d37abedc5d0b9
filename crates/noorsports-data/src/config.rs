//! Configuration types for dataset generation and warehouse loading.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use time::{Duration, OffsetDateTime, macros::datetime};

use crate::generators::GenerationError;

/// Half-open time range `[start, end)` that content, sessions and events fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationWindow {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl SimulationWindow {
    pub const fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// Window of `days` whole days ending at `end`.
    ///
    /// Fails if the start would fall outside the representable date range.
    pub fn ending_at(end: OffsetDateTime, days: i64) -> Result<Self, GenerationError> {
        let start = days
            .checked_mul(Duration::DAY.whole_seconds())
            .and_then(|seconds| end.checked_sub(Duration::seconds(seconds)))
            .ok_or_else(|| {
                GenerationError::Configuration(format!(
                    "a {days}-day window ending at {end} is out of range"
                ))
            })?;

        Ok(Self { start, end })
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, ts: OffsetDateTime) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Returns a uniformly drawn instant inside the window, aligned to `granularity`
    /// steps from the window start.
    pub fn random_instant(&self, granularity: Duration, rng: &mut impl Rng) -> OffsetDateTime {
        let step = granularity.whole_seconds().max(1);
        let steps = (self.length().whole_seconds() / step).max(1);
        self.start + Duration::seconds(step * rng.gen_range(0..steps))
    }
}

impl Default for SimulationWindow {
    /// The 21 days leading up to the end of 2025.
    fn default() -> Self {
        Self::new(datetime!(2025-12-10 0:00 UTC), datetime!(2025-12-31 0:00 UTC))
    }
}

/// Configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of users to generate.
    pub user_count: usize,

    /// Number of content items to generate.
    pub content_count: usize,

    /// Number of sessions to generate.
    pub session_count: usize,

    /// Time range for content, session and event timestamps.
    pub window: SimulationWindow,

    /// Upper bound on events generated per touched content item in a session.
    pub max_events_per_session: usize,

    /// Seed for the run's random stream.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            user_count: 250,
            content_count: 120,
            session_count: 1200,
            window: SimulationWindow::default(),
            max_events_per_session: 20,
            seed: 42,
        }
    }
}

impl GenerationConfig {
    /// Minimum events generated per touched content item.
    pub const MIN_EVENTS_PER_CONTENT: usize = 2;

    /// Checks the run parameters before any random draws happen.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.user_count == 0 {
            return Err(GenerationError::Configuration(
                "user count must be positive".into(),
            ));
        }
        if self.content_count == 0 {
            return Err(GenerationError::Configuration(
                "content count must be positive".into(),
            ));
        }
        if self.window.length() <= Duration::ZERO {
            return Err(GenerationError::Configuration(format!(
                "simulation window must have positive length (start {}, end {})",
                self.window.start, self.window.end
            )));
        }
        if self.max_events_per_session < Self::MIN_EVENTS_PER_CONTENT {
            return Err(GenerationError::Configuration(format!(
                "max events per session must be at least {}",
                Self::MIN_EVENTS_PER_CONTENT
            )));
        }
        Ok(())
    }
}

/// Warehouse connection settings, read from the process environment.
#[derive(Clone, clap::Args)]
pub struct WarehouseConfig {
    /// Warehouse host name
    #[arg(long = "warehouse-host", env = "WAREHOUSE_HOST")]
    pub host: String,

    /// Warehouse port
    #[arg(long = "warehouse-port", env = "WAREHOUSE_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Warehouse database name
    #[arg(long = "warehouse-db", env = "WAREHOUSE_DB")]
    pub database: String,

    /// Warehouse user
    #[arg(long = "warehouse-user", env = "WAREHOUSE_USER")]
    pub user: String,

    /// Warehouse password
    #[arg(long = "warehouse-password", env = "WAREHOUSE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl WarehouseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

impl fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
