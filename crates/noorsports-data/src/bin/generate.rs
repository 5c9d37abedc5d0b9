//! Generates the synthetic dataset and writes it as CSV files.
//!
//! Run with:
//! ```text
//! cargo run -p noorsports-data --bin generate -- --out data/raw --seed 42
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use noorsports_data::builders::DatasetBuilder;
use noorsports_data::config::{GenerationConfig, SimulationWindow};
use noorsports_data::export::DatasetWriter;
use tracing_subscriber::EnvFilter;

/// Generate the noorsports raw dataset
#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(about = "Generate the synthetic noorsports dataset as CSV files")]
struct Args {
    /// Directory the CSV files are written to
    #[arg(long)]
    out: PathBuf,

    /// Random seed (defaults to 42)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON generation config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of users
    #[arg(long)]
    users: Option<usize>,

    /// Number of content items
    #[arg(long)]
    content: Option<usize>,

    /// Number of sessions
    #[arg(long)]
    sessions: Option<usize>,

    /// Simulation window length in days, ending at the configured window end
    #[arg(long)]
    days: Option<i64>,

    /// Upper bound on events per touched content item
    #[arg(long)]
    max_events_per_session: Option<usize>,
}

impl Args {
    fn generation_config(&self) -> anyhow::Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GenerationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(users) = self.users {
            config.user_count = users;
        }
        if let Some(content) = self.content {
            config.content_count = content;
        }
        if let Some(sessions) = self.sessions {
            config.session_count = sessions;
        }
        if let Some(days) = self.days {
            config.window = SimulationWindow::ending_at(config.window.end, days)?;
        }
        if let Some(max) = self.max_events_per_session {
            config.max_events_per_session = max;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.generation_config()?;

    let dataset = DatasetBuilder::from_config(config).build_data()?;
    let written = DatasetWriter::new(&args.out).write(&dataset)?;

    tracing::info!("Generation completed!");
    for (table, path, rows) in &written.files {
        tracing::info!("  {}: {} rows -> {}", table.name(), rows, path.display());
    }

    Ok(())
}
