//! User-content interaction events.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::session::GeneratedSession;
use super::{GenerationError, IdSequence, WeightedChoice};
use crate::config::SimulationWindow;

/// Interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Open,
    Scroll,
    Watch,
    Complete,
}

impl EventType {
    /// Returns the warehouse string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Open => "open",
            EventType::Scroll => "scroll",
            EventType::Watch => "watch",
            EventType::Complete => "complete",
        }
    }

    pub fn tracks_time_spent(&self) -> bool {
        matches!(self, EventType::Scroll | EventType::Watch)
    }

    pub fn tracks_scrolls(&self) -> bool {
        matches!(self, EventType::Scroll)
    }

    pub fn tracks_completion(&self) -> bool {
        matches!(self, EventType::Watch | EventType::Complete)
    }
}

/// Generated event row ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedEvent {
    pub event_id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub content_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub event_ts: OffsetDateTime,
    pub event_type: EventType,
    pub time_spent_seconds: i32,
    pub scroll_count: i32,
    pub completion_pct: i32,
    pub completed_flag: u8,
    pub live_game_flag: u8,
    pub major_tournament_flag: u8,
}

/// Configuration for event generation.
#[derive(Debug, Clone)]
pub struct EventGenConfig {
    /// Relative frequency of each event type.
    pub type_weights: Vec<(EventType, f64)>,
    /// Inclusive range of distinct content items a session touches.
    pub touched_content: (usize, usize),
    /// Minimum events per touched content item.
    pub min_events_per_content: usize,
    /// Latest event offset from the session start, in seconds.
    pub max_offset_seconds: i64,
    /// Inclusive range for `time_spent_seconds` on scroll/watch events.
    pub time_spent_seconds: (i32, i32),
    /// Inclusive range for `scroll_count` on scroll events.
    pub scroll_count: (i32, i32),
    /// Inclusive range for `completion_pct` on watch/complete events.
    pub completion_pct: (i32, i32),
    /// Completion percentage at which an event counts as completed.
    pub completion_threshold: i32,
    /// Probability that an event happened during a live game.
    pub live_game_probability: f64,
    /// Probability that an event relates to a major tournament.
    pub major_tournament_probability: f64,
}

impl Default for EventGenConfig {
    fn default() -> Self {
        Self {
            type_weights: vec![
                (EventType::Open, 0.10),
                (EventType::Scroll, 0.55),
                (EventType::Watch, 0.30),
                (EventType::Complete, 0.05),
            ],
            touched_content: (1, 4),
            min_events_per_content: 2,
            max_offset_seconds: 1800,
            time_spent_seconds: (1, 60),
            scroll_count: (0, 6),
            completion_pct: (0, 100),
            completion_threshold: 95,
            live_game_probability: 0.15,
            major_tournament_probability: 0.10,
        }
    }
}

/// Whether an event counts as a completion.
pub fn completed_flag(event_type: EventType, completion_pct: i32, threshold: i32) -> u8 {
    u8::from(event_type == EventType::Complete || completion_pct >= threshold)
}

/// Generates interaction events for sessions.
pub struct EventGenerator {
    config: EventGenConfig,
    event_types: WeightedChoice<EventType>,
    live_game: Bernoulli,
    major_tournament: Bernoulli,
}

impl EventGenerator {
    /// Creates an event generator with default configuration.
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_config(EventGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: EventGenConfig) -> Result<Self, GenerationError> {
        let (min_touched, max_touched) = config.touched_content;
        if min_touched == 0 || min_touched > max_touched {
            return Err(GenerationError::Configuration(format!(
                "touched content range {min_touched}..={max_touched} is invalid"
            )));
        }

        let event_types = WeightedChoice::new(&config.type_weights)?;
        let live_game = Bernoulli::new(config.live_game_probability)
            .map_err(|e| GenerationError::Configuration(format!("live game probability: {e}")))?;
        let major_tournament = Bernoulli::new(config.major_tournament_probability).map_err(|e| {
            GenerationError::Configuration(format!("major tournament probability: {e}"))
        })?;

        Ok(Self {
            config,
            event_types,
            live_game,
            major_tournament,
        })
    }

    /// Checks that the latest possible event after `window` is representable.
    pub fn validate_window(&self, window: &SimulationWindow) -> Result<(), GenerationError> {
        window
            .end
            .checked_add(Duration::seconds(self.config.max_offset_seconds))
            .map(|_| ())
            .ok_or_else(|| {
                GenerationError::Configuration(format!(
                    "events up to {}s after {} are out of range",
                    self.config.max_offset_seconds, window.end
                ))
            })
    }

    /// Generates events for every session, numbering them from `ids`.
    ///
    /// Each session touches between one and four distinct content items (fewer
    /// if there is less content), and each touched item gets between the
    /// configured minimum and `max_per_content` events.
    pub fn generate_for_sessions(
        &self,
        sessions: &[GeneratedSession],
        content_ids: &[i64],
        max_per_content: usize,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedEvent> {
        let mut events = Vec::new();

        for session in sessions {
            events.extend(self.generate_for_session(
                session,
                content_ids,
                max_per_content,
                ids,
                rng,
            ));
        }

        events
    }

    /// Generates events for a single session.
    pub fn generate_for_session(
        &self,
        session: &GeneratedSession,
        content_ids: &[i64],
        max_per_content: usize,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedEvent> {
        let (min_touched, max_touched) = self.config.touched_content;
        let touched_count = rng.gen_range(min_touched..=max_touched).min(content_ids.len());
        let touched: Vec<i64> = content_ids
            .choose_multiple(rng, touched_count)
            .copied()
            .collect();

        let min_events = self.config.min_events_per_content;
        let max_events = max_per_content.max(min_events);

        let mut events = Vec::new();
        for content_id in touched {
            let event_count = rng.gen_range(min_events..=max_events);
            for _ in 0..event_count {
                events.push(self.generate_event(ids.next_id(), session, content_id, rng));
            }
        }

        events
    }

    /// Generates one event with type-dependent numeric fields.
    pub fn generate_event(
        &self,
        event_id: i64,
        session: &GeneratedSession,
        content_id: i64,
        rng: &mut impl Rng,
    ) -> GeneratedEvent {
        let event_type = self.event_types.sample(rng);
        let event_ts = session.session_start_ts
            + Duration::seconds(rng.gen_range(0..=self.config.max_offset_seconds));

        let time_spent_seconds = if event_type.tracks_time_spent() {
            draw(self.config.time_spent_seconds, rng)
        } else {
            0
        };
        let scroll_count = if event_type.tracks_scrolls() {
            draw(self.config.scroll_count, rng)
        } else {
            0
        };
        let completion_pct = if event_type.tracks_completion() {
            draw(self.config.completion_pct, rng)
        } else {
            0
        };

        GeneratedEvent {
            event_id,
            user_id: session.user_id,
            session_id: session.session_id.clone(),
            content_id,
            event_ts,
            event_type,
            time_spent_seconds,
            scroll_count,
            completion_pct,
            completed_flag: completed_flag(
                event_type,
                completion_pct,
                self.config.completion_threshold,
            ),
            live_game_flag: u8::from(self.live_game.sample(rng)),
            major_tournament_flag: u8::from(self.major_tournament.sample(rng)),
        }
    }
}

fn draw((min, max): (i32, i32), rng: &mut impl Rng) -> i32 {
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::SessionGenerator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn sessions(count: usize, rng: &mut StdRng) -> Vec<GeneratedSession> {
        SessionGenerator::new().generate_batch(count, 10, &SimulationWindow::default(), rng)
    }

    #[test]
    fn test_completed_flag_rule() {
        assert_eq!(completed_flag(EventType::Complete, 0, 95), 1);
        assert_eq!(completed_flag(EventType::Watch, 95, 95), 1);
        assert_eq!(completed_flag(EventType::Watch, 94, 95), 0);
        assert_eq!(completed_flag(EventType::Scroll, 0, 95), 0);
        assert_eq!(completed_flag(EventType::Open, 0, 95), 0);
    }

    #[test]
    fn test_conditional_fields_follow_event_type() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let sessions = sessions(200, &mut rng);
        let content_ids: Vec<i64> = (1..=20).collect();

        let events = event_gen.generate_for_sessions(
            &sessions,
            &content_ids,
            20,
            &mut IdSequence::default(),
            &mut rng,
        );
        assert!(!events.is_empty());

        for e in &events {
            if !e.event_type.tracks_time_spent() {
                assert_eq!(e.time_spent_seconds, 0);
            } else {
                assert!((1..=60).contains(&e.time_spent_seconds));
            }
            if !e.event_type.tracks_scrolls() {
                assert_eq!(e.scroll_count, 0);
            }
            if !e.event_type.tracks_completion() {
                assert_eq!(e.completion_pct, 0);
            }

            let expected = e.event_type == EventType::Complete || e.completion_pct >= 95;
            assert_eq!(e.completed_flag == 1, expected);
            assert!(e.live_game_flag <= 1 && e.major_tournament_flag <= 1);
        }
    }

    #[test]
    fn test_event_ids_are_global_and_ordered() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let sessions = sessions(30, &mut rng);
        let content_ids: Vec<i64> = (1..=10).collect();

        let events = event_gen.generate_for_sessions(
            &sessions,
            &content_ids,
            5,
            &mut IdSequence::default(),
            &mut rng,
        );

        let ids: Vec<i64> = events.iter().map(|e| e.event_id).collect();
        assert_eq!(ids, (1..=events.len() as i64).collect::<Vec<_>>());

        // Events are grouped by session in session order
        let session_order: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        let mut last_pos = 0;
        for e in &events {
            let pos = session_order
                .iter()
                .position(|s| *s == e.session_id)
                .unwrap();
            assert!(pos >= last_pos);
            last_pos = pos;
        }
    }

    #[test]
    fn test_events_follow_session_start() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let sessions = sessions(50, &mut rng);
        let content_ids: Vec<i64> = (1..=8).collect();

        for session in &sessions {
            let events = event_gen.generate_for_session(
                session,
                &content_ids,
                20,
                &mut IdSequence::default(),
                &mut rng,
            );

            let touched: HashSet<i64> = events.iter().map(|e| e.content_id).collect();
            assert!((1..=4).contains(&touched.len()));
            for &content_id in &touched {
                let per_content = events.iter().filter(|e| e.content_id == content_id).count();
                assert!((2..=20).contains(&per_content));
            }

            for e in &events {
                assert_eq!(e.user_id, session.user_id);
                assert_eq!(e.session_id, session.session_id);
                assert!(e.event_ts >= session.session_start_ts);
                assert!(e.event_ts <= session.session_start_ts + Duration::seconds(1800));
            }
        }
    }

    #[test]
    fn test_touched_content_capped_by_catalog() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let sessions = sessions(40, &mut rng);

        for session in &sessions {
            let events = event_gen.generate_for_session(
                session,
                &[7],
                3,
                &mut IdSequence::default(),
                &mut rng,
            );
            assert!(events.iter().all(|e| e.content_id == 7));
            assert!((2..=3).contains(&events.len()));
        }
    }

    #[test]
    fn test_type_distribution_roughly_matches_weights() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let session = sessions(1, &mut rng).remove(0);

        let mut counts: HashMap<EventType, usize> = HashMap::new();
        for event_id in 1..=10_000 {
            let event = event_gen.generate_event(event_id, &session, 1, &mut rng);
            *counts.entry(event.event_type).or_default() += 1;
        }

        let share = |t: EventType| counts.get(&t).copied().unwrap_or(0) as f64 / 10_000.0;
        assert!((share(EventType::Open) - 0.10).abs() < 0.03);
        assert!((share(EventType::Scroll) - 0.55).abs() < 0.03);
        assert!((share(EventType::Watch) - 0.30).abs() < 0.03);
        assert!((share(EventType::Complete) - 0.05).abs() < 0.03);
    }

    #[test]
    fn test_flag_rates_match_probabilities() {
        let event_gen = EventGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        let session = sessions(1, &mut rng).remove(0);

        let events: Vec<GeneratedEvent> = (1..=10_000)
            .map(|event_id| event_gen.generate_event(event_id, &session, 1, &mut rng))
            .collect();

        let mean = |flag: fn(&GeneratedEvent) -> u8| {
            events.iter().map(|e| f64::from(flag(e))).sum::<f64>() / events.len() as f64
        };
        let live_game = mean(|e| e.live_game_flag);
        let major_tournament = mean(|e| e.major_tournament_flag);

        assert!((live_game - 0.15).abs() < 0.02, "live game rate {live_game}");
        assert!(
            (major_tournament - 0.10).abs() < 0.02,
            "major tournament rate {major_tournament}"
        );
    }

    #[test]
    fn test_window_near_max_date_rejected() {
        let event_gen = EventGenerator::new().unwrap();
        let end = time::Date::MAX.midnight().assume_utc() + Duration::hours(23);
        let window = SimulationWindow::new(end - Duration::days(21), end);

        assert!(matches!(
            event_gen.validate_window(&window),
            Err(GenerationError::Configuration(_))
        ));
        assert!(event_gen.validate_window(&SimulationWindow::default()).is_ok());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let config = EventGenConfig {
            live_game_probability: 1.5,
            ..Default::default()
        };
        assert!(EventGenerator::with_config(config).is_err());

        let config = EventGenConfig {
            touched_content: (0, 4),
            ..Default::default()
        };
        assert!(EventGenerator::with_config(config).is_err());
    }
}
