use crate::constants::COUNTDOWN_SEC;
use crate::error::ConfigurationError;
use crate::level::LevelLayout;
use crate::types::{
    CampaignSummary, Direction, EnginePhase, EngineSnapshot, SessionEvent, TimelineEvent,
};

mod scoring;
mod session;

pub use self::scoring::Scoreboard;
pub use self::session::{Session, SessionOptions};

const TIMELINE_WINDOW: usize = 24;

/// Multi-level campaign: a countdown before every round, pause/resume, and
/// score and lives carried from one level to the next.
#[derive(Clone, Debug)]
pub struct GameEngine {
    levels: Vec<LevelLayout>,
    level_index: usize,
    options: SessionOptions,
    session: Session,
    phase: EnginePhase,
    events: Vec<SessionEvent>,
    timeline: Vec<TimelineEvent>,
    tick_counter: u64,
    elapsed_ms: u64,
    levels_cleared: usize,
}

impl GameEngine {
    pub fn new(
        levels: Vec<LevelLayout>,
        start_level: usize,
        options: SessionOptions,
    ) -> Result<Self, ConfigurationError> {
        if levels.is_empty() {
            return Err(ConfigurationError::EmptyLevelPack);
        }
        if start_level >= levels.len() {
            return Err(ConfigurationError::LevelIndexOutOfRange {
                index: start_level,
                count: levels.len(),
            });
        }
        let session = Session::new(
            &levels[start_level],
            &level_options(&options, start_level),
        );

        Ok(Self {
            levels,
            level_index: start_level,
            options,
            session,
            phase: EnginePhase::Countdown {
                remaining_sec: COUNTDOWN_SEC,
            },
            events: Vec::new(),
            timeline: vec![TimelineEvent {
                at_ms: 0,
                label: format!("level {} start", start_level + 1),
            }],
            tick_counter: 0,
            elapsed_ms: 0,
            levels_cleared: 0,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == EnginePhase::Over
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn levels_cleared(&self) -> usize {
        self.levels_cleared
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    /// Steering input is accepted while playing and during the countdown.
    pub fn set_player_direction(&mut self, dir: Direction) -> bool {
        match self.phase {
            EnginePhase::Countdown { .. } | EnginePhase::Playing => {
                self.session.set_player_direction(dir);
                true
            }
            EnginePhase::Paused | EnginePhase::Over => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != EnginePhase::Playing {
            return false;
        }
        self.phase = EnginePhase::Paused;
        self.push_timeline("paused".to_string());
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != EnginePhase::Paused {
            return false;
        }
        self.phase = EnginePhase::Playing;
        self.push_timeline("resumed".to_string());
        true
    }

    pub fn step(&mut self, dt: f32) {
        if matches!(self.phase, EnginePhase::Paused | EnginePhase::Over) {
            return;
        }
        self.tick_counter += 1;
        self.elapsed_ms = self
            .elapsed_ms
            .saturating_add((dt.max(0.0) * 1000.0).round() as u64);

        match self.phase {
            EnginePhase::Countdown { remaining_sec } => {
                let remaining_sec = remaining_sec - dt;
                if remaining_sec > 0.0 {
                    self.phase = EnginePhase::Countdown { remaining_sec };
                } else {
                    self.phase = EnginePhase::Playing;
                    self.events.push(SessionEvent::RoundStarted);
                }
            }
            EnginePhase::Playing => {
                let events = self.session.tick(dt);
                for event in events {
                    let cleared = event == SessionEvent::LevelCleared;
                    self.apply_session_event(&event);
                    self.events.push(event);
                    if cleared {
                        self.advance_after_clear();
                    }
                }
            }
            EnginePhase::Paused | EnginePhase::Over => {}
        }
    }

    fn apply_session_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::PlayerCaught { ghost, lives_left } => {
                self.phase = EnginePhase::Countdown {
                    remaining_sec: COUNTDOWN_SEC,
                };
                self.push_timeline(format!(
                    "caught by ghost {ghost}, {lives_left} lives left"
                ));
            }
            SessionEvent::GameOver => {
                self.phase = EnginePhase::Over;
                self.push_timeline(format!("game over with score {}", self.session.score()));
            }
            SessionEvent::LevelCleared => {
                self.levels_cleared += 1;
                self.push_timeline(format!("level {} cleared", self.level_index + 1));
            }
            _ => {}
        }
    }

    fn advance_after_clear(&mut self) {
        let next = (self.level_index + 1) % self.levels.len();
        self.start_level(next, true);
    }

    /// Jumps to `index`. Score and lives carry over unless the game was
    /// already lost, in which case a fresh game starts on that level.
    pub fn load_level(&mut self, index: usize) -> Result<(), ConfigurationError> {
        if index >= self.levels.len() {
            return Err(ConfigurationError::LevelIndexOutOfRange {
                index,
                count: self.levels.len(),
            });
        }
        let carry = self.phase != EnginePhase::Over;
        self.start_level(index, carry);
        Ok(())
    }

    pub fn next_level(&mut self) {
        let next = (self.level_index + 1) % self.levels.len();
        self.start_level(next, self.phase != EnginePhase::Over);
    }

    pub fn previous_level(&mut self) {
        let count = self.levels.len();
        let previous = (self.level_index + count - 1) % count;
        self.start_level(previous, self.phase != EnginePhase::Over);
    }

    fn start_level(&mut self, index: usize, carry_scoreboard: bool) {
        let mut scoreboard = self.session.scoreboard().clone();
        scoreboard.settle();
        self.level_index = index;
        self.session = Session::new(&self.levels[index], &level_options(&self.options, index));
        if carry_scoreboard {
            self.session.replace_scoreboard(scoreboard);
        }
        self.phase = EnginePhase::Countdown {
            remaining_sec: COUNTDOWN_SEC,
        };
        self.events.push(SessionEvent::LevelStarted { level: index });
        self.push_timeline(format!("level {} start", index + 1));
    }

    fn push_timeline(&mut self, label: String) {
        self.timeline.push(TimelineEvent {
            at_ms: self.elapsed_ms,
            label,
        });
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> EngineSnapshot {
        let snapshot = EngineSnapshot {
            phase: self.phase,
            level: self.level_index,
            tick: self.tick_counter,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
            timeline: self
                .timeline
                .iter()
                .rev()
                .take(TIMELINE_WINDOW)
                .cloned()
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect(),
            session: self.session.snapshot(),
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> CampaignSummary {
        CampaignSummary {
            levels_cleared: self.levels_cleared,
            final_level: self.level_index,
            score: self.session.score(),
            lives: self.session.lives(),
            duration_ms: self.elapsed_ms,
            game_over: self.is_over(),
            timeline: self.timeline.clone(),
        }
    }
}

/// Each level gets its own generator stream derived from the campaign seed.
fn level_options(options: &SessionOptions, index: usize) -> SessionOptions {
    SessionOptions {
        seed: options
            .seed
            .wrapping_add((index as u32).wrapping_mul(0x9e37_79b9)),
        ..options.clone()
    }
}
