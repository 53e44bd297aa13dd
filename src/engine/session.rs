//! One level in play: the board, the player and the ghosts advanced together
//! one fixed step at a time.

use crate::board::{Board, StaticOccupant};
use crate::collision::{entities_touch, probe_next_tile, resolve_wall_contact};
use crate::constants::{DEFAULT_LIVES, GHOST_SPEED, PLAYER_SPEED, WEAK_DURATION_SEC};
use crate::error::ConfigurationError;
use crate::ghost::Ghost;
use crate::level::LevelLayout;
use crate::movement::Entity;
use crate::rng::Rng;
use crate::types::{
    Direction, LifecycleState, ScoringMode, SessionEvent, SessionOutcome, SessionSnapshot,
    TilePos,
};

use super::scoring::Scoreboard;

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub seed: u32,
    pub scoring: ScoringMode,
    pub lives: u32,
    pub weak_duration: f32,
    pub player_speed: f32,
    pub ghost_speed: f32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            scoring: ScoringMode::Classic,
            lives: DEFAULT_LIVES,
            weak_duration: WEAK_DURATION_SEC,
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    player: Entity,
    ghosts: Vec<Ghost>,
    scoreboard: Scoreboard,
    rng: Rng,
    tick: u64,
    elapsed: f32,
    outcome: Option<SessionOutcome>,
}

impl Session {
    pub fn new(layout: &LevelLayout, options: &SessionOptions) -> Self {
        let mut rng = Rng::new(options.seed);
        let board = Board::from_layout(layout, options.scoring, &mut rng);
        let size = (layout.width(), layout.height());
        let player = Entity::new(
            layout.player_spawn(),
            Direction::Right,
            options.player_speed,
            size.0,
            size.1,
        );
        let ghosts = layout
            .ghost_spawns()
            .iter()
            .enumerate()
            .map(|(id, (variant, spawn))| {
                Ghost::new(
                    id,
                    *variant,
                    *spawn,
                    options.ghost_speed,
                    options.weak_duration,
                    size,
                )
            })
            .collect();

        Self {
            board,
            player,
            ghosts,
            scoreboard: Scoreboard::new(options.scoring, options.lives),
            rng,
            tick: 0,
            elapsed: 0.0,
            outcome: None,
        }
    }

    pub fn load<S: AsRef<str>>(
        rows: &[S],
        options: &SessionOptions,
    ) -> Result<Self, ConfigurationError> {
        let layout = LevelLayout::from_rows(rows)?;
        Ok(Self::new(&layout, options))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Used by the campaign to carry score and lives into the next level.
    pub fn replace_scoreboard(&mut self, scoreboard: Scoreboard) {
        self.scoreboard = scoreboard;
    }

    pub fn score(&self) -> i32 {
        self.scoreboard.score()
    }

    pub fn lives(&self) -> u32 {
        self.scoreboard.lives()
    }

    pub fn remaining_dot_count(&self) -> usize {
        self.board.remaining_dot_count()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn set_player_direction(&mut self, dir: Direction) {
        self.player.set_queued_direction(dir);
    }

    /// Advances the level by `dt` seconds: player first, then every ghost in
    /// list order. Once the level is cleared or lost this is a no-op.
    pub fn tick(&mut self, dt: f32) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.outcome.is_some() {
            return events;
        }
        self.tick += 1;
        self.elapsed += dt;

        if let Some(amount) = self.scoreboard.tick(dt) {
            events.push(SessionEvent::ChainCashed { amount });
        }

        self.player.advance(dt);
        if let Some(contact) = probe_next_tile(&self.player, &self.board) {
            match contact.occupant {
                StaticOccupant::Wall => resolve_wall_contact(&mut self.player),
                StaticOccupant::Dot { .. } => {
                    self.eat_dot(contact.tile, &mut events);
                    if self.board.remaining_dot_count() == 0 {
                        if let Some(amount) = self.scoreboard.settle() {
                            events.push(SessionEvent::ChainCashed { amount });
                        }
                        events.push(SessionEvent::LevelCleared);
                        self.outcome = Some(SessionOutcome::Cleared);
                        return events;
                    }
                }
                StaticOccupant::PowerUp => self.eat_power_up(contact.tile, &mut events),
            }
        }

        self.update_ghosts(dt, &mut events);
        events
    }

    fn eat_dot(&mut self, tile: TilePos, events: &mut Vec<SessionEvent>) {
        if let Some(StaticOccupant::Dot { value }) = self.board.remove_occupant(tile) {
            self.scoreboard.award_dot(value);
            events.push(SessionEvent::DotEaten {
                x: tile.x,
                y: tile.y,
                value,
            });
        }
    }

    fn eat_power_up(&mut self, tile: TilePos, events: &mut Vec<SessionEvent>) {
        if self.board.remove_occupant(tile).is_none() {
            return;
        }
        self.scoreboard.award_power_up();
        events.push(SessionEvent::PowerUpEaten {
            x: tile.x,
            y: tile.y,
        });
        for ghost in &mut self.ghosts {
            if let Some(transition) = ghost.make_weak() {
                if transition.from != transition.to {
                    events.push(SessionEvent::GhostStateChanged {
                        ghost: ghost.id(),
                        from: transition.from,
                        to: transition.to,
                    });
                }
            }
        }
    }

    fn update_ghosts(&mut self, dt: f32, events: &mut Vec<SessionEvent>) {
        let mut caught = false;
        for index in 0..self.ghosts.len() {
            let player_tile = self.player.tile();
            let ghost = &mut self.ghosts[index];
            if let Some(transition) = ghost.update(dt, &self.board, player_tile, &mut self.rng) {
                events.push(SessionEvent::GhostStateChanged {
                    ghost: ghost.id(),
                    from: transition.from,
                    to: transition.to,
                });
            }

            if !caught && entities_touch(ghost.body(), &self.player) {
                match ghost.lifecycle_state() {
                    LifecycleState::Strong => {
                        caught = true;
                        let id = ghost.id();
                        if self.catch_player(id, events) {
                            return;
                        }
                    }
                    LifecycleState::Weak => {
                        if ghost.make_eaten().is_some() {
                            let score = self.scoreboard.award_ghost();
                            events.push(SessionEvent::GhostEaten {
                                ghost: self.ghosts[index].id(),
                                score,
                            });
                        }
                    }
                    LifecycleState::Eaten => {}
                }
            }

            let player_tile = self.player.tile();
            let ghost = &mut self.ghosts[index];
            if let Some(contact) = probe_next_tile(ghost.body(), &self.board) {
                if contact.occupant == StaticOccupant::Wall {
                    ghost.on_wall_contact(&self.board, player_tile, &mut self.rng);
                }
            }
        }
    }

    /// Costs a life and puts everyone back on their spawn tiles. Returns true
    /// when that was the last life.
    fn catch_player(&mut self, ghost: usize, events: &mut Vec<SessionEvent>) -> bool {
        let lives_left = self.scoreboard.lose_life();
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        events.push(SessionEvent::PlayerCaught { ghost, lives_left });
        if lives_left == 0 {
            events.push(SessionEvent::GameOver);
            self.outcome = Some(SessionOutcome::GameOver);
            return true;
        }
        false
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick,
            elapsed_sec: self.elapsed,
            score: self.scoreboard.score(),
            lives: self.scoreboard.lives(),
            chain: self.scoreboard.chain(),
            remaining_dots: self.board.remaining_dot_count(),
            outcome: self.outcome,
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(Ghost::view).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TICK_SEC;
    use crate::level::builtin_levels;

    fn session(rows: &[&str]) -> Session {
        Session::load(rows, &SessionOptions::default()).expect("valid level")
    }

    #[test]
    fn single_adjacent_dot_clears_the_level_in_one_tick() {
        let mut session = session(&["#####", "#p.##", "#   #", "#   #", "#####"]);
        assert_eq!(session.remaining_dot_count(), 1);

        let events = session.tick(TICK_SEC);
        assert_eq!(
            events,
            vec![
                SessionEvent::DotEaten {
                    x: 2,
                    y: 1,
                    value: 10
                },
                SessionEvent::LevelCleared,
            ]
        );
        assert_eq!(session.remaining_dot_count(), 0);
        assert_eq!(session.outcome(), Some(SessionOutcome::Cleared));
        assert_eq!(session.score(), 10);
        assert!(session.tick(TICK_SEC).is_empty());
    }

    #[test]
    fn strong_ghost_contact_costs_a_life() {
        let mut session = session(&["######", "#pg..#", "######"]);
        let events = session.tick(TICK_SEC);
        assert!(events.contains(&SessionEvent::PlayerCaught {
            ghost: 0,
            lives_left: 2
        }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, SessionEvent::GhostEaten { .. })));
        assert_eq!(session.lives(), 2);
        assert_eq!(session.player().position().x, 8.0);
        assert_eq!(session.ghosts()[0].position().x, 16.0);
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn weak_ghost_contact_eats_the_ghost() {
        let mut session = session(&["######", "#pg..#", "######"]);
        session.ghosts[0].make_weak();

        let events = session.tick(TICK_SEC);
        assert_eq!(
            events,
            vec![SessionEvent::GhostEaten {
                ghost: 0,
                score: 200
            }]
        );
        assert_eq!(session.ghosts()[0].lifecycle_state(), LifecycleState::Eaten);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.score(), 200);
    }

    #[test]
    fn power_up_weakens_every_strong_ghost() {
        let mut session = session(&["########", "#po...g#", "#.....r#", "########"]);
        let events = session.tick(TICK_SEC);
        assert_eq!(
            events,
            vec![
                SessionEvent::PowerUpEaten { x: 2, y: 1 },
                SessionEvent::GhostStateChanged {
                    ghost: 0,
                    from: LifecycleState::Strong,
                    to: LifecycleState::Weak
                },
                SessionEvent::GhostStateChanged {
                    ghost: 1,
                    from: LifecycleState::Strong,
                    to: LifecycleState::Weak
                },
            ]
        );
        assert_eq!(session.score(), 50);
        assert!(session
            .ghosts()
            .iter()
            .all(|ghost| ghost.lifecycle_state() == LifecycleState::Weak));
    }

    #[test]
    fn losing_the_last_life_ends_the_session() {
        let options = SessionOptions {
            lives: 1,
            ..SessionOptions::default()
        };
        let mut session = Session::load(&["######", "#pg..#", "######"], &options)
            .expect("valid level");
        let events = session.tick(TICK_SEC);
        assert_eq!(
            events,
            vec![
                SessionEvent::PlayerCaught {
                    ghost: 0,
                    lives_left: 0
                },
                SessionEvent::GameOver,
            ]
        );
        assert_eq!(session.outcome(), Some(SessionOutcome::GameOver));
        assert!(session.tick(TICK_SEC).is_empty());
        assert_eq!(session.tick_count(), 1);
    }

    #[test]
    fn player_is_stopped_by_walls() {
        let mut session = session(&["#####", "#p#.#", "#####"]);
        for _ in 0..30 {
            session.tick(TICK_SEC);
        }
        assert_eq!(session.player().position().x, 8.0);
        assert_eq!(session.remaining_dot_count(), 1);
    }

    #[test]
    fn chain_scoring_banks_on_clear() {
        let options = SessionOptions {
            scoring: ScoringMode::Chain,
            seed: 11,
            ..SessionOptions::default()
        };
        let mut session = Session::load(&["#####", "#p.##", "#####"], &options)
            .expect("valid level");
        let value = match session.board().occupant_at(TilePos::new(2, 1)) {
            Some(StaticOccupant::Dot { value }) => value,
            other => panic!("expected a dot, found {other:?}"),
        };
        let events = session.tick(TICK_SEC);
        assert_eq!(events.last(), Some(&SessionEvent::LevelCleared));
        assert_eq!(session.score(), value);
        assert_eq!(
            events.contains(&SessionEvent::ChainCashed { amount: 1 }),
            value == 1
        );
    }

    #[test]
    fn same_seed_replays_identically() {
        let layout = builtin_levels().remove(0);
        let options = SessionOptions {
            seed: 42,
            scoring: ScoringMode::Chain,
            ..SessionOptions::default()
        };
        let mut a = Session::new(&layout, &options);
        let mut b = Session::new(&layout, &options);
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for tick in 0..900 {
            if tick % 45 == 0 {
                let dir = turns[(tick / 45) % turns.len()];
                a.set_player_direction(dir);
                b.set_player_direction(dir);
            }
            assert_eq!(a.tick(TICK_SEC), b.tick(TICK_SEC));
        }
        let left = serde_json::to_string(&a.snapshot()).expect("snapshot serializes");
        let right = serde_json::to_string(&b.snapshot()).expect("snapshot serializes");
        assert_eq!(left, right);
    }
}
