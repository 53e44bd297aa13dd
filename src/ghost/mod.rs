//! Ghost entities: a moving body steered by a per-variant strategy and
//! overlaid with the STRONG/WEAK/EATEN lifecycle.

use crate::board::Board;
use crate::collision::resolve_wall_contact;
use crate::movement::Entity;
use crate::pathfinding::next_step_toward;
use crate::rng::Rng;
use crate::types::{Direction, GhostVariant, GhostView, LifecycleState, Position, TilePos};

mod lifecycle;
mod strategy;

pub use self::lifecycle::{Lifecycle, Transition};
pub use self::strategy::{dominant_axis, minor_axis, wall_bounce, Alternation, Behaviour, Strategy};

#[derive(Clone, Debug)]
pub struct Ghost {
    id: usize,
    variant: GhostVariant,
    strategy: Strategy,
    body: Entity,
    lifecycle: Lifecycle,
}

impl Ghost {
    pub fn new(
        id: usize,
        variant: GhostVariant,
        spawn: TilePos,
        speed: f32,
        weak_duration: f32,
        level_size: (i32, i32),
    ) -> Self {
        Self {
            id,
            variant,
            strategy: Strategy::for_variant(variant),
            body: Entity::new(
                spawn,
                variant.initial_direction(),
                speed,
                level_size.0,
                level_size.1,
            ),
            lifecycle: Lifecycle::new(weak_duration),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn variant(&self) -> GhostVariant {
        self.variant
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn position(&self) -> Position {
        self.body.position()
    }

    pub fn current_direction(&self) -> Direction {
        self.body.current_direction()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn lifecycle_remaining(&self) -> f32 {
        self.lifecycle.remaining()
    }

    pub fn make_weak(&mut self) -> Option<Transition> {
        let from = self.lifecycle.state();
        self.lifecycle.make_weak().then(|| Transition {
            from,
            to: self.lifecycle.state(),
        })
    }

    pub fn make_eaten(&mut self) -> Option<Transition> {
        let from = self.lifecycle.state();
        self.lifecycle.make_eaten().then(|| Transition {
            from,
            to: self.lifecycle.state(),
        })
    }

    /// Queues the next direction. EATEN ghosts head for their spawn tile;
    /// STRONG ghosts follow their strategy toward `player_tile`. A missing
    /// answer leaves the queued direction untouched.
    pub fn recalculate_route(&mut self, board: &Board, player_tile: TilePos, rng: &mut Rng) {
        let here = self.body.upcoming_tile();
        let next = match self.lifecycle.state() {
            LifecycleState::Weak => None,
            LifecycleState::Eaten => next_step_toward(board, here, self.body.spawn()),
            LifecycleState::Strong => self.strategy.route(
                board,
                here,
                player_tile,
                self.body.current_direction(),
                rng,
            ),
        };
        if let Some(dir) = next {
            self.body.set_queued_direction(dir);
        }
    }

    /// One simulation step. Returns the lifecycle transition if the timer ran
    /// out during this step; a recovering ghost does not move on that step.
    pub fn update(
        &mut self,
        dt: f32,
        board: &Board,
        player_tile: TilePos,
        rng: &mut Rng,
    ) -> Option<Transition> {
        if let Some(transition) = self.lifecycle.tick(dt) {
            return Some(transition);
        }
        match self.lifecycle.state() {
            LifecycleState::Strong => {
                self.strategy.advance(dt, rng);
                if self.strategy.steers_every_tick() {
                    self.recalculate_route(board, player_tile, rng);
                }
                self.body.advance(dt);
            }
            LifecycleState::Weak => {}
            LifecycleState::Eaten => {
                self.recalculate_route(board, player_tile, rng);
                self.body.advance_to(dt, self.body.spawn());
            }
        }
        None
    }

    pub fn on_wall_contact(&mut self, board: &Board, player_tile: TilePos, rng: &mut Rng) {
        resolve_wall_contact(&mut self.body);
        self.recalculate_route(board, player_tile, rng);
    }

    /// Back to spawn after a life loss. The lifecycle is left alone.
    pub fn reset(&mut self) {
        self.body.reset();
    }

    pub fn view(&self) -> GhostView {
        GhostView {
            id: self.id,
            variant: self.variant,
            state: self.lifecycle.state(),
            body: self.body.view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::StaticOccupant;
    use crate::collision::probe_next_tile;
    use crate::constants::{GHOST_SPEED, TICK_SEC, WEAK_DURATION_SEC};

    fn open_board(width: i32, height: i32) -> Board {
        Board::new(width, height)
    }

    fn ghost(variant: GhostVariant, spawn: TilePos, size: (i32, i32)) -> Ghost {
        Ghost::new(0, variant, spawn, GHOST_SPEED, WEAK_DURATION_SEC, size)
    }

    #[test]
    fn pursuing_ghost_closes_in_on_the_player() {
        let board = open_board(12, 12);
        let mut rng = Rng::new(4);
        let mut blue = ghost(GhostVariant::Blue, TilePos::new(1, 1), (12, 12));
        let player = TilePos::new(8, 1);
        for _ in 0..120 {
            blue.update(TICK_SEC, &board, player, &mut rng);
        }
        assert_eq!(blue.current_direction(), Direction::Right);
        assert!(blue.position().x > 8.0);
        assert_eq!(blue.position().y, 8.0);
    }

    #[test]
    fn weak_ghost_holds_position() {
        let board = open_board(8, 8);
        let mut rng = Rng::new(4);
        let mut red = ghost(GhostVariant::Red, TilePos::new(2, 2), (8, 8));
        assert!(red.make_weak().is_some());
        let before = red.position();
        for _ in 0..30 {
            red.update(TICK_SEC, &board, TilePos::new(6, 6), &mut rng);
        }
        assert_eq!(red.position(), before);
        assert_eq!(red.lifecycle_state(), LifecycleState::Weak);
    }

    #[test]
    fn eaten_ghost_returns_to_spawn_and_recovers() {
        let board = open_board(10, 5);
        let mut rng = Rng::new(4);
        let mut yellow = ghost(GhostVariant::Yellow, TilePos::new(1, 2), (10, 5));
        yellow.body.place_at(Position::new(48.0, 16.0));
        yellow.make_weak();
        let transition = yellow.make_eaten().expect("weak ghost can be eaten");
        assert_eq!(transition.to, LifecycleState::Eaten);

        let mut recovered = None;
        let ticks = (WEAK_DURATION_SEC / TICK_SEC) as usize + 5;
        for _ in 0..ticks {
            if let Some(t) = yellow.update(TICK_SEC, &board, TilePos::new(9, 4), &mut rng) {
                recovered = Some(t);
                break;
            }
        }
        assert_eq!(yellow.body().tile(), TilePos::new(1, 2));
        assert!(yellow.body().is_aligned());
        assert_eq!(
            recovered,
            Some(Transition {
                from: LifecycleState::Eaten,
                to: LifecycleState::Strong
            })
        );
    }

    #[test]
    fn make_eaten_is_ignored_unless_weak() {
        let mut green = ghost(GhostVariant::Green, TilePos::new(1, 1), (4, 4));
        assert_eq!(green.make_eaten(), None);
        assert_eq!(green.lifecycle_state(), LifecycleState::Strong);
        green.make_weak();
        green.make_eaten();
        assert_eq!(green.make_weak(), None);
        assert_eq!(green.lifecycle_state(), LifecycleState::Eaten);
    }

    #[test]
    fn reactive_ghost_turns_perpendicular_after_hitting_a_wall() {
        let mut board = open_board(6, 6);
        board.insert(TilePos::new(2, 4), StaticOccupant::Wall);
        let mut rng = Rng::new(8);
        let mut yellow = ghost(GhostVariant::Yellow, TilePos::new(2, 2), (6, 6));
        let player = TilePos::new(5, 5);

        let mut bounced = false;
        for _ in 0..60 {
            yellow.update(TICK_SEC, &board, player, &mut rng);
            if let Some(contact) = probe_next_tile(yellow.body(), &board) {
                if contact.occupant == StaticOccupant::Wall {
                    yellow.on_wall_contact(&board, player, &mut rng);
                    bounced = true;
                    break;
                }
            }
        }
        assert!(bounced);
        assert_eq!(yellow.position(), Position::new(16.0, 24.0));
        assert!(!yellow.body().queued_direction().is_vertical());
    }

    #[test]
    fn reset_keeps_lifecycle() {
        let board = open_board(8, 8);
        let mut rng = Rng::new(1);
        let mut blue = ghost(GhostVariant::Blue, TilePos::new(1, 1), (8, 8));
        for _ in 0..40 {
            blue.update(TICK_SEC, &board, TilePos::new(6, 6), &mut rng);
        }
        blue.make_weak();
        blue.reset();
        assert_eq!(blue.position(), Position::new(8.0, 8.0));
        assert_eq!(blue.current_direction(), Direction::Down);
        assert_eq!(blue.lifecycle_state(), LifecycleState::Weak);
        let view = blue.view();
        assert_eq!(view.variant, GhostVariant::Blue);
        assert_eq!(view.state, LifecycleState::Weak);
    }
}
