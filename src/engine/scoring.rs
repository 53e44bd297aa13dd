use crate::constants::{
    chain_ghost_score, chain_mask, CHAIN_WINDOW_SEC, GHOST_EATEN_SCORE, POWER_UP_SCORE,
};
use crate::types::ScoringMode;

/// Score, lives and the chain register. Carried across levels by the
/// campaign engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Scoreboard {
    mode: ScoringMode,
    score: i32,
    lives: u32,
    chain: i32,
    chain_window: Option<f32>,
}

impl Scoreboard {
    pub fn new(mode: ScoringMode, lives: u32) -> Self {
        Self {
            mode,
            score: 0,
            lives,
            chain: 0,
            chain_window: None,
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn chain(&self) -> i32 {
        self.chain
    }

    /// Classic dots score directly. Chain dots shift their bit into the
    /// register and restart the cash-out window.
    pub fn award_dot(&mut self, value: i32) {
        match self.mode {
            ScoringMode::Classic => self.score += value,
            ScoringMode::Chain => {
                self.chain = ((self.chain << 1) + value) & chain_mask();
                self.chain_window = Some(CHAIN_WINDOW_SEC);
            }
        }
    }

    pub fn award_power_up(&mut self) -> i32 {
        self.score += POWER_UP_SCORE;
        POWER_UP_SCORE
    }

    pub fn award_ghost(&mut self) -> i32 {
        let points = match self.mode {
            ScoringMode::Classic => GHOST_EATEN_SCORE,
            ScoringMode::Chain => chain_ghost_score(),
        };
        self.score += points;
        points
    }

    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Counts the chain window down and banks the chain once it lapses.
    /// Returns the banked amount when it is non-zero.
    pub fn tick(&mut self, dt: f32) -> Option<i32> {
        let remaining = self.chain_window? - dt;
        if remaining >= 0.0 {
            self.chain_window = Some(remaining);
            return None;
        }
        self.settle()
    }

    /// Banks whatever the chain holds right now.
    pub fn settle(&mut self) -> Option<i32> {
        self.chain_window = None;
        let amount = std::mem::take(&mut self.chain);
        self.score += amount;
        (amount > 0).then_some(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LIVES;

    #[test]
    fn classic_scoring_adds_fixed_values() {
        let mut board = Scoreboard::new(ScoringMode::Classic, DEFAULT_LIVES);
        board.award_dot(10);
        board.award_dot(10);
        assert_eq!(board.award_power_up(), 50);
        assert_eq!(board.award_ghost(), 200);
        assert_eq!(board.score(), 270);
        assert_eq!(board.tick(5.0), None);
        assert_eq!(board.score(), 270);
    }

    #[test]
    fn chain_banks_after_window_lapses() {
        let mut board = Scoreboard::new(ScoringMode::Chain, DEFAULT_LIVES);
        board.award_dot(1);
        board.award_dot(0);
        board.award_dot(1);
        assert_eq!(board.chain(), 0b101);
        assert_eq!(board.score(), 0);

        assert_eq!(board.tick(0.6), None);
        board.award_dot(1);
        assert_eq!(board.tick(0.6), None);
        assert_eq!(board.tick(0.6), Some(0b1011));
        assert_eq!(board.score(), 11);
        assert_eq!(board.chain(), 0);
        assert_eq!(board.tick(2.0), None);
    }

    #[test]
    fn chain_register_keeps_only_the_last_eight_bits() {
        let mut board = Scoreboard::new(ScoringMode::Chain, DEFAULT_LIVES);
        for _ in 0..12 {
            board.award_dot(1);
        }
        assert_eq!(board.chain(), 255);
        assert_eq!(board.award_ghost(), 128);
    }

    #[test]
    fn empty_chain_is_banked_silently() {
        let mut board = Scoreboard::new(ScoringMode::Chain, DEFAULT_LIVES);
        board.award_dot(0);
        assert_eq!(board.tick(1.5), None);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn lives_never_underflow() {
        let mut board = Scoreboard::new(ScoringMode::Classic, 1);
        assert_eq!(board.lose_life(), 0);
        assert_eq!(board.lose_life(), 0);
    }
}
