//! Level selection and difficulty bookkeeping
//!
//! Derives the live per-level values (including the randomized intervals)
//! from the level table, and owns level-up, miss rollback and the extra-life
//! schedule.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::levels::{LevelParams, clamp_level, level_params};
use crate::consts::EXTRA_LIFE_INTERVAL;

/// Rolled-back levels never get fewer bombs than this
pub const MIN_ROLLBACK_BOMBS: u32 = 5;

/// Live difficulty for the level being played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyController {
    /// Current level (>= 1, uncapped; parameters clamp to the table)
    pub current_level: u32,
    /// Table entry the live values were derived from
    pub table: LevelParams,
    pub bomber_speed: u32,
    pub bomb_count: u32,
    pub bomb_score: u32,
    pub drop_speed: i32,
    pub enemy_step: i32,
    /// Drawn from the table's direction-change range
    pub direction_change: u32,
    /// Drawn from the table's drop-interval range; re-rolled after every spawn
    pub drop_interval: u32,
    /// Bombs spawned so far this level
    pub bombs_dropped: u32,
}

impl DifficultyController {
    pub fn new<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let table = *level_params(level);
        let mut controller = Self {
            current_level: level.max(1),
            table,
            bomber_speed: 0,
            bomb_count: 0,
            bomb_score: 0,
            drop_speed: 0,
            enemy_step: 0,
            direction_change: 0,
            drop_interval: 0,
            bombs_dropped: 0,
        };
        controller.set_level_params(level, rng);
        controller
    }

    /// Load `level`, clamping its parameters to the table
    pub fn set_level_params<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) {
        self.current_level = level.max(1);
        self.table = *level_params(level);
        self.bomber_speed = self.table.bomber_speed;
        self.bomb_count = self.table.bomb_count;
        self.bomb_score = self.table.bomb_score;
        self.drop_speed = self.table.drop_speed;
        self.enemy_step = self.table.enemy_step;
        self.direction_change = self.table.draw_direction_change(rng);
        self.drop_interval = self.table.draw_drop_interval(rng);
        self.bombs_dropped = 0;

        log::info!(
            "Level {} (table {}): {} bombs, {} pts, drop interval {}",
            self.current_level,
            clamp_level(level),
            self.bomb_count,
            self.bomb_score,
            self.drop_interval
        );
    }

    /// Advance to the next level
    pub fn level_up<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let next = self.current_level + 1;
        self.set_level_params(next, rng);
    }

    /// Drop one level after a miss and shrink the bomb budget
    ///
    /// The rolled-back level gets half of the failed level's bomb count,
    /// never fewer than [`MIN_ROLLBACK_BOMBS`].
    pub fn roll_back_after_miss<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let previous_bomb_count = self.bomb_count;
        let level = self.current_level.saturating_sub(1).max(1);
        self.set_level_params(level, rng);
        self.bomb_count = (previous_bomb_count / 2).max(MIN_ROLLBACK_BOMBS);
    }

    pub fn reroll_drop_interval<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.drop_interval = self.table.draw_drop_interval(rng);
    }

    /// Every bomb for this level has been spawned
    pub fn all_dropped(&self) -> bool {
        self.bombs_dropped >= self.bomb_count
    }
}

/// Score thresholds at which a bonus bucket is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLifeSchedule {
    pub next_threshold: u64,
}

impl Default for ExtraLifeSchedule {
    fn default() -> Self {
        Self {
            next_threshold: EXTRA_LIFE_INTERVAL,
        }
    }
}

impl ExtraLifeSchedule {
    /// Returns true (and moves the threshold forward) if `score` reached it
    ///
    /// The threshold advances even when the bucket stack is already full, so
    /// a full stack forfeits that bonus.
    pub fn check(&mut self, score: u64) -> bool {
        if score < self.next_threshold {
            return false;
        }
        self.next_threshold += EXTRA_LIFE_INTERVAL;
        true
    }
}
