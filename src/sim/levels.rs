//! Per-level difficulty table
//!
//! Levels past the end of the table reuse the last entry, so difficulty
//! stops scaling at level 8.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Static difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Ticks between bomber steps
    pub bomber_speed: u32,
    /// Total bombs dropped this level
    pub bomb_count: u32,
    /// Points per catch
    pub bomb_score: u32,
    /// Direction-change interval range (ticks)
    pub direction_change_lower: u32,
    pub direction_change_upper: u32,
    /// Bomb drop interval range (ticks)
    pub drop_interval_lower: u32,
    pub drop_interval_upper: u32,
    /// Bomb descent (pixels per tick)
    pub drop_speed: i32,
    /// Pixels per bomber step
    pub enemy_step: i32,
}

impl LevelParams {
    /// Draw a direction-change interval from this level's range
    pub fn draw_direction_change<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        draw_in_range(rng, self.direction_change_lower, self.direction_change_upper)
    }

    /// Draw a drop interval from this level's range
    pub fn draw_drop_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        draw_in_range(rng, self.drop_interval_lower, self.drop_interval_upper)
    }
}

/// Uniform draw from `[lower, upper]`; degenerate or inverted ranges yield `lower`
pub fn draw_in_range<R: Rng + ?Sized>(rng: &mut R, lower: u32, upper: u32) -> u32 {
    if lower >= upper {
        return lower;
    }
    rng.random_range(lower..=upper)
}

pub const MAX_LEVEL: u32 = LEVEL_TABLE.len() as u32;

pub const LEVEL_TABLE: [LevelParams; 8] = [
    LevelParams {
        bomber_speed: 1,
        bomb_count: 10,
        bomb_score: 1,
        direction_change_lower: 80,
        direction_change_upper: 150,
        drop_interval_lower: 12,
        drop_interval_upper: 22,
        drop_speed: 4,
        enemy_step: 4,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 15,
        bomb_score: 2,
        direction_change_lower: 70,
        direction_change_upper: 140,
        drop_interval_lower: 10,
        drop_interval_upper: 20,
        drop_speed: 5,
        enemy_step: 4,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 20,
        bomb_score: 3,
        direction_change_lower: 60,
        direction_change_upper: 120,
        drop_interval_lower: 8,
        drop_interval_upper: 18,
        drop_speed: 5,
        enemy_step: 5,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 25,
        bomb_score: 4,
        direction_change_lower: 50,
        direction_change_upper: 100,
        drop_interval_lower: 7,
        drop_interval_upper: 16,
        drop_speed: 6,
        enemy_step: 5,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 30,
        bomb_score: 5,
        direction_change_lower: 40,
        direction_change_upper: 80,
        drop_interval_lower: 6,
        drop_interval_upper: 13,
        drop_speed: 7,
        enemy_step: 6,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 40,
        bomb_score: 6,
        direction_change_lower: 30,
        direction_change_upper: 70,
        drop_interval_lower: 5,
        drop_interval_upper: 10,
        drop_speed: 9,
        enemy_step: 6,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 50,
        bomb_score: 7,
        direction_change_lower: 25,
        direction_change_upper: 60,
        drop_interval_lower: 4,
        drop_interval_upper: 8,
        drop_speed: 11,
        enemy_step: 7,
    },
    LevelParams {
        bomber_speed: 1,
        bomb_count: 60,
        bomb_score: 8,
        direction_change_lower: 20,
        direction_change_upper: 50,
        drop_interval_lower: 3,
        drop_interval_upper: 6,
        drop_speed: 13,
        enemy_step: 8,
    },
];

/// Clamp a level number into the table (`0` is treated as level 1)
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_LEVEL)
}

/// Look up parameters for a level
pub fn level_params(level: u32) -> &'static LevelParams {
    &LEVEL_TABLE[(clamp_level(level) - 1) as usize]
}
