//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bombs in spawn order)
//! - No rendering or platform dependencies beyond decoded input events

pub mod bomber;
pub mod collision;
pub mod difficulty;
pub mod levels;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, Rect, Resolution, resolve_bombs};
pub use difficulty::{DifficultyController, ExtraLifeSchedule};
pub use levels::{LEVEL_TABLE, LevelParams, MAX_LEVEL, level_params};
pub use spawner::{Spawner, spawn_bomb};
pub use state::{
    Bomb, Bomber, Bucket, Explosion, GameMode, GamePhase, GameState, Mood, RecoveryStage, Splash,
};
pub use tick::{TickInput, Transition, tick};
