//! Bucket Boom - catch the falling bombs before they hit the floor
//!
//! Core modules:
//! - `sim`: Deterministic fixed-tick simulation (entities, spawning, collisions, game state)
//! - `renderer`: Sprite-handle rendering boundary and terminal renderer
//! - `audio`: Sound effect boundary with volume/mute and no-op fallback
//! - `platform`: Decoded input events and terminal input source
//! - `settings`: JSON configuration
//! - `highscores`: In-memory leaderboard for the current run

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, NullAudio, SoundEffect};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick (100 Hz)
    pub const TICK_MS: u64 = 10;

    /// Display dimensions in pixels
    pub const DISPLAY_WIDTH: i32 = 320;
    pub const DISPLAY_HEIGHT: i32 = 240;

    /// Sprite scale factor applied to every gameplay sprite
    pub const SPRITE_SCALE: i32 = 2;

    /// Bucket: a 12x12 tile per tier, stacked vertically
    pub const BUCKET_TILE: i32 = 12;
    pub const BUCKET_WIDTH: i32 = BUCKET_TILE * SPRITE_SCALE;
    pub const BUCKET_TOP_Y: i32 = 164;
    /// Catch rectangle starts this far below the bucket origin
    pub const BUCKET_RIM_OFFSET: i32 = 20;
    pub const BUCKET_STEP: i32 = BUCKET_TILE * SPRITE_SCALE;
    pub const BUCKET_START_X: i32 = DISPLAY_WIDTH / 2 - BUCKET_WIDTH / 2;
    pub const MAX_BUCKETS: u8 = 3;

    /// Bomber
    pub const BOMBER_START_X: i32 = 10;
    pub const BOMBER_START_Y: i32 = 4;
    pub const BOMBER_WIDTH: i32 = 16 * SPRITE_SCALE;
    pub const BOMBER_LEFT_WALL: i32 = 8;
    pub const BOMBER_RIGHT_WALL: i32 = DISPLAY_WIDTH - BOMBER_WIDTH;

    /// Bomb: 8x12 sprite
    pub const BOMB_WIDTH: i32 = 8 * SPRITE_SCALE;
    pub const BOMB_HEIGHT: i32 = 12 * SPRITE_SCALE;
    /// Bombs leave the bomber this far below its scaled origin
    pub const BOMB_SPAWN_OFFSET: i32 = 17;

    /// Explosion: 16x16 sprite
    pub const EXPLOSION_SIZE: i32 = 16 * SPRITE_SCALE;
    /// Top of the play field (below the top wall)
    pub const PLAYFIELD_TOP: i32 = 25 * SPRITE_SCALE;

    /// Scoring
    pub const WIN_SCORE: u64 = 100_000;
    pub const EXTRA_LIFE_INTERVAL: u64 = 1_000;
    pub const SURPRISED_SCORE: u64 = 10_000;

    /// Cosmetic sequence lengths (ticks)
    pub const SPLASH_TICKS: u8 = 30;
    pub const MISS_EXPLOSION_TICKS: u32 = 100;
    pub const GAME_OVER_EXPLOSION_TICKS: u32 = 200;
    pub const GAME_OVER_EXPLOSIONS: usize = 30;

    /// Two-player bomb drop rate limit (ticks)
    pub const P2_DROP_COOLDOWN: u32 = 50;

    pub const START_LEVEL: u32 = 1;
}
