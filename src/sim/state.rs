//! Game state and core simulation types
//!
//! Everything the state machine mutates lives in [`GameState`]; nothing is
//! held in process-wide globals.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::{DifficultyController, ExtraLifeSchedule};
use super::levels::clamp_level;
use super::spawner::Spawner;
use crate::consts::*;
use crate::highscores::HighScores;

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for mode selection
    Title,
    /// Level loaded, waiting for the player(s) to confirm
    Ready,
    /// Active gameplay
    Playing,
    /// Miss recovery (explosions, life deduction, level rollback)
    Paused,
    /// Run ended (win or loss), waiting for restart
    GameOver,
}

/// Sub-stage of miss recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStage {
    /// Explosions on screen; life not yet deducted
    Exploding { ticks_left: u32 },
    /// Life deducted and level rolled back; waiting for confirm
    AwaitingConfirm,
}

/// Who drives the bomber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Bomber oscillates on its own
    #[default]
    OnePlayer,
    /// Bomber is steered by a second player
    TwoPlayer,
}

/// Bomber expression (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Sad,
    Happy,
    Surprised,
}

/// The player's bucket stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Top-left origin in pixels (y is fixed)
    pub pos: IVec2,
    /// Remaining buckets (0..=MAX_BUCKETS); also the visual tier
    pub tier: u8,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            pos: IVec2::new(BUCKET_START_X, BUCKET_TOP_Y),
            tier: MAX_BUCKETS,
        }
    }
}

impl Bucket {
    /// Catch rectangle; grows downward with the tier
    pub fn rect(&self) -> Rect {
        Rect {
            left: self.pos.x,
            top: self.pos.y + BUCKET_RIM_OFFSET,
            right: self.pos.x + BUCKET_WIDTH,
            bottom: self.pos.y + BUCKET_TILE * SPRITE_SCALE * self.tier as i32,
        }
    }

    /// Move one step; `direction` is -1 (left) or +1 (right)
    pub fn step(&mut self, direction: i32) {
        let x = self.pos.x + BUCKET_STEP * direction.signum();
        self.pos.x = x.clamp(0, DISPLAY_WIDTH - BUCKET_WIDTH);
    }

    /// Change the stack height; the bucket snaps back to the centre
    pub fn set_tier(&mut self, tier: u8) {
        debug_assert!(tier <= MAX_BUCKETS, "bucket tier {tier} out of range");
        self.tier = tier.min(MAX_BUCKETS);
        self.recenter();
    }

    fn recenter(&mut self) {
        self.pos.x = BUCKET_START_X;
    }
}

/// The bomb-dropping enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomber {
    pub pos: IVec2,
    /// -1 or +1
    pub direction: i32,
    pub mood: Mood,
    /// Ticks since the last step
    pub move_timer: u32,
    /// Ticks since the last direction change
    pub change_timer: u32,
    /// Current direction-change interval (ticks)
    pub direction_change: u32,
}

impl Default for Bomber {
    fn default() -> Self {
        Self {
            pos: IVec2::new(BOMBER_START_X, BOMBER_START_Y),
            direction: 1,
            mood: Mood::Sad,
            move_timer: 0,
            change_timer: 0,
            direction_change: 0,
        }
    }
}

impl Bomber {
    /// Back to the start position, sad, moving right
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Top-left corner in display pixels (y is stored unscaled)
    pub fn screen_pos(&self) -> IVec2 {
        IVec2::new(self.pos.x, self.pos.y * SPRITE_SCALE)
    }

    /// Where the next bomb appears
    pub fn drop_point(&self) -> IVec2 {
        self.screen_pos() + IVec2::new(0, BOMB_SPAWN_OFFSET)
    }
}

/// A falling bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub pos: IVec2,
    /// Pixels per tick, fixed at spawn
    pub speed: i32,
}

impl Bomb {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, IVec2::new(BOMB_WIDTH, BOMB_HEIGHT))
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    /// True once the bottom edge is past `floor`
    pub fn is_below(&self, floor: i32) -> bool {
        self.rect().bottom > floor
    }
}

/// Cosmetic explosion marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: IVec2,
}

/// Catch feedback animation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Splash {
    pub active: bool,
    pub count: u8,
}

impl Splash {
    /// Start the animation; a running splash keeps its progress
    pub fn trigger(&mut self) {
        self.active = true;
    }

    pub fn advance(&mut self) {
        if !self.active {
            self.count = 0;
            return;
        }
        if self.count < SPLASH_TICKS {
            self.count += 1;
        } else {
            self.count = 0;
            self.active = false;
        }
    }

    /// Visual phase 0..=2 while active
    pub fn phase(&self) -> Option<u8> {
        if !self.active || self.count == 0 {
            return None;
        }
        Some(((self.count - 1) / 10).min(2))
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub mode: GameMode,
    /// Mode used when TITLE is left with a plain confirm
    pub default_mode: GameMode,
    pub recovery: RecoveryStage,
    /// Level each new game starts at
    pub start_level: u32,
    pub score: u64,
    /// Best score this run (survives resets)
    pub high_score: u64,
    /// Last game over set a new high score
    pub new_high_score: bool,
    /// Leaderboard place of the last finished game
    pub last_rank: Option<usize>,
    pub win: bool,
    pub bucket: Bucket,
    pub bomber: Bomber,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub splash: Splash,
    pub level: DifficultyController,
    pub spawner: Spawner,
    pub extra_life: ExtraLifeSchedule,
    /// One-shot latch for the surprised bomber
    pub surprised_triggered: bool,
    /// Fuse colour phase (0..3), advanced every playing tick
    pub flicker: u8,
    pub p1_ready: bool,
    pub p2_ready: bool,
    /// Player-two drop rate limiter (ticks)
    pub p2_drop_cooldown: u32,
    /// Remaining game-over explosion ticks
    pub game_over_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub leaderboard: HighScores,
    next_id: u32,
}

impl GameState {
    /// Create a new game state on the title screen
    pub fn new(seed: u64, start_level: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let start_level = clamp_level(start_level);
        let level = DifficultyController::new(start_level, &mut rng);
        let mut state = Self {
            seed,
            rng,
            phase: GamePhase::Title,
            mode: GameMode::OnePlayer,
            default_mode: GameMode::OnePlayer,
            recovery: RecoveryStage::AwaitingConfirm,
            start_level,
            score: 0,
            high_score: 0,
            new_high_score: false,
            last_rank: None,
            win: false,
            bucket: Bucket::default(),
            bomber: Bomber::default(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            splash: Splash::default(),
            level,
            spawner: Spawner::default(),
            extra_life: ExtraLifeSchedule::default(),
            surprised_triggered: false,
            flicker: 0,
            p1_ready: false,
            p2_ready: false,
            p2_drop_cooldown: 0,
            game_over_ticks: 0,
            time_ticks: 0,
            leaderboard: HighScores::new(),
            next_id: 1,
        };
        state.reset_game();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset the session for a new game (high score survives)
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.win = false;
        self.last_rank = None;
        self.level.set_level_params(self.start_level, &mut self.rng);
        self.bucket = Bucket::default();
        self.bomber.reset();
        self.bomber.direction_change = self.level.direction_change;
        self.bombs.clear();
        self.explosions.clear();
        self.splash = Splash::default();
        self.spawner.reset();
        self.extra_life = ExtraLifeSchedule::default();
        self.surprised_triggered = false;
        self.flicker = 0;
        self.p1_ready = false;
        self.p2_ready = false;
        self.p2_drop_cooldown = 0;
        self.game_over_ticks = 0;
        self.recovery = RecoveryStage::AwaitingConfirm;
    }

    /// No bombs left to drop, none falling, splash finished
    pub fn level_complete(&self) -> bool {
        self.level.all_dropped() && self.bombs.is_empty() && !self.splash.active
    }

    /// Turn every falling bomb into an explosion
    pub fn explode_bombs(&mut self) {
        let explosions = self.bombs.drain(..).map(|b| Explosion { pos: b.pos });
        self.explosions.extend(explosions);
    }

    /// Scatter explosions across the play field
    pub fn scatter_explosions(&mut self, count: usize) {
        for _ in 0..count {
            let x = self.rng.random_range(0..=DISPLAY_WIDTH - EXPLOSION_SIZE);
            let y = self.rng.random_range(PLAYFIELD_TOP..=DISPLAY_HEIGHT - EXPLOSION_SIZE);
            self.explosions.push(Explosion {
                pos: IVec2::new(x, y),
            });
        }
    }

    /// Bomber expression outside of a miss
    pub fn resting_mood(&self) -> Mood {
        if self.surprised_triggered {
            Mood::Surprised
        } else {
            Mood::Sad
        }
    }
}
