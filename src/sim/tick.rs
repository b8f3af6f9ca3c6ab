//! Fixed timestep simulation tick
//!
//! The game state machine. Each call to [`tick`] runs exactly one handler for
//! the current phase and commits at most one phase transition.

use std::ops::ControlFlow;

use super::collision::{Resolution, resolve_bombs};
use super::spawner::spawn_bomb;
use super::state::{Bomb, GameMode, GamePhase, GameState, Mood, RecoveryStage};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::platform::InputEvent;

/// Input events for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn pressed(&self, event: InputEvent) -> bool {
        self.events.contains(&event)
    }
}

/// A committed phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) -> Option<Transition> {
    state.time_ticks += 1;
    let from = state.phase;

    match state.phase {
        GamePhase::Title => tick_title(state, input, audio),
        GamePhase::Ready => tick_ready(state, input, audio),
        GamePhase::Playing => tick_playing(state, input, audio),
        GamePhase::Paused => tick_paused(state, input, audio),
        GamePhase::GameOver => tick_game_over(state, input),
    }

    if state.phase == from {
        return None;
    }
    log::info!(
        "{:?} -> {:?} (level {}, score {}, buckets {})",
        from,
        state.phase,
        state.level.current_level,
        state.score,
        state.bucket.tier
    );
    Some(Transition {
        from,
        to: state.phase,
    })
}

fn tick_title(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    let mode = if input.pressed(InputEvent::SelectOnePlayer) {
        GameMode::OnePlayer
    } else if input.pressed(InputEvent::SelectTwoPlayer) {
        GameMode::TwoPlayer
    } else if input.pressed(InputEvent::Confirm) {
        state.default_mode
    } else {
        return;
    };

    state.reset_game();
    state.mode = mode;
    audio.play(SoundEffect::Start);
    state.phase = GamePhase::Ready;
}

fn tick_ready(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    if input.pressed(InputEvent::Confirm) {
        state.p1_ready = true;
    }
    if state.mode == GameMode::TwoPlayer && input.pressed(InputEvent::Confirm2) {
        state.p2_ready = true;
    }

    let start = match state.mode {
        GameMode::OnePlayer => state.p1_ready,
        GameMode::TwoPlayer => state.p1_ready && state.p2_ready,
    };
    if start {
        state.p1_ready = false;
        state.p2_ready = false;
        audio.play(SoundEffect::Start);
        state.phase = GamePhase::Playing;
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    if state.level_complete() {
        audio.stop();
        audio.play(SoundEffect::LevelUp);
        state.bombs.clear();
        state.level.level_up(&mut state.rng);
        state.bomber.direction_change = state.level.direction_change;
        state.spawner.reset();
        state.phase = GamePhase::Ready;
        return;
    }

    apply_movement(state, input);

    state.flicker = (state.flicker + 1) % 3;
    match state.mode {
        GameMode::OnePlayer => {
            state.bomber.update_autonomous(&state.level, &mut state.rng);
            if state.spawner.update(&mut state.level, &mut state.rng) {
                release_bomb(state);
            }
        }
        GameMode::TwoPlayer => {
            state.p2_drop_cooldown = state.p2_drop_cooldown.saturating_sub(1);
        }
    }

    let bucket_rect = state.bucket.rect();
    let mut bombs = std::mem::take(&mut state.bombs);
    let report = resolve_bombs(&mut bombs, &bucket_rect, DISPLAY_HEIGHT, |bomb| {
        on_catch(state, bomb, audio)
    });
    // A halting catch ended the game; whatever is still falling goes away
    if report.resolution == Resolution::Halted {
        return;
    }
    state.bombs = bombs;

    if let Resolution::Miss { bomb_id } = report.resolution {
        log::info!("Bomb {} missed", bomb_id);
        audio.play(SoundEffect::Miss);
        enter_miss_recovery(state);
        return;
    }

    state.splash.advance();
}

fn apply_movement(state: &mut GameState, input: &TickInput) {
    for event in &input.events {
        match event {
            InputEvent::MoveLeft => state.bucket.step(-1),
            InputEvent::MoveRight => state.bucket.step(1),
            _ => {}
        }
    }
    if state.mode != GameMode::TwoPlayer {
        return;
    }
    for event in &input.events {
        match event {
            InputEvent::MoveLeft2 => state.bomber.step_manual(-1, state.level.enemy_step),
            InputEvent::MoveRight2 => state.bomber.step_manual(1, state.level.enemy_step),
            InputEvent::Drop2 if state.p2_drop_cooldown == 0 => {
                if release_bomb(state) {
                    state.p2_drop_cooldown = P2_DROP_COOLDOWN;
                }
            }
            _ => {}
        }
    }
}

/// Spawn a bomb at the bomber; false once the level's bombs are used up
fn release_bomb(state: &mut GameState) -> bool {
    let id = state.next_entity_id();
    match spawn_bomb(id, &state.bomber, &mut state.level) {
        Some(bomb) => {
            state.bombs.push(bomb);
            true
        }
        None => false,
    }
}

/// Score a caught bomb; `Break` when the catch wins the game
fn on_catch(state: &mut GameState, bomb: &Bomb, audio: &mut dyn AudioSink) -> ControlFlow<()> {
    let before = state.score;
    state.splash.trigger();
    state.score += state.level.bomb_score as u64;
    debug_assert!(state.score >= before);
    audio.play(SoundEffect::Catch);
    log::debug!("Caught bomb {} (score {})", bomb.id, state.score);

    if state.score >= WIN_SCORE {
        enter_game_over(state, true, audio);
        return ControlFlow::Break(());
    }

    if state.extra_life.check(state.score) && state.bucket.tier < MAX_BUCKETS {
        state.bucket.set_tier(state.bucket.tier + 1);
        log::info!("Bonus bucket at {} ({} buckets)", state.score, state.bucket.tier);
    }

    if !state.surprised_triggered && state.score >= SURPRISED_SCORE {
        state.surprised_triggered = true;
        state.bomber.mood = Mood::Surprised;
    }

    ControlFlow::Continue(())
}

fn enter_miss_recovery(state: &mut GameState) {
    state.explode_bombs();
    state.bomber.mood = Mood::Happy;
    state.recovery = RecoveryStage::Exploding {
        ticks_left: MISS_EXPLOSION_TICKS,
    };
    state.phase = GamePhase::Paused;
}

fn tick_paused(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    match state.recovery {
        RecoveryStage::Exploding { ticks_left } if ticks_left > 1 => {
            state.recovery = RecoveryStage::Exploding {
                ticks_left: ticks_left - 1,
            };
        }
        RecoveryStage::Exploding { .. } => finish_recovery(state, audio),
        RecoveryStage::AwaitingConfirm => {
            if input.pressed(InputEvent::Confirm) {
                audio.play(SoundEffect::Start);
                state.spawner.reset();
                state.p2_drop_cooldown = 0;
                state.phase = GamePhase::Playing;
            }
        }
    }
}

/// Deduct a bucket and roll the level back, or end the game
fn finish_recovery(state: &mut GameState, audio: &mut dyn AudioSink) {
    state.explosions.clear();
    let remaining = state.bucket.tier.saturating_sub(1);
    state.bucket.set_tier(remaining);
    if remaining == 0 {
        enter_game_over(state, false, audio);
        return;
    }

    state.level.roll_back_after_miss(&mut state.rng);
    state.bomber.direction_change = state.level.direction_change;
    state.bomber.mood = state.resting_mood();
    state.recovery = RecoveryStage::AwaitingConfirm;
}

fn enter_game_over(state: &mut GameState, win: bool, audio: &mut dyn AudioSink) {
    audio.stop();
    state.win = win;
    state.bombs.clear();
    state.phase = GamePhase::GameOver;

    if win {
        state.game_over_ticks = 0;
    } else {
        audio.play(SoundEffect::GameOver);
        state.scatter_explosions(GAME_OVER_EXPLOSIONS);
        state.game_over_ticks = GAME_OVER_EXPLOSION_TICKS;
    }

    state.new_high_score = state.score > state.high_score;
    if state.new_high_score {
        state.high_score = state.score;
        log::info!("New high score: {}", state.score);
    }
    let level = state.level.current_level;
    state.last_rank = state.leaderboard.add_score(state.score, level, state.time_ticks);
    log::info!(
        "Game over ({}): score {}, level {}, rank {:?}",
        if win { "win" } else { "loss" },
        state.score,
        level,
        state.last_rank
    );
}

fn tick_game_over(state: &mut GameState, input: &TickInput) {
    if state.game_over_ticks > 0 {
        state.game_over_ticks -= 1;
        if state.game_over_ticks == 0 {
            state.explosions.clear();
        }
    }

    if input.pressed(InputEvent::Restart) {
        state.reset_game();
        state.phase = GamePhase::Title;
    }
}
