//! Rendering boundary
//!
//! The game only talks to sprite handles: create one per visual, then move,
//! show, hide or relabel it. [`Scene`] owns the handles and mirrors a
//! [`GameState`] onto them once per tick.

pub mod terminal;

pub use terminal::TerminalRenderer;

use glam::IVec2;

use crate::consts::*;
use crate::sim::state::{GameMode, GamePhase, GameState, Mood, RecoveryStage};

/// Opaque reference to a sprite owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Bucket stack drawn with `tier` buckets
    Bucket { tier: u8 },
    Bomber(Mood),
    Bomb,
    Explosion,
    Splash,
    /// Free text
    Label,
}

impl SpriteKind {
    /// Size in pixels (labels have no fixed size)
    pub fn size(&self) -> IVec2 {
        match self {
            SpriteKind::Bucket { tier } => IVec2::new(BUCKET_WIDTH, BUCKET_TILE * SPRITE_SCALE * *tier as i32),
            SpriteKind::Bomber(_) => IVec2::new(BOMBER_WIDTH, 16 * SPRITE_SCALE),
            SpriteKind::Bomb => IVec2::new(BOMB_WIDTH, BOMB_HEIGHT),
            SpriteKind::Explosion => IVec2::splat(EXPLOSION_SIZE),
            SpriteKind::Splash => IVec2::new(BUCKET_WIDTH, 8 * SPRITE_SCALE),
            SpriteKind::Label => IVec2::ZERO,
        }
    }
}

/// Display collaborator
///
/// Implementations must tolerate every call even when the display is gone;
/// failures are theirs to log.
pub trait Renderer {
    fn create_sprite(&mut self, kind: SpriteKind) -> SpriteHandle;
    fn set_position(&mut self, handle: SpriteHandle, pos: IVec2);
    fn set_visibility(&mut self, handle: SpriteHandle, visible: bool);
    fn set_text(&mut self, handle: SpriteHandle, text: &str);
    /// Animation frame for sprites that cycle (bomb fuse, splash)
    fn set_frame(&mut self, _handle: SpriteHandle, _frame: u8) {}
    /// Present the current frame
    fn refresh(&mut self);
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer {
    next: u32,
}

impl Renderer for NullRenderer {
    fn create_sprite(&mut self, _kind: SpriteKind) -> SpriteHandle {
        self.next += 1;
        SpriteHandle(self.next)
    }
    fn set_position(&mut self, _handle: SpriteHandle, _pos: IVec2) {}
    fn set_visibility(&mut self, _handle: SpriteHandle, _visible: bool) {}
    fn set_text(&mut self, _handle: SpriteHandle, _text: &str) {}
    fn refresh(&mut self) {}
}

const HUD_POS: IVec2 = IVec2::new(0, 0);
const BANNER_POS: IVec2 = IVec2::new(48, 110);

/// Handles for every visual the game can show
pub struct Scene {
    /// One bucket sprite per tier (index = tier - 1)
    buckets: [SpriteHandle; MAX_BUCKETS as usize],
    /// One bomber sprite per mood
    bombers: [SpriteHandle; 3],
    bombs: Vec<SpriteHandle>,
    explosions: Vec<SpriteHandle>,
    splash: SpriteHandle,
    hud: SpriteHandle,
    banner: SpriteHandle,
}

impl Scene {
    pub fn new(renderer: &mut dyn Renderer) -> Self {
        let buckets = [1u8, 2, 3].map(|tier| renderer.create_sprite(SpriteKind::Bucket { tier }));
        let bombers = [Mood::Sad, Mood::Happy, Mood::Surprised].map(|m| renderer.create_sprite(SpriteKind::Bomber(m)));
        let splash = renderer.create_sprite(SpriteKind::Splash);
        let hud = renderer.create_sprite(SpriteKind::Label);
        let banner = renderer.create_sprite(SpriteKind::Label);
        renderer.set_position(hud, HUD_POS);
        renderer.set_position(banner, BANNER_POS);

        let scene = Self {
            buckets,
            bombers,
            bombs: Vec::new(),
            explosions: Vec::new(),
            splash,
            hud,
            banner,
        };
        for handle in scene.buckets.iter().chain(&scene.bombers).chain([&scene.splash]) {
            renderer.set_visibility(*handle, false);
        }
        scene
    }

    /// Mirror `state` onto the sprites
    pub fn sync(&mut self, state: &GameState, renderer: &mut dyn Renderer) {
        let in_game = state.phase != GamePhase::Title;

        // Bucket: only the sprite for the current tier is shown
        for (i, handle) in self.buckets.iter().enumerate() {
            let visible = in_game && state.bucket.tier as usize == i + 1;
            renderer.set_visibility(*handle, visible);
            if visible {
                renderer.set_position(*handle, state.bucket.pos);
            }
        }

        for (handle, mood) in self.bombers.iter().zip([Mood::Sad, Mood::Happy, Mood::Surprised]) {
            let visible = in_game && state.bomber.mood == mood;
            renderer.set_visibility(*handle, visible);
            if visible {
                renderer.set_position(*handle, state.bomber.screen_pos());
            }
        }

        let bombs: Vec<IVec2> = state.bombs.iter().map(|b| b.pos).collect();
        sync_pool(&mut self.bombs, SpriteKind::Bomb, &bombs, renderer);
        for handle in self.bombs.iter().take(bombs.len()) {
            renderer.set_frame(*handle, state.flicker);
        }

        let explosions: Vec<IVec2> = state.explosions.iter().map(|e| e.pos).collect();
        sync_pool(&mut self.explosions, SpriteKind::Explosion, &explosions, renderer);

        match state.splash.phase() {
            Some(frame) if in_game => {
                let pos = state.bucket.pos + IVec2::new(0, BUCKET_RIM_OFFSET - 8 * SPRITE_SCALE);
                renderer.set_position(self.splash, pos);
                renderer.set_frame(self.splash, frame);
                renderer.set_visibility(self.splash, true);
            }
            _ => renderer.set_visibility(self.splash, false),
        }

        renderer.set_text(self.hud, &hud_text(state));
        match banner_text(state) {
            Some(text) => {
                renderer.set_text(self.banner, &text);
                renderer.set_visibility(self.banner, true);
            }
            None => renderer.set_visibility(self.banner, false),
        }
    }
}

/// Show one pooled sprite per position, creating more as needed and hiding the rest
fn sync_pool(pool: &mut Vec<SpriteHandle>, kind: SpriteKind, positions: &[IVec2], renderer: &mut dyn Renderer) {
    while pool.len() < positions.len() {
        pool.push(renderer.create_sprite(kind));
    }
    for (i, handle) in pool.iter().enumerate() {
        match positions.get(i) {
            Some(pos) => {
                renderer.set_position(*handle, *pos);
                renderer.set_visibility(*handle, true);
            }
            None => renderer.set_visibility(*handle, false),
        }
    }
}

fn hud_text(state: &GameState) -> String {
    format!(
        "SCORE {:>6}  HI {:>6}  LEVEL {}",
        state.score, state.high_score, state.level.current_level
    )
}

fn banner_text(state: &GameState) -> Option<String> {
    let text = match state.phase {
        GamePhase::Title => match state.leaderboard.top_score() {
            Some(best) => format!("BUCKET BOOM  BEST {best}  [1] ONE PLAYER  [2] TWO PLAYERS"),
            None => "BUCKET BOOM  [1] ONE PLAYER  [2] TWO PLAYERS".to_string(),
        },
        GamePhase::Ready => match state.mode {
            GameMode::OnePlayer => format!("LEVEL {}  PRESS SPACE", state.level.current_level),
            GameMode::TwoPlayer => format!("LEVEL {}  SPACE + ENTER", state.level.current_level),
        },
        GamePhase::Playing => return None,
        GamePhase::Paused => match state.recovery {
            RecoveryStage::Exploding { .. } => return None,
            RecoveryStage::AwaitingConfirm => "PRESS SPACE TO CONTINUE".to_string(),
        },
        GamePhase::GameOver => {
            let outcome = match (state.win, state.mode) {
                (true, _) => "YOU WIN!",
                (false, GameMode::OnePlayer) => "GAME OVER",
                (false, GameMode::TwoPlayer) => "BOMBER WINS",
            };
            let rank = state.last_rank.map(|r| format!("RANK {r}  ")).unwrap_or_default();
            if state.new_high_score {
                format!("{outcome}  NEW HIGH SCORE  {rank}PRESS R")
            } else {
                format!("{outcome}  {rank}PRESS R")
            }
        }
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bomb;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct Sprite {
        kind: Option<SpriteKind>,
        pos: IVec2,
        visible: bool,
        text: String,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        sprites: HashMap<SpriteHandle, Sprite>,
        next: u32,
    }

    impl RecordingRenderer {
        fn visible(&self, kind: SpriteKind) -> Vec<&Sprite> {
            self.sprites
                .values()
                .filter(|s| s.visible && s.kind == Some(kind))
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn create_sprite(&mut self, kind: SpriteKind) -> SpriteHandle {
            self.next += 1;
            let handle = SpriteHandle(self.next);
            self.sprites.insert(
                handle,
                Sprite {
                    kind: Some(kind),
                    visible: true,
                    ..Default::default()
                },
            );
            handle
        }
        fn set_position(&mut self, handle: SpriteHandle, pos: IVec2) {
            if let Some(s) = self.sprites.get_mut(&handle) {
                s.pos = pos;
            }
        }
        fn set_visibility(&mut self, handle: SpriteHandle, visible: bool) {
            if let Some(s) = self.sprites.get_mut(&handle) {
                s.visible = visible;
            }
        }
        fn set_text(&mut self, handle: SpriteHandle, text: &str) {
            if let Some(s) = self.sprites.get_mut(&handle) {
                s.text = text.to_string();
            }
        }
        fn refresh(&mut self) {}
    }

    #[test]
    fn test_bucket_sprite_follows_tier() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = Scene::new(&mut renderer);
        let mut state = GameState::new(1, 1);
        state.phase = GamePhase::Playing;
        state.bucket.set_tier(2);
        scene.sync(&state, &mut renderer);
        assert!(renderer.visible(SpriteKind::Bucket { tier: 3 }).is_empty());
        let shown = renderer.visible(SpriteKind::Bucket { tier: 2 });
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].pos, state.bucket.pos);
    }

    #[test]
    fn test_bomb_pool_grows_and_hides() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = Scene::new(&mut renderer);
        let mut state = GameState::new(1, 1);
        state.phase = GamePhase::Playing;
        for x in [20, 60, 100] {
            state.bombs.push(Bomb {
                id: x as u32,
                pos: IVec2::new(x, 40),
                speed: 4,
            });
        }
        scene.sync(&state, &mut renderer);
        assert_eq!(renderer.visible(SpriteKind::Bomb).len(), 3);

        state.bombs.truncate(1);
        scene.sync(&state, &mut renderer);
        assert_eq!(renderer.visible(SpriteKind::Bomb).len(), 1);
        assert_eq!(scene.bombs.len(), 3);
    }

    #[test]
    fn test_sprite_sizes_match_collision_boxes() {
        let bomb = Bomb {
            id: 1,
            pos: IVec2::ZERO,
            speed: 4,
        };
        let rect = bomb.rect();
        assert_eq!(SpriteKind::Bomb.size(), IVec2::new(rect.right - rect.left, rect.bottom - rect.top));
        assert_eq!(SpriteKind::Bucket { tier: 3 }.size().y, 72);
    }

    #[test]
    fn test_bomber_moods_are_distinct_sprite_kinds() {
        let kinds: HashSet<SpriteKind> = [Mood::Sad, Mood::Happy, Mood::Surprised, Mood::Sad]
            .into_iter()
            .map(SpriteKind::Bomber)
            .collect();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_null_renderer_accepts_a_full_sync() {
        let mut renderer = NullRenderer::default();
        let mut scene = Scene::new(&mut renderer);
        let mut state = GameState::new(4, 1);
        state.phase = GamePhase::Paused;
        state.scatter_explosions(GAME_OVER_EXPLOSIONS);
        scene.sync(&state, &mut renderer);
        renderer.refresh();
        assert_eq!(scene.explosions.len(), GAME_OVER_EXPLOSIONS);
    }

    #[test]
    fn test_two_player_loss_banner() {
        let mut state = GameState::new(1, 1);
        state.phase = GamePhase::GameOver;
        state.mode = GameMode::TwoPlayer;
        assert_eq!(banner_text(&state).as_deref(), Some("BOMBER WINS  PRESS R"));
        state.phase = GamePhase::Playing;
        assert_eq!(banner_text(&state), None);
    }

    #[test]
    fn test_banners_show_leaderboard() {
        let mut state = GameState::new(1, 1);
        assert_eq!(
            banner_text(&state).as_deref(),
            Some("BUCKET BOOM  [1] ONE PLAYER  [2] TWO PLAYERS")
        );

        state.leaderboard.add_score(300, 2, 900);
        state.leaderboard.add_score(120, 1, 400);
        assert_eq!(
            banner_text(&state).as_deref(),
            Some("BUCKET BOOM  BEST 300  [1] ONE PLAYER  [2] TWO PLAYERS")
        );

        state.phase = GamePhase::GameOver;
        state.last_rank = Some(2);
        assert_eq!(banner_text(&state).as_deref(), Some("GAME OVER  RANK 2  PRESS R"));
        state.new_high_score = true;
        state.win = true;
        assert_eq!(
            banner_text(&state).as_deref(),
            Some("YOU WIN!  NEW HIGH SCORE  RANK 2  PRESS R")
        );
    }

    #[test]
    fn test_title_hides_playfield() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = Scene::new(&mut renderer);
        let state = GameState::new(1, 1);
        scene.sync(&state, &mut renderer);
        assert!(renderer.visible(SpriteKind::Bucket { tier: 3 }).is_empty());
        assert!(renderer.visible(SpriteKind::Bomber(Mood::Sad)).is_empty());
        let labels = renderer.visible(SpriteKind::Label);
        assert!(labels.iter().any(|l| l.text.starts_with("BUCKET BOOM")));
    }
}
