//! Terminal renderer
//!
//! Draws sprites as glyphs on a character grid with crossterm. Each cell
//! covers 8x12 display pixels, so the 320x240 display becomes 40x20 cells.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::IVec2;

use super::{Renderer, SpriteHandle, SpriteKind};
use crate::consts::{BUCKET_RIM_OFFSET, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::sim::state::Mood;

pub const CELL_WIDTH: i32 = 8;
pub const CELL_HEIGHT: i32 = 12;

const C_BORDER: Color = Color::DarkBlue;
const C_BUCKET: Color = Color::Cyan;
const C_BOMBER: Color = Color::White;
const C_EXPLOSION: Color = Color::Red;
const C_SPLASH: Color = Color::Blue;
const C_TEXT: Color = Color::Yellow;
/// Fuse colours, cycled by the bomb frame
const C_FUSE: [Color; 3] = [Color::Red, Color::Yellow, Color::White];

struct Sprite {
    kind: SpriteKind,
    pos: IVec2,
    visible: bool,
    frame: u8,
    text: String,
}

/// Renders to any writer (normally a buffered stdout in raw mode)
pub struct TerminalRenderer<W: Write> {
    out: W,
    sprites: Vec<Sprite>,
    failed: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sprites: Vec::new(),
            failed: false,
        }
    }

    /// Terminal size needed to show the whole display (including the border)
    pub fn required_size() -> (u16, u16) {
        let cols = DISPLAY_WIDTH / CELL_WIDTH + 2;
        let rows = DISPLAY_HEIGHT / CELL_HEIGHT + 2;
        (cols as u16, rows as u16)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn sprite_mut(&mut self, handle: SpriteHandle) -> Option<&mut Sprite> {
        self.sprites.get_mut(handle.0 as usize)
    }

    fn draw(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()?;

        // Sprites draw in creation order; labels go last so they stay readable
        let order = self
            .sprites
            .iter()
            .filter(|s| s.visible && s.kind != SpriteKind::Label)
            .chain(self.sprites.iter().filter(|s| s.visible && s.kind == SpriteKind::Label));
        for sprite in order {
            draw_sprite(&mut self.out, sprite)?;
        }

        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, Self::required_size().1))?;
        self.out.flush()
    }

    fn draw_border(&mut self) -> io::Result<()> {
        let (cols, rows) = Self::required_size();
        let inner = cols.saturating_sub(2) as usize;
        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        self.out.queue(cursor::MoveTo(0, rows - 1))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
        for row in 1..rows - 1 {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(cols - 1, row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }
}

/// Map a display pixel to a terminal cell inside the border
fn cell(pos: IVec2) -> (u16, u16) {
    let col = (pos.x / CELL_WIDTH).clamp(0, DISPLAY_WIDTH / CELL_WIDTH - 1) + 1;
    let row = (pos.y / CELL_HEIGHT).clamp(0, DISPLAY_HEIGHT / CELL_HEIGHT - 1) + 1;
    (col as u16, row as u16)
}

fn glyph_rows(sprite: &Sprite) -> (Color, Vec<String>) {
    match sprite.kind {
        SpriteKind::Bucket { tier } => (C_BUCKET, vec!["\\_/".to_string(); tier as usize]),
        SpriteKind::Bomber(mood) => {
            let face = match mood {
                Mood::Sad => "[:(]",
                Mood::Happy => "[:)]",
                Mood::Surprised => "[:O]",
            };
            (C_BOMBER, vec![face.to_string()])
        }
        SpriteKind::Bomb => (C_FUSE[sprite.frame as usize % C_FUSE.len()], vec!["@*".to_string()]),
        SpriteKind::Explosion => {
            let size = sprite.kind.size();
            let cols = (size.x / CELL_WIDTH).max(2) as usize;
            let rows = (size.y / CELL_HEIGHT).max(1) as usize;
            let row = format!("*{}*", "#".repeat(cols - 2));
            (C_EXPLOSION, vec![row; rows])
        }
        SpriteKind::Splash => {
            let wave = match sprite.frame {
                0 => " . ",
                1 => " ~ ",
                _ => "~~~",
            };
            (C_SPLASH, vec![wave.to_string()])
        }
        SpriteKind::Label => (C_TEXT, vec![sprite.text.clone()]),
    }
}

fn draw_sprite<W: Write>(out: &mut W, sprite: &Sprite) -> io::Result<()> {
    let (color, rows) = glyph_rows(sprite);
    let origin = match sprite.kind {
        // The bucket's visible stack starts at its catch rim
        SpriteKind::Bucket { .. } => sprite.pos + IVec2::new(0, BUCKET_RIM_OFFSET),
        _ => sprite.pos,
    };
    let (col, row) = cell(origin);
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in rows.iter().enumerate() {
        out.queue(cursor::MoveTo(col, row + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn create_sprite(&mut self, kind: SpriteKind) -> SpriteHandle {
        let handle = SpriteHandle(self.sprites.len() as u32);
        self.sprites.push(Sprite {
            kind,
            pos: IVec2::ZERO,
            visible: true,
            frame: 0,
            text: String::new(),
        });
        handle
    }

    fn set_position(&mut self, handle: SpriteHandle, pos: IVec2) {
        if let Some(sprite) = self.sprite_mut(handle) {
            sprite.pos = pos;
        }
    }

    fn set_visibility(&mut self, handle: SpriteHandle, visible: bool) {
        if let Some(sprite) = self.sprite_mut(handle) {
            sprite.visible = visible;
        }
    }

    fn set_text(&mut self, handle: SpriteHandle, text: &str) {
        if let Some(sprite) = self.sprite_mut(handle) {
            sprite.text.clear();
            sprite.text.push_str(text);
        }
    }

    fn set_frame(&mut self, handle: SpriteHandle, frame: u8) {
        if let Some(sprite) = self.sprite_mut(handle) {
            sprite.frame = frame;
        }
    }

    fn refresh(&mut self) {
        if self.failed {
            return;
        }
        if let Err(err) = self.draw() {
            log::error!("Terminal refresh failed: {err}");
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_clamp_to_grid() {
        assert_eq!(cell(IVec2::new(0, 0)), (1, 1));
        assert_eq!(cell(IVec2::new(296, 164)), (38, 14));
        assert_eq!(cell(IVec2::new(-40, 900)), (1, 20));
    }

    #[test]
    fn test_refresh_draws_visible_sprites_only() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let label = renderer.create_sprite(SpriteKind::Label);
        renderer.set_text(label, "HELLO");
        let hidden = renderer.create_sprite(SpriteKind::Label);
        renderer.set_text(hidden, "SECRET");
        renderer.set_visibility(hidden, false);
        renderer.refresh();

        let out = String::from_utf8_lossy(&renderer.into_inner()).into_owned();
        assert!(out.contains("HELLO"));
        assert!(!out.contains("SECRET"));
    }

    #[test]
    fn test_bucket_draws_from_its_rim() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let bucket = renderer.create_sprite(SpriteKind::Bucket { tier: 3 });
        renderer.set_position(bucket, IVec2::new(0, 164));
        renderer.refresh();

        // Rim at y=184 is cell row 16; MoveTo is 1-based on the wire
        let out = String::from_utf8_lossy(&renderer.into_inner()).into_owned();
        assert!(out.contains("\x1b[17;2H"));
        assert!(!out.contains("\x1b[15;2H"));
    }

    #[test]
    fn test_explosion_glyph_covers_its_size() {
        let sprite = Sprite {
            kind: SpriteKind::Explosion,
            pos: IVec2::ZERO,
            visible: true,
            frame: 0,
            text: String::new(),
        };
        let (_, rows) = glyph_rows(&sprite);
        assert_eq!(rows, vec!["*##*".to_string(), "*##*".to_string()]);
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.set_position(SpriteHandle(42), IVec2::ONE);
        renderer.set_visibility(SpriteHandle(42), true);
        renderer.refresh();
        assert!(!renderer.failed);
    }
}
