//! Collision detection and resolution for falling bombs
//!
//! Everything here is axis-aligned and integer: the bucket and every bomb are
//! rectangles, and the floor is the bottom edge of the display.

use std::ops::ControlFlow;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::Bomb;

/// Axis-aligned rectangle with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn from_origin_size(origin: IVec2, size: IVec2) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.x,
            bottom: origin.y + size.y,
        }
    }

    /// Edge-touching rectangles count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        let x_overlap = self.right >= other.left && self.left <= other.right;
        let y_overlap = self.bottom >= other.top && self.top <= other.bottom;
        x_overlap && y_overlap
    }
}

/// How a bomb pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Every bomb was processed and none hit the floor
    Clear,
    /// A bomb passed the floor; no further bombs were checked
    Miss { bomb_id: u32 },
    /// The catch handler asked to stop (e.g. the game was won)
    Halted,
}

/// Result of one tick of bomb resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub caught: u32,
    pub resolution: Resolution,
}

/// Advance bombs in spawn order and resolve each against the bucket and floor
///
/// Each bomb is moved, then checked for a catch, then for the floor. Caught
/// bombs are removed and handed to `on_catch`; if it returns `Break`,
/// processing stops with [`Resolution::Halted`]. The first bomb past the
/// floor stops processing with [`Resolution::Miss`]; it stays in `bombs`
/// and the bombs behind it are neither moved nor caught this tick.
pub fn resolve_bombs<F>(bombs: &mut Vec<Bomb>, bucket: &Rect, floor: i32, mut on_catch: F) -> CollisionReport
where
    F: FnMut(&Bomb) -> ControlFlow<()>,
{
    let mut caught = 0;
    let mut i = 0;
    while i < bombs.len() {
        bombs[i].advance();
        if bombs[i].rect().overlaps(bucket) {
            let bomb = bombs.remove(i);
            caught += 1;
            if on_catch(&bomb).is_break() {
                return CollisionReport {
                    caught,
                    resolution: Resolution::Halted,
                };
            }
            continue;
        }
        if bombs[i].is_below(floor) {
            return CollisionReport {
                caught,
                resolution: Resolution::Miss { bomb_id: bombs[i].id },
            };
        }
        i += 1;
    }

    CollisionReport {
        caught,
        resolution: Resolution::Clear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn bomb(id: u32, x: i32, y: i32) -> Bomb {
        Bomb {
            id,
            pos: IVec2::new(x, y),
            speed: 4,
        }
    }

    fn bucket_rect() -> Rect {
        Rect {
            left: 100,
            top: 184,
            right: 124,
            bottom: 236,
        }
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Rect::from_origin_size(IVec2::new(0, 0), IVec2::new(10, 10));
        let b = Rect::from_origin_size(IVec2::new(10, 10), IVec2::new(10, 10));
        assert!(a.overlaps(&b));
        let c = Rect::from_origin_size(IVec2::new(11, 0), IVec2::new(10, 10));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_catch_removes_bomb() {
        let mut bombs = vec![bomb(1, 104, 157)];
        let mut seen = Vec::new();
        let report = resolve_bombs(&mut bombs, &bucket_rect(), DISPLAY_HEIGHT, |b| {
            seen.push(b.id);
            ControlFlow::Continue(())
        });
        assert_eq!(report.caught, 1);
        assert_eq!(report.resolution, Resolution::Clear);
        assert!(bombs.is_empty());
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn test_three_offscreen_bombs_report_one_miss() {
        let mut bombs = vec![bomb(1, 10, 220), bomb(2, 40, 225), bomb(3, 70, 230)];
        let report = resolve_bombs(&mut bombs, &bucket_rect(), DISPLAY_HEIGHT, |_| {
            ControlFlow::Continue(())
        });
        assert_eq!(report.resolution, Resolution::Miss { bomb_id: 1 });
        assert_eq!(report.caught, 0);
    }

    #[test]
    fn test_halting_catch_preempts_miss() {
        // The catch is ahead of the off-screen bomb, so the miss is never seen
        let mut bombs = vec![bomb(1, 104, 157), bomb(2, 10, 230)];
        let report = resolve_bombs(&mut bombs, &bucket_rect(), DISPLAY_HEIGHT, |_| {
            ControlFlow::Break(())
        });
        assert_eq!(report.resolution, Resolution::Halted);
        assert_eq!(report.caught, 1);
        assert_eq!(bombs.len(), 1);
        assert_eq!(bombs[0].pos.y, 230);
    }

    #[test]
    fn test_miss_stops_before_later_bombs() {
        // Older bomb hits the floor; the newer one over the bucket is left alone
        let mut bombs = vec![bomb(1, 10, 230), bomb(2, 104, 157)];
        let mut seen = 0;
        let report = resolve_bombs(&mut bombs, &bucket_rect(), DISPLAY_HEIGHT, |_| {
            seen += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(report.resolution, Resolution::Miss { bomb_id: 1 });
        assert_eq!(report.caught, 0);
        assert_eq!(seen, 0);
        assert_eq!(bombs.len(), 2);
        assert_eq!(bombs[1].pos.y, 157);
    }

    #[test]
    fn test_bombs_fall_by_their_own_speed() {
        let mut bombs = vec![bomb(1, 10, 30), Bomb { id: 2, pos: IVec2::new(50, 30), speed: 9 }];
        resolve_bombs(&mut bombs, &bucket_rect(), DISPLAY_HEIGHT, |_| ControlFlow::Continue(()));
        assert_eq!(bombs[0].pos.y, 34);
        assert_eq!(bombs[1].pos.y, 39);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -50i32..350, ay in -50i32..300, aw in 0i32..40, ah in 0i32..40,
            bx in -50i32..350, by in -50i32..300, bw in 0i32..40, bh in 0i32..40,
        ) {
            let a = Rect::from_origin_size(IVec2::new(ax, ay), IVec2::new(aw, ah));
            let b = Rect::from_origin_size(IVec2::new(bx, by), IVec2::new(bw, bh));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
