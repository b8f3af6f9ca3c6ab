//! Bomber movement
//!
//! In one-player games the bomber drives itself with two tick counters: one
//! paces its steps, the other decides when to turn around. In two-player
//! games it is stepped directly by player two.

use rand::Rng;

use super::difficulty::DifficultyController;
use super::state::Bomber;
use crate::consts::{BOMBER_LEFT_WALL, BOMBER_RIGHT_WALL};

impl Bomber {
    /// Advance the autonomous bomber by one tick
    pub fn update_autonomous<R: Rng + ?Sized>(&mut self, level: &DifficultyController, rng: &mut R) {
        self.move_timer += 1;
        self.change_timer += 1;

        if self.direction_change == 0 {
            self.direction_change = level.table.draw_direction_change(rng);
        }

        if self.move_timer < level.bomber_speed {
            return;
        }
        self.move_timer = 0;
        self.pos.x += level.enemy_step * self.direction;

        let at_left = self.pos.x <= BOMBER_LEFT_WALL && self.direction < 0;
        let at_right = self.pos.x >= BOMBER_RIGHT_WALL && self.direction > 0;
        if at_left || at_right {
            self.pos.x = self.pos.x.clamp(BOMBER_LEFT_WALL, BOMBER_RIGHT_WALL);
            self.turn_around(level, rng);
        }

        if self.change_timer >= self.direction_change {
            self.turn_around(level, rng);
        }
    }

    /// Step under player control; `direction` is -1 (left) or +1 (right)
    pub fn step_manual(&mut self, direction: i32, step: i32) {
        let x = self.pos.x + step * direction.signum();
        self.pos.x = x.clamp(BOMBER_LEFT_WALL, BOMBER_RIGHT_WALL);
    }

    fn turn_around<R: Rng + ?Sized>(&mut self, level: &DifficultyController, rng: &mut R) {
        self.direction = -self.direction;
        self.change_timer = 0;
        self.direction_change = level.table.draw_direction_change(rng);
    }
}
