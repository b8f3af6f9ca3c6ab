//! Timer-driven bomb spawning

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyController;
use super::state::{Bomb, Bomber};

/// Decides when the autonomous bomber releases a bomb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks since the last spawn
    pub drop_timer: u32,
}

impl Spawner {
    pub fn reset(&mut self) {
        self.drop_timer = 0;
    }

    /// Advance the drop timer one tick; returns true when a bomb should spawn
    ///
    /// The first bomb of a level fires immediately. After every spawn the
    /// drop interval is re-rolled from the level's range.
    pub fn update<R: Rng + ?Sized>(&mut self, level: &mut DifficultyController, rng: &mut R) -> bool {
        if level.all_dropped() {
            return false;
        }
        self.drop_timer += 1;
        let fire = level.bombs_dropped == 0 || self.drop_timer >= level.drop_interval;
        if fire {
            self.drop_timer = 0;
            level.reroll_drop_interval(rng);
        }
        fire
    }
}

/// Release a bomb from the bomber if the level still has bombs to drop
///
/// The bomb keeps the level's current drop speed for its whole fall.
pub fn spawn_bomb(id: u32, bomber: &Bomber, level: &mut DifficultyController) -> Option<Bomb> {
    if level.all_dropped() {
        return None;
    }
    level.bombs_dropped += 1;
    log::debug!("Bomb {} released ({}/{})", id, level.bombs_dropped, level.bomb_count);
    Some(Bomb {
        id,
        pos: bomber.drop_point(),
        speed: level.drop_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_first_bomb_fires_immediately() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut level = DifficultyController::new(1, &mut rng);
        let mut spawner = Spawner::default();
        assert!(spawner.update(&mut level, &mut rng));
    }

    #[test]
    fn test_waits_for_drop_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut level = DifficultyController::new(1, &mut rng);
        level.bombs_dropped = 1;
        level.drop_interval = 15;
        let mut spawner = Spawner::default();
        for _ in 0..14 {
            assert!(!spawner.update(&mut level, &mut rng));
        }
        assert!(spawner.update(&mut level, &mut rng));
        assert_eq!(spawner.drop_timer, 0);
        assert!(level.drop_interval >= level.table.drop_interval_lower);
        assert!(level.drop_interval <= level.table.drop_interval_upper);
    }

    #[test]
    fn test_stops_when_level_exhausted() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut level = DifficultyController::new(1, &mut rng);
        let bomber = Bomber::default();
        let mut spawner = Spawner::default();
        let mut spawned = 0;
        for tick in 0..10_000u32 {
            if spawner.update(&mut level, &mut rng) && spawn_bomb(tick, &bomber, &mut level).is_some() {
                spawned += 1;
            }
        }
        assert_eq!(spawned, level.bomb_count);
        assert!(!spawner.update(&mut level, &mut rng));
        assert!(spawn_bomb(0, &bomber, &mut level).is_none());
    }

    #[test]
    fn test_bomb_inherits_speed_and_position() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut level = DifficultyController::new(3, &mut rng);
        let mut bomber = Bomber::default();
        bomber.pos.x = 120;
        let bomb = spawn_bomb(7, &bomber, &mut level).expect("level 3 has bombs");
        assert_eq!(bomb.speed, 5);
        assert_eq!(bomb.pos.x, 120);
        assert_eq!(bomb.pos.y, BOMBER_START_Y * SPRITE_SCALE + BOMB_SPAWN_OFFSET);
        assert_eq!(level.bombs_dropped, 1);
    }
}
