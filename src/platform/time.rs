//! Fixed-tick frame pacing

use std::thread;
use std::time::{Duration, Instant};

/// Sleeps the loop onto a fixed tick grid
///
/// If a frame overruns, the grid restarts from now instead of bursting to
/// catch up; the simulation only ever advances one tick per frame.
pub struct TickClock {
    period: Duration,
    next_deadline: Instant,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: Instant::now() + period,
        }
    }

    /// Block until the next tick boundary
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_deadline.checked_duration_since(now) {
            thread::sleep(remaining);
            self.next_deadline += self.period;
        } else {
            log::trace!("Tick overran by {:?}", now - self.next_deadline);
            self.next_deadline = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_paces_to_period() {
        let mut clock = TickClock::new(Duration::from_millis(5));
        let start = Instant::now();
        for _ in 0..4 {
            clock.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
