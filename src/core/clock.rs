use std::time::Instant;

/// Frame clock - yields delta time per tick and accumulates elapsed time
///
/// `Wall` measures real time between ticks. `Fixed` advances by a constant
/// step so frame sequences are reproducible.
#[derive(Debug, Clone)]
pub enum Clock {
    Wall { last_tick: Instant, elapsed: f32 },
    Fixed { step: f32, elapsed: f32 },
}

impl Clock {
    /// Create wall clock starting now
    pub fn new() -> Self {
        Self::Wall {
            last_tick: Instant::now(),
            elapsed: 0.0,
        }
    }

    /// Create clock that advances `step` seconds per tick
    pub fn fixed(step: f32) -> Self {
        Self::Fixed { step, elapsed: 0.0 }
    }

    /// Advance one frame, returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        match self {
            Self::Wall { last_tick, elapsed } => {
                let now = Instant::now();
                let delta = now.duration_since(*last_tick).as_secs_f32();
                *last_tick = now;
                *elapsed += delta;
                delta
            }
            Self::Fixed { step, elapsed } => {
                *elapsed += *step;
                *step
            }
        }
    }

    /// Total seconds accumulated by `tick`
    pub fn elapsed(&self) -> f32 {
        match self {
            Self::Wall { elapsed, .. } | Self::Fixed { elapsed, .. } => *elapsed,
        }
    }

    /// Reset elapsed time to zero
    pub fn reset(&mut self) {
        match self {
            Self::Wall { last_tick, elapsed } => {
                *last_tick = Instant::now();
                *elapsed = 0.0;
            }
            Self::Fixed { elapsed, .. } => *elapsed = 0.0,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires at a fixed interval of accumulated delta time
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    interval: f32,
    accumulator: f32,
}

impl Interval {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns accumulated time when the interval elapses
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.accumulator += delta;
        if self.accumulator >= self.interval {
            let elapsed = self.accumulator;
            self.accumulator = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();

        assert!(delta >= 0.009);
        assert_eq!(clock.elapsed(), delta);
    }

    #[test]
    fn fixed_clock_is_deterministic() {
        let mut clock = Clock::fixed(0.5);

        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.elapsed(), 1.0);

        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn interval_fires_after_threshold() {
        let mut timer = Interval::new(1.0);

        assert_eq!(timer.tick(0.6), None);
        assert_eq!(timer.tick(0.6), Some(1.2));
        assert_eq!(timer.tick(0.1), None);
    }
}
