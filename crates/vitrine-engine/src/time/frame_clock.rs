use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Milliseconds since the previous tick. `0` on the first tick.
    pub elapsed_ms: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per window. Elapsed time is the plain difference between
/// consecutive ticks: never negative, no fixed-step accumulation, no catch-up.
/// Clamps are opt-in through [`FrameClock::with_clamps`].
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    clamps: Option<(Duration, Duration)>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose elapsed time is clamped to `[min, max]`.
    ///
    /// The first tick still reports `0`.
    pub fn with_clamps(min: Duration, max: Duration) -> Self {
        debug_assert!(min <= max);
        Self { last: None, frame_index: 0, clamps: Some((min, max)) }
    }

    /// Forgets the previous tick; the next tick reports `0`.
    ///
    /// Used after the loop was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock to the current instant.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// A `now` earlier than the previous tick reports `0` elapsed.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let elapsed = match self.last {
            None => Duration::ZERO,
            Some(last) => {
                let dt = now.saturating_duration_since(last);
                match self.clamps {
                    Some((min, max)) => dt.clamp(min, max),
                    None => dt,
                }
            }
        };
        self.last = Some(now);

        let ft = FrameTime {
            elapsed_ms: elapsed.as_secs_f32() * 1000.0,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn run(clock: &mut FrameClock, stamps: &[u64]) -> Vec<f32> {
        let t0 = Instant::now();
        stamps
            .iter()
            .map(|s| clock.tick_at(t0 + ms(*s)).elapsed_ms.round())
            .collect()
    }

    #[test]
    fn reports_differences_between_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(run(&mut clock, &[0, 16, 33, 50]), vec![0.0, 16.0, 17.0, 17.0]);
    }

    #[test]
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0).frame_index, 0);
        assert_eq!(clock.tick_at(t0 + ms(5)).frame_index, 1);
    }

    #[test]
    fn time_going_backwards_reports_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + ms(100);
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 - ms(50));
        assert_eq!(ft.elapsed_ms, 0.0);
    }

    #[test]
    fn long_gaps_are_not_clamped_by_default() {
        let mut clock = FrameClock::new();
        assert_eq!(run(&mut clock, &[0, 5000]), vec![0.0, 5000.0]);
    }

    #[test]
    fn clamps_apply_when_configured() {
        let mut clock = FrameClock::with_clamps(ms(1), ms(250));
        assert_eq!(run(&mut clock, &[0, 0, 5000]), vec![0.0, 1.0, 250.0]);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        assert_eq!(clock.tick_at(t0 + ms(40)).elapsed_ms, 0.0);
    }
}
