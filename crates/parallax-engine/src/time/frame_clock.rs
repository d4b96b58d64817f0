use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    ///
    /// Always equal to `elapsed - previous elapsed`, rounded to `f32`.
    pub dt: f32,

    /// Accumulated (clamped) time since the clock started, in seconds.
    /// `f64`, so a 16 ms step still registers after days of uptime.
    pub elapsed: f64,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// `FrameClock` is designed to be used per window (or per loop) so that multi-window
/// applications do not share delta-time state.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. `elapsed` is the sum of the clamped
/// deltas, so a stall never makes animations jump ahead.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self::with_clamps(
            Duration::from_micros(100), // 0.0001s
            Duration::from_millis(250), // 0.25s
        )
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    /// Accumulated `elapsed` is preserved.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Accumulated time in seconds as of the most recent tick.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit instant.
    ///
    /// Instants earlier than the previous tick count as a zero-length frame
    /// (then clamped to the minimum), so `dt` is never negative.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        let previous = self.elapsed;
        self.elapsed += dt.as_secs_f64();
        self.last = now;

        let ft = FrameTime {
            dt: (self.elapsed - previous) as f32,
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(start: Instant) -> FrameClock {
        let mut clock = FrameClock::new();
        clock.last = start;
        clock
    }

    #[test]
    fn dt_is_difference_of_elapsed() {
        let start = Instant::now();
        let mut clock = clock_at(start);

        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(40));

        assert!((a.elapsed - 0.016).abs() < 1e-6);
        assert_eq!(b.dt, (b.elapsed - a.elapsed) as f32);
        assert!((b.dt - 0.024).abs() < 1e-6);
    }

    #[test]
    fn stall_is_clamped_to_max() {
        let start = Instant::now();
        let mut clock = clock_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!((clock.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn going_backwards_never_yields_negative_dt() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = clock_at(start);

        let ft = clock.tick_at(start - Duration::from_millis(500));
        assert!(ft.dt > 0.0);
    }

    #[test]
    fn frame_index_increments() {
        let start = Instant::now();
        let mut clock = clock_at(start);

        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
    }

    #[test]
    fn long_uptime_keeps_frame_resolution() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        // About eleven days of accumulated time.
        clock.elapsed = 1.0e6;

        let ft = clock.tick_at(start + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert!(ft.elapsed > 1.0e6);
    }
}
