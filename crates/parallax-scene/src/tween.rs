//! Time-bounded angle interpolation.

/// Easing curve mapping normalized progress `t ∈ [0, 1]` to `[0, 1]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-in-out: `2t²` for the first half, mirrored after.
    QuadInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let k = -2.0 * t + 2.0;
                    1.0 - k * k * 0.5
                }
            }
        }
    }
}

/// Spin channel of one mesh.
///
/// The value is an angle offset in radians; it is added on top of the mesh's
/// continuous rotation rather than replacing it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SpinState {
    Idle {
        angle: f32,
    },
    Animating {
        start_angle: f32,
        target_angle: f32,
        /// Seconds on the demo clock.
        start_time: f64,
        duration: f32,
        ease: Ease,
    },
}

impl Default for SpinState {
    fn default() -> Self {
        SpinState::Idle { angle: 0.0 }
    }
}

impl SpinState {
    /// Value of the channel at time `now` (seconds on the demo clock).
    pub fn value_at(&self, now: f64) -> f32 {
        match *self {
            SpinState::Idle { angle } => angle,
            SpinState::Animating { start_angle, target_angle, start_time, duration, ease } => {
                if duration <= 0.0 {
                    return target_angle;
                }
                let t = ((now - start_time) / f64::from(duration)) as f32;
                start_angle + (target_angle - start_angle) * ease.apply(t)
            }
        }
    }

    /// The angle the channel is heading to (its own angle when idle).
    pub fn target(&self) -> f32 {
        match *self {
            SpinState::Idle { angle } => angle,
            SpinState::Animating { target_angle, .. } => target_angle,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, SpinState::Animating { .. })
    }

    /// Starts spinning by `delta` radians over `duration` seconds.
    ///
    /// A spin already in flight is cancelled: the new one starts from the
    /// current eased value and aims at the old target plus `delta`, so no
    /// rotation is lost and the value never jumps.
    pub fn spin_by(&mut self, delta: f32, duration: f32, ease: Ease, now: f64) {
        let start_angle = self.value_at(now);
        let target_angle = self.target() + delta;
        *self = SpinState::Animating {
            start_angle,
            target_angle,
            start_time: now,
            duration,
            ease,
        };
    }

    /// Advances the state machine to `now`, snapping to idle once finished.
    /// Returns the current value.
    pub fn update(&mut self, now: f64) -> f32 {
        if let SpinState::Animating { target_angle, start_time, duration, .. } = *self {
            if now - start_time >= f64::from(duration) {
                *self = SpinState::Idle { angle: target_angle };
                return target_angle;
            }
        }
        self.value_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    // ── easing ────────────────────────────────────────────────────────────

    #[test]
    fn quad_in_out_endpoints_and_midpoint() {
        assert_eq!(Ease::QuadInOut.apply(0.0), 0.0);
        assert_eq!(Ease::QuadInOut.apply(1.0), 1.0);
        assert!((Ease::QuadInOut.apply(0.5) - 0.5).abs() < EPS);
        assert!((Ease::QuadInOut.apply(0.25) - 0.125).abs() < EPS);
        assert!((Ease::QuadInOut.apply(0.75) - 0.875).abs() < EPS);
    }

    #[test]
    fn quad_in_out_is_monotone() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = Ease::QuadInOut.apply(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn ease_clamps_out_of_range_progress() {
        assert_eq!(Ease::QuadInOut.apply(-1.0), 0.0);
        assert_eq!(Ease::Linear.apply(3.0), 1.0);
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn spin_reaches_target_and_goes_idle() {
        let mut s = SpinState::default();
        s.spin_by(3.0, 2.0, Ease::QuadInOut, 10.0);

        assert!((s.update(11.0) - 1.5).abs() < EPS);
        assert!(s.is_animating());

        assert_eq!(s.update(12.0), 3.0);
        assert_eq!(s, SpinState::Idle { angle: 3.0 });
    }

    #[test]
    fn overlapping_spin_restarts_from_current_value() {
        let mut s = SpinState::default();
        s.spin_by(3.0, 2.0, Ease::QuadInOut, 0.0);
        let mid = s.update(1.0);

        s.spin_by(3.0, 2.0, Ease::QuadInOut, 1.0);
        assert!((s.value_at(1.0) - mid).abs() < EPS, "no jump on restart");
        assert_eq!(s.target(), 6.0);

        assert_eq!(s.update(3.0), 6.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut s = SpinState::Idle { angle: 1.0 };
        s.spin_by(2.0, 0.0, Ease::Linear, 5.0);
        assert_eq!(s.update(5.0), 3.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn spin_late_in_a_long_session_still_eases() {
        let start = 1.0e6;
        let mut s = SpinState::default();
        s.spin_by(3.0, 2.0, Ease::QuadInOut, start);

        assert!((s.update(start + 0.5) - 0.375).abs() < 1e-5);
        assert!((s.update(start + 1.0) - 1.5).abs() < 1e-5);
        assert_eq!(s.update(start + 2.0), 3.0);
    }
}
