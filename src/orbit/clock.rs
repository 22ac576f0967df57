//! Orbit clock and global playback rate

use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Slowest playback rate the rate control allows (motion frozen)
pub const MIN_PLAYBACK_RATE: f64 = 0.0;
/// Fastest playback rate the rate control allows
pub const MAX_PLAYBACK_RATE: f64 = 5.0;
/// Increment of the rate control
pub const PLAYBACK_RATE_STEP: f64 = 0.1;

/// Angle of a body after `elapsed` seconds
///
/// `θ = t · s · v`. Zero playback rate yields a constant angle of zero; no
/// rate ever appears in a denominator.
pub fn orbit_angle(elapsed: f64, angular_speed: f64, rate: PlaybackRate) -> f64 {
    elapsed * angular_speed * rate.value()
}

/// Self-rotation angle of a body spinning at `spin_rate` rad/s
pub fn spin_angle(elapsed: f64, spin_rate: f64, rate: PlaybackRate) -> f64 {
    elapsed * spin_rate * rate.value()
}

/// Global multiplier on every angular speed in a scene
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Create a playback rate, clamped into `[0, 5]`
    ///
    /// NaN is treated as a frozen scene.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(MIN_PLAYBACK_RATE);
        }
        Self(value.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE))
    }

    /// A rate of zero: every body holds its angle
    pub fn frozen() -> Self {
        Self(MIN_PLAYBACK_RATE)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_frozen(&self) -> bool {
        self.0 == MIN_PLAYBACK_RATE
    }

    /// Move the control one notch up, snapping to the step grid
    pub fn step_up(self) -> Self {
        Self::new(snap_to_step(self.0 + PLAYBACK_RATE_STEP))
    }

    /// Move the control one notch down, snapping to the step grid
    pub fn step_down(self) -> Self {
        Self::new(snap_to_step(self.0 - PLAYBACK_RATE_STEP))
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} day/sec", self.0)
    }
}

fn snap_to_step(value: f64) -> f64 {
    (value / PLAYBACK_RATE_STEP).round() * PLAYBACK_RATE_STEP
}

/// Wall-clock source of elapsed scene time
///
/// Only the start instant is stored; there is no per-frame state to drift.
#[derive(Debug, Clone, Copy)]
pub struct OrbitClock {
    started: Instant,
}

impl OrbitClock {
    /// Start a clock at the current instant
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds since the clock was started or last restarted
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Reset elapsed time to zero
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }
}

impl Default for OrbitClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_is_deterministic() {
        let rate = PlaybackRate::new(2.3);
        let first = orbit_angle(12.5, 0.75, rate);
        let second = orbit_angle(12.5, 0.75, rate);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_restart_reproduces_sequence() {
        let rate = PlaybackRate::default();
        let times = [0.0, 0.016, 0.033, 1.0, 10.0];
        let run_a: Vec<f64> = times.iter().map(|t| orbit_angle(*t, 1.5, rate)).collect();
        let run_b: Vec<f64> = times.iter().map(|t| orbit_angle(*t, 1.5, rate)).collect();
        assert_eq!(run_a, run_b);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(3600.0)]
    #[case(1.0e9)]
    fn test_frozen_rate_holds_angle(#[case] elapsed: f64) {
        assert_eq!(orbit_angle(elapsed, 2.0 * PI, PlaybackRate::frozen()), 0.0);
    }

    #[test]
    fn test_rate_scales_linearly() {
        let slow = orbit_angle(4.0, 0.5, PlaybackRate::new(1.0));
        let fast = orbit_angle(4.0, 0.5, PlaybackRate::new(3.0));
        assert_relative_eq!(fast, 3.0 * slow);
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(PlaybackRate::new(-1.0).value(), 0.0);
        assert_eq!(PlaybackRate::new(12.0).value(), 5.0);
        assert!(PlaybackRate::new(f64::NAN).is_frozen());
    }

    #[test]
    fn test_rate_steps() {
        let rate = PlaybackRate::new(1.0).step_up().step_up();
        assert_relative_eq!(rate.value(), 1.2, epsilon = 1e-12);

        let floor = PlaybackRate::new(0.05).step_down();
        assert!(floor.is_frozen());

        let ceiling = PlaybackRate::new(5.0).step_up();
        assert_eq!(ceiling.value(), 5.0);
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(PlaybackRate::new(1.26).to_string(), "1.3 day/sec");
    }

    #[test]
    fn test_clock_restart() {
        let mut clock = OrbitClock::start();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let before = clock.elapsed_secs();
        assert!(before >= 0.02);
        clock.restart();
        assert!(clock.elapsed_secs() < before);
    }
}
