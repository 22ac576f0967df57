//! Orbit timing and trail generation
//!
//! Positions are always a function of absolute elapsed time, never an
//! accumulation of per-frame steps, so any frame can be reproduced from
//! `(elapsed, angular speed, playback rate)` alone.

pub mod clock;
pub mod trail;

pub use clock::{orbit_angle, spin_angle, OrbitClock, PlaybackRate};
pub use trail::{OrbitSample, TrailSpec};
