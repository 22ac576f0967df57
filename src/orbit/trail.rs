//! Fixed-span orbit trails
//!
//! A trail is a short arc of the orbit drawn behind a moving body. Its
//! angular length is constant regardless of speed, and it is rebuilt from the
//! current angle on every frame; nothing is carried between frames.

use nalgebra::Point3;
use serde::Serialize;
use std::f64::consts::PI;

use crate::geometry::circle_point;
use crate::{ExoscopeError, Result};

/// Default angular length of a trail (a quarter orbit)
pub const DEFAULT_TRAIL_SPAN: f64 = PI / 2.0;
/// Default number of points in a trail
pub const DEFAULT_TRAIL_POINTS: usize = 20;

/// A body's angle and the matching point on its orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitSample {
    /// Orbital angle in radians (not wrapped)
    pub angle: f64,
    /// Position in scene units
    pub position: Point3<f64>,
}

impl OrbitSample {
    /// Sample an orbit of the given radius at an angle
    pub fn at(radius: f64, angle: f64) -> Self {
        Self {
            angle,
            position: circle_point(radius, angle),
        }
    }
}

/// Shape of the trails drawn behind every body in a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSpec {
    span: f64,
    points: usize,
}

impl TrailSpec {
    /// Create a trail shape spanning `span` radians with `points` samples
    ///
    /// At least two points are needed to span an arc, and the span must be a
    /// finite, non-negative angle.
    pub fn new(span: f64, points: usize) -> Result<Self> {
        if points < 2 {
            return Err(ExoscopeError::InvalidParameter(format!(
                "a trail needs at least 2 points, got {}",
                points
            )));
        }
        if !span.is_finite() || span < 0.0 {
            return Err(ExoscopeError::InvalidParameter(format!(
                "trail span must be a finite non-negative angle, got {}",
                span
            )));
        }
        Ok(Self { span, points })
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn points(&self) -> usize {
        self.points
    }

    /// Angular gap between consecutive trail points
    pub fn step(&self) -> f64 {
        self.span / (self.points - 1) as f64
    }

    /// Build the trail behind a body at `angle` on an orbit of `radius`
    ///
    /// Sample `i` sits at `angle - i·span/(points-1)`, so the first sample is
    /// the body itself and the last is a full span behind it.
    pub fn generate(&self, angle: f64, radius: f64) -> Vec<OrbitSample> {
        let last = (self.points - 1) as f64;
        (0..self.points)
            .map(|i| OrbitSample::at(radius, angle - (i as f64 / last) * self.span))
            .collect()
    }
}

impl Default for TrailSpec {
    fn default() -> Self {
        Self {
            span: DEFAULT_TRAIL_SPAN,
            points: DEFAULT_TRAIL_POINTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(PI / 3.0)]
    #[case(-12.0)]
    #[case(1.0e6)]
    fn test_trail_length_is_fixed(#[case] angle: f64) {
        let shape = TrailSpec::default();
        let trail = shape.generate(angle, 1.2);
        assert_eq!(trail.len(), DEFAULT_TRAIL_POINTS);
    }

    #[test]
    fn test_trail_spacing() {
        let shape = TrailSpec::default();
        let trail = shape.generate(2.0, 1.0);
        let expected = DEFAULT_TRAIL_SPAN / (DEFAULT_TRAIL_POINTS - 1) as f64;

        for pair in trail.windows(2) {
            assert_relative_eq!(pair[0].angle - pair[1].angle, expected, epsilon = 1e-12);
        }
        assert_relative_eq!(shape.step(), expected);
    }

    #[test]
    fn test_trail_endpoints() {
        let shape = TrailSpec::new(PI, 5).unwrap();
        let trail = shape.generate(PI, 2.0);

        // Head of the trail is the body itself
        assert_eq!(trail[0].angle, PI);
        assert_relative_eq!(trail[0].position.x, -2.0, epsilon = 1e-12);

        // Tail is half an orbit back
        assert_relative_eq!(trail[4].angle, 0.0, epsilon = 1e-12);
        assert_relative_eq!(trail[4].position.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trail_points_on_orbit() {
        let trail = TrailSpec::default().generate(0.9, 1.8);
        for sample in trail {
            let r2 = sample.position.x.powi(2) + sample.position.z.powi(2);
            assert_relative_eq!(r2, 1.8 * 1.8, epsilon = 1e-9);
            assert_eq!(sample.position.y, 0.0);
        }
    }

    #[test]
    fn test_invalid_trail_shapes() {
        assert!(TrailSpec::new(PI, 1).is_err());
        assert!(TrailSpec::new(-1.0, 10).is_err());
        assert!(TrailSpec::new(f64::INFINITY, 10).is_err());
        assert!(TrailSpec::new(0.0, 2).is_ok());
    }
}
