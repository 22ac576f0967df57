//! # Orbital Plane Geometry
//!
//! Circle parametrization for bodies moving on circular orbits around the
//! scene origin.
//!
//! ## Coordinate System Convention
//!
//! The scene uses the render-engine convention of a Y-up world:
//! - **X-axis**: Angle zero of every orbit
//! - **Y-axis**: Up, normal to the orbital plane
//! - **Z-axis**: Angle π/2 of every orbit
//!
//! Every orbit lies in the `y = 0` plane, so a point on an orbit of radius `r`
//! at angle `θ` is `(r·cos θ, 0, r·sin θ)`.
//!
//! ## Examples
//!
//! ```rust
//! use exoscope::geometry::circle_point;
//! use std::f64::consts::PI;
//!
//! let p = circle_point(2.0, PI / 2.0);
//! assert!(p.x.abs() < 1e-12);
//! assert_eq!(p.y, 0.0);
//! assert!((p.z - 2.0).abs() < 1e-12);
//! ```

use nalgebra::Point3;
use std::f64::consts::PI;

/// Number of segments used to draw a static orbit ring
pub const ORBIT_PATH_SEGMENTS: usize = 64;

/// Maps an orbital radius and angle to a point in the orbital plane
///
/// The angle is in radians and may be any real value; the result is periodic
/// in `2π`. A radius of zero maps every angle to the origin.
pub fn circle_point(radius: f64, angle: f64) -> Point3<f64> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(radius * cos, 0.0, radius * sin)
}

/// Samples a closed ring of the given radius
///
/// Returns `segments + 1` points at angles `2π·i/segments` for
/// `i = 0..=segments`. The first and last points coincide so a line strip
/// drawn through them closes the loop.
pub fn ring_path(radius: f64, segments: usize) -> Vec<Point3<f64>> {
    if segments == 0 {
        return vec![circle_point(radius, 0.0)];
    }

    (0..=segments)
        .map(|i| {
            let angle = (i as f64 / segments as f64) * 2.0 * PI;
            circle_point(radius, angle)
        })
        .collect()
}
