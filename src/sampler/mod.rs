//! Spherical shell sampler for star fields
//!
//! This module scatters points around the scene origin with directions
//! distributed uniformly over the sphere. It backs the static background
//! star field of the system visualizer and the host-star map of the overview
//! scene. Samples are drawn once per scene from a seeded generator so a scene
//! can be rebuilt identically.
//!
//! Radii are drawn uniformly between the inner and outer shell radius. This
//! gives an even-looking field rather than a physically uniform volume
//! density, which would push most stars toward the outer shell.

use nalgebra::Point3;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::f64::consts::PI;

use crate::{ExoscopeError, Result};

/// A static point of a star field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarFieldPoint {
    /// Position in scene units
    pub position: Point3<f64>,
    /// Render radius
    pub radius: f64,
}

/// Render size model for sampled stars
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StarSize {
    /// Every star has the same size
    Fixed(f64),
    /// Sizes drawn uniformly from `[min, max)`
    Range { min: f64, max: f64 },
}

/// Configuration for sampling points in a spherical shell
#[derive(Debug, Clone)]
pub struct ShellSamplerConfig {
    /// Number of points to generate
    pub count: usize,
    /// Inner radius of the shell
    pub min_radius: f64,
    /// Outer radius of the shell
    pub max_radius: f64,
    /// Render size of each point
    pub size: StarSize,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for ShellSamplerConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min_radius: 50.0,
            max_radius: 200.0,
            size: StarSize::Fixed(0.01),
            seed: 42,
        }
    }
}

impl ShellSamplerConfig {
    /// Create a new sampler configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of points to generate
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the inner and outer shell radius
    pub fn with_radius_range(mut self, min: f64, max: f64) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Set the render size model
    pub fn with_size(mut self, size: StarSize) -> Self {
        self.size = size;
        self
    }

    /// Set the random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        let radii_ok = self.min_radius.is_finite()
            && self.max_radius.is_finite()
            && self.min_radius >= 0.0
            && self.min_radius <= self.max_radius;
        if !radii_ok {
            return Err(ExoscopeError::InvalidParameter(format!(
                "invalid shell radius range [{}, {}]",
                self.min_radius, self.max_radius
            )));
        }

        let size_ok = match self.size {
            StarSize::Fixed(size) => size.is_finite() && size > 0.0,
            StarSize::Range { min, max } => {
                min.is_finite() && max.is_finite() && min > 0.0 && min < max
            }
        };
        if !size_ok {
            return Err(ExoscopeError::InvalidParameter(format!(
                "invalid star size {:?}",
                self.size
            )));
        }

        Ok(())
    }

    /// Sample the configured number of points
    pub fn generate(&self) -> Result<Vec<StarFieldPoint>> {
        self.validate()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let unit = Uniform::from(0.0..1.0);

        let points = (0..self.count)
            .map(|_| {
                let u: f64 = unit.sample(&mut rng);
                let r = self.min_radius + u * (self.max_radius - self.min_radius);
                let direction = random_direction(&mut rng, &unit);
                let radius = match self.size {
                    StarSize::Fixed(size) => size,
                    StarSize::Range { min, max } => min + unit.sample(&mut rng) * (max - min),
                };

                StarFieldPoint {
                    position: Point3::from(direction * r),
                    radius,
                }
            })
            .collect();

        Ok(points)
    }
}

/// Draw a unit vector uniformly distributed over the sphere
///
/// Uses `θ = 2πU`, `φ = acos(2U - 1)`, which needs no rejection step.
fn random_direction(rng: &mut StdRng, unit: &Uniform<f64>) -> nalgebra::Vector3<f64> {
    let theta = unit.sample(rng) * 2.0 * PI;
    let phi = (2.0 * unit.sample(rng) - 1.0).acos();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    nalgebra::Vector3::new(sin_phi * cos_theta, sin_phi * sin_theta, cos_phi)
}

/// Background stars of the system visualizer
pub fn background_star_field(seed: u64) -> Result<Vec<StarFieldPoint>> {
    ShellSamplerConfig::new()
        .with_count(1000)
        .with_radius_range(50.0, 200.0)
        .with_size(StarSize::Fixed(0.01))
        .with_seed(seed)
        .generate()
}

/// Host stars scattered around the observer in the overview scene
pub fn host_star_map(seed: u64) -> Result<Vec<StarFieldPoint>> {
    ShellSamplerConfig::new()
        .with_count(5000)
        .with_radius_range(10.0, 150.0)
        .with_size(StarSize::Range {
            min: 0.05,
            max: 0.20,
        })
        .with_seed(seed)
        .generate()
}
