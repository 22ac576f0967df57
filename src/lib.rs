//! Exoscope: orbit scene model and backend client for an exoplanet dashboard
//!
//! This crate provides the pieces of the exoplanet-detection dashboard that
//! live on the client side: the orbit scene model used by the system
//! visualizer, a typed client for the ML/data backend, and one controller per
//! dashboard view.

use thiserror::Error;

pub mod api;
pub mod config;
pub mod dashboard;
pub mod geometry;
pub mod orbit;
pub mod sampler;
pub mod scene;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, Backend};
pub use config::Config;
pub use orbit::{orbit_angle, OrbitClock, PlaybackRate, TrailSpec};
pub use scene::{CelestialBody, Frame, SceneComposer, VisualizationSession};

/// Main error type for the exoscope library
#[derive(Debug, Error)]
pub enum ExoscopeError {
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for exoscope operations
pub type Result<T> = std::result::Result<T, ExoscopeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_quarter_orbit_example() {
        // One full orbit per second, sampled a quarter of the way round
        let body = CelestialBody::new(1.0, 2.0 * PI, 0.1, "#ffffff", "test body").unwrap();
        let composer = SceneComposer::new("test", vec![body]);

        let frame = composer.compose(0.25, PlaybackRate::new(1.0));
        let planet = &frame.planets[0];

        assert!((planet.angle - PI / 2.0).abs() < 1e-12);
        assert!(planet.position.x.abs() < 1e-12);
        assert_eq!(planet.position.y, 0.0);
        assert!((planet.position.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_error_conversion() {
        let err: ExoscopeError = ApiError::Unreachable {
            url: "http://localhost:8000/data/current_csvs".to_string(),
        }
        .into();
        assert!(err.to_string().contains("Unable to connect"));
    }
}
