//! Orbit scene model for the system visualizer

pub mod body;
pub mod composer;
pub mod session;

pub use body::{default_bodies, CelestialBody, Color};
pub use composer::{
    Frame, OrbitPath, PlanetDirective, RenderDirective, SceneComposer, StarDirective,
    TrailDirective,
};
pub use session::{RequestTicket, Resolution, SessionState, VisualizationSession};
