//! Scene composer: turns a body list and a playback rate into render directives
//!
//! The composer knows nothing about the network or the render engine. It is
//! handed already-resolved bodies and, for every frame, emits a [`Frame`]
//! describing where the star, rings, planets and trails should be drawn.

use nalgebra::Point3;
use serde::Serialize;

use crate::geometry::{ring_path, ORBIT_PATH_SEGMENTS};
use crate::orbit::{orbit_angle, spin_angle, OrbitSample, PlaybackRate, TrailSpec};
use crate::scene::body::{CelestialBody, Color};

/// Render radius of the central star
pub const STAR_RADIUS: f64 = 0.5;
/// Display color of the central star
pub const STAR_COLOR: &str = "#ffeb3b";
/// Star self-rotation in rad/s at a playback rate of one
pub const STAR_SPIN_RATE: f64 = 0.3;
/// Planet self-rotation in rad/s at a playback rate of one
pub const PLANET_SPIN_RATE: f64 = 0.6;
/// Display color of the static orbit rings
pub const RING_COLOR: &str = "#666666";

const STAR_LABEL_OFFSET: f64 = -0.8;
const PLANET_LABEL_HEIGHT: f64 = 0.2;

/// The central star of the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarDirective {
    pub position: Point3<f64>,
    pub radius: f64,
    pub color: Color,
    /// Self-rotation about the Y axis, radians
    pub spin: f64,
    pub label: String,
    pub label_position: Point3<f64>,
}

/// Static ring showing a body's orbit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitPath {
    pub radius: f64,
    pub color: Color,
    /// Closed line strip, first point repeated at the end
    pub points: Vec<Point3<f64>>,
}

/// A planet at its current orbital position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetDirective {
    pub angle: f64,
    pub position: Point3<f64>,
    pub radius: f64,
    pub color: Color,
    pub spin: f64,
    pub label: String,
    pub label_position: Point3<f64>,
}

/// Arc drawn behind a planet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailDirective {
    pub color: Color,
    pub samples: Vec<OrbitSample>,
}

/// A single thing for the renderer to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderDirective<'a> {
    Star(&'a StarDirective),
    OrbitPath(&'a OrbitPath),
    Planet(&'a PlanetDirective),
    Trail(&'a TrailDirective),
}

/// Everything needed to draw one frame of the scene
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// Elapsed scene time of this frame, seconds
    pub elapsed: f64,
    pub rate: PlaybackRate,
    pub star: StarDirective,
    pub orbits: &'a [OrbitPath],
    pub planets: Vec<PlanetDirective>,
    pub trails: Vec<TrailDirective>,
}

impl<'a> Frame<'a> {
    /// Flatten the frame into draw order: star, rings, planets, trails
    pub fn directives(&self) -> Vec<RenderDirective<'_>> {
        let mut directives =
            Vec::with_capacity(1 + self.orbits.len() + self.planets.len() + self.trails.len());
        directives.push(RenderDirective::Star(&self.star));
        directives.extend(self.orbits.iter().map(RenderDirective::OrbitPath));
        directives.extend(self.planets.iter().map(RenderDirective::Planet));
        directives.extend(self.trails.iter().map(RenderDirective::Trail));
        directives
    }
}

/// Composes frames for one star and its planets
#[derive(Debug, Clone)]
pub struct SceneComposer {
    system_name: String,
    bodies: Vec<CelestialBody>,
    orbits: Vec<OrbitPath>,
    trail: TrailSpec,
}

impl SceneComposer {
    /// Create a composer with the default trail shape
    pub fn new(system_name: impl Into<String>, bodies: Vec<CelestialBody>) -> Self {
        Self::with_trail(system_name, bodies, TrailSpec::default())
    }

    /// Create a composer with a custom trail shape
    pub fn with_trail(
        system_name: impl Into<String>,
        bodies: Vec<CelestialBody>,
        trail: TrailSpec,
    ) -> Self {
        let orbits = orbit_paths(&bodies);
        Self {
            system_name: system_name.into(),
            bodies,
            orbits,
            trail,
        }
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn trail(&self) -> TrailSpec {
        self.trail
    }

    /// Replace the body list; orbit rings are rebuilt here and only here
    pub fn set_bodies(&mut self, system_name: impl Into<String>, bodies: Vec<CelestialBody>) {
        self.system_name = system_name.into();
        self.orbits = orbit_paths(&bodies);
        self.bodies = bodies;
    }

    /// Compose the frame at `elapsed` seconds and playback `rate`
    pub fn compose(&self, elapsed: f64, rate: PlaybackRate) -> Frame<'_> {
        let star = StarDirective {
            position: Point3::origin(),
            radius: STAR_RADIUS,
            color: Color::new(STAR_COLOR),
            spin: spin_angle(elapsed, STAR_SPIN_RATE, rate),
            label: self.system_name.clone(),
            label_position: Point3::new(0.0, STAR_LABEL_OFFSET, 0.0),
        };

        let mut planets = Vec::with_capacity(self.bodies.len());
        let mut trails = Vec::with_capacity(self.bodies.len());

        for body in &self.bodies {
            let angle = orbit_angle(elapsed, body.angular_speed, rate);
            let current = OrbitSample::at(body.distance, angle);

            planets.push(PlanetDirective {
                angle,
                position: current.position,
                radius: body.visual_size,
                color: body.color.clone(),
                spin: spin_angle(elapsed, PLANET_SPIN_RATE, rate),
                label: body.label.clone(),
                label_position: Point3::new(
                    current.position.x,
                    PLANET_LABEL_HEIGHT,
                    current.position.z,
                ),
            });

            trails.push(TrailDirective {
                color: body.color.clone(),
                samples: self.trail.generate(angle, body.distance),
            });
        }

        Frame {
            elapsed,
            rate,
            star,
            orbits: &self.orbits,
            planets,
            trails,
        }
    }
}

fn orbit_paths(bodies: &[CelestialBody]) -> Vec<OrbitPath> {
    bodies
        .iter()
        .map(|body| OrbitPath {
            radius: body.distance,
            color: Color::new(RING_COLOR),
            points: ring_path(body.distance, ORBIT_PATH_SEGMENTS),
        })
        .collect()
}
