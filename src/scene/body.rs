//! Celestial bodies of an orbit scene
//!
//! Bodies are built either from the built-in default system or from the rows
//! the backend returns for a host star.

use serde::Serialize;
use serde_json::{Map, Value};
use std::f64::consts::PI;
use std::fmt;

use crate::{ExoscopeError, Result};

/// Name shown while the real system is still loading
pub const DEFAULT_SYSTEM_NAME: &str = "Kepler-228";

/// Palette cycled over the planets of a system
pub const PLANET_PALETTE: [&str; 8] = [
    "#ff6b6b", "#4ecdc4", "#45b7d1", "#f9ca24", "#6c5ce7", "#a29bfe", "#fd79a8", "#00b894",
];

/// Orbital radius of the innermost derived planet
const BASE_DISTANCE: f64 = 1.0;
/// Radial gap between consecutive derived planets
const DISTANCE_STEP: f64 = 0.6;
const MIN_DISTANCE: f64 = 0.5;
const MIN_ANGULAR_SPEED: f64 = 0.5;
const DERIVED_PLANET_SIZE: f64 = 0.05;

/// Opaque display color token, passed through to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A planet orbiting the scene's central star
///
/// Fields are public so scenes can be built from literals. Only
/// [`CelestialBody::new`] checks that the numbers are positive and finite;
/// the composer accepts any values and simply draws what it is given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialBody {
    /// Orbital radius in scene units
    pub distance: f64,
    /// Radians of orbital progress per second before playback scaling
    pub angular_speed: f64,
    /// Render radius
    pub visual_size: f64,
    pub color: Color,
    pub label: String,
}

impl CelestialBody {
    /// Create a body, rejecting non-positive or non-finite parameters
    pub fn new(
        distance: f64,
        angular_speed: f64,
        visual_size: f64,
        color: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self> {
        for (name, value) in [
            ("distance", distance),
            ("angular speed", angular_speed),
            ("visual size", visual_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ExoscopeError::InvalidParameter(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            distance,
            angular_speed,
            visual_size,
            color: Color::new(color),
            label: label.into(),
        })
    }

    /// Orbital period in seconds at a playback rate of one
    pub fn period(&self) -> f64 {
        2.0 * PI / self.angular_speed
    }
}

/// The placeholder system rendered before the backend answers
pub fn default_bodies() -> Vec<CelestialBody> {
    [
        (0.8, 2.0, 0.08, "Kepler-228 b"),
        (1.2, 1.5, 0.12, "Kepler-228 c"),
        (1.8, 1.0, 0.10, "Kepler-228 d"),
    ]
    .into_iter()
    .map(|(distance, angular_speed, visual_size, label)| CelestialBody {
        distance,
        angular_speed,
        visual_size,
        color: Color::new("#4ecdc4"),
        label: label.to_string(),
    })
    .collect()
}

/// Placeholder system name for a host id the backend could not resolve
///
/// Numeric catalog ids are shown as `Kepler-<id>`; anything else is already
/// a readable host name.
pub fn fallback_label(host_id: &str) -> String {
    let trimmed = host_id.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("Kepler-{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// System name from the first returned row, if it carries one
pub fn system_name_from_rows(rows: &[Map<String, Value>]) -> Option<String> {
    rows.first()
        .and_then(|row| row.get("Host Name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Derive one planet per backend row
///
/// Orbits are spaced evenly outward from the star. The angular speed is one
/// orbit per `koi_period` seconds, floored so very long periods still move.
pub fn bodies_from_rows(system_name: &str, rows: &[Map<String, Value>]) -> Vec<CelestialBody> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let distance = (BASE_DISTANCE + index as f64 * DISTANCE_STEP).max(MIN_DISTANCE);

            let angular_speed = numeric_field(row, "koi_period")
                .filter(|period| *period > 0.0)
                .map(|period| 2.0 * PI / period)
                .filter(|speed| speed.is_finite())
                .map_or(MIN_ANGULAR_SPEED, |speed| speed.max(MIN_ANGULAR_SPEED));

            let label = row
                .get("kepler_name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} {}", system_name, planet_letter(index)));

            CelestialBody {
                distance,
                angular_speed,
                visual_size: DERIVED_PLANET_SIZE,
                color: Color::new(PLANET_PALETTE[index % PLANET_PALETTE.len()]),
                label,
            }
        })
        .collect()
}

/// Planet designation letter, starting from `b`
fn planet_letter(index: usize) -> char {
    // 'b' + index, saturating at 'z'
    let offset = index.min(24) as u8;
    (b'b' + offset) as char
}

/// Read a numeric column that may arrive as a JSON number or numeric string
fn numeric_field(row: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}
