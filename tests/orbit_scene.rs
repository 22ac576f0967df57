//! Properties of the orbit scene model

use approx::assert_relative_eq;
use rstest::rstest;
use std::f64::consts::PI;

use exoscope::api::types::HostSystem;
use exoscope::geometry::{circle_point, ring_path, ORBIT_PATH_SEGMENTS};
use exoscope::orbit::{spin_angle, TrailSpec};
use exoscope::sampler::{host_star_map, ShellSamplerConfig};
use exoscope::scene::{RenderDirective, Resolution, SessionState};
use exoscope::{orbit_angle, CelestialBody, PlaybackRate, SceneComposer, VisualizationSession};

#[rstest]
#[case(1.0, 0.0)]
#[case(2.5, PI / 3.0)]
#[case(0.8, -7.0 * PI / 4.0)]
#[case(150.0, 1234.5)]
fn test_circle_stays_on_orbit(#[case] radius: f64, #[case] angle: f64) {
    let p = circle_point(radius, angle);
    assert_eq!(p.y, 0.0);
    assert_relative_eq!(p.x * p.x + p.z * p.z, radius * radius, max_relative = 1e-12);
}

#[test]
fn test_angle_is_a_pure_function_of_time() {
    let rate = PlaybackRate::new(2.0);
    let first = orbit_angle(3.7, 0.9, rate);
    let again = orbit_angle(3.7, 0.9, rate);
    assert_eq!(first, again);
    assert_relative_eq!(first, 3.7 * 0.9 * 2.0);
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(1e6)]
fn test_zero_rate_freezes_motion(#[case] elapsed: f64) {
    let frozen = PlaybackRate::frozen();
    assert_eq!(orbit_angle(elapsed, 3.0, frozen), 0.0);
    assert_eq!(spin_angle(elapsed, 0.6, frozen), 0.0);
}

#[rstest]
#[case(PI / 2.0, 20)]
#[case(PI, 2)]
#[case(0.3, 7)]
fn test_trail_shape(#[case] span: f64, #[case] points: usize) {
    let trail = TrailSpec::new(span, points).unwrap();
    let samples = trail.generate(1.0, 2.0);

    assert_eq!(samples.len(), points);
    assert_relative_eq!(samples[0].angle, 1.0);
    for pair in samples.windows(2) {
        assert_relative_eq!(pair[0].angle - pair[1].angle, span / (points - 1) as f64, epsilon = 1e-12);
    }
    assert_relative_eq!(samples[points - 1].angle, 1.0 - span, epsilon = 1e-12);
}

#[test]
fn test_sampler_bounds_and_balance() {
    let stars = ShellSamplerConfig::new()
        .with_count(10_000)
        .with_radius_range(10.0, 150.0)
        .with_seed(7)
        .generate()
        .unwrap();

    let mut mean = nalgebra::Vector3::zeros();
    for star in &stars {
        let r = star.position.coords.norm();
        assert!((10.0..=150.0).contains(&r), "radius {} out of range", r);
        mean += star.position.coords / r;
    }
    mean /= stars.len() as f64;
    assert!(mean.norm() < 0.05, "direction bias {}", mean.norm());

    assert_eq!(host_star_map(7).unwrap().len(), 5000);
}

#[test]
fn test_empty_scene() {
    let composer = SceneComposer::new("Lonely", Vec::new());
    let frame = composer.compose(10.0, PlaybackRate::default());
    let directives = frame.directives();

    assert_eq!(directives.len(), 1);
    assert!(matches!(directives[0], RenderDirective::Star(_)));
    assert!(frame.planets.is_empty());
}

#[test]
fn test_quarter_orbit() {
    let body = CelestialBody::new(1.0, 2.0 * PI, 0.05, "#e17055", "b").unwrap();
    let composer = SceneComposer::new("Test", vec![body]);
    let frame = composer.compose(0.25, PlaybackRate::new(1.0));
    let p = frame.planets[0].position;

    assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    assert_eq!(frame.orbits[0].points.len(), ORBIT_PATH_SEGMENTS + 1);
    assert_eq!(frame.orbits[0].points, ring_path(1.0, ORBIT_PATH_SEGMENTS));
}

#[test]
fn test_host_switch_discards_earlier_answer() {
    let system = |name: &str, rows: usize| -> HostSystem {
        serde_json::from_value(serde_json::json!({
            "hostname": name,
            "total_rows": rows,
            "data": (0..rows)
                .map(|_| serde_json::json!({"Host Name": name, "koi_period": 5.0}))
                .collect::<Vec<_>>()
        }))
        .unwrap()
    };

    let mut session = VisualizationSession::new("Kepler-11");
    let first = session.begin_fetch();
    let second = session.switch_host("Kepler-90");

    assert_eq!(session.resolve(second, Ok(system("Kepler-90", 8))), Resolution::Applied);
    assert_eq!(session.resolve(first, Ok(system("Kepler-11", 6))), Resolution::Stale);

    assert_eq!(session.planet_count(), 8);
    assert_eq!(
        session.state(),
        &SessionState::Ready {
            system_name: "Kepler-90".to_string()
        }
    );
}
