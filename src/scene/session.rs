//! Visualization session: one host system on screen
//!
//! The session owns the only mutable state of the visualizer (the body list
//! and the playback rate) and exposes it read-only to the frame loop. The
//! body list is resolved from the backend asynchronously; until then, and if
//! the lookup fails or returns no planets, the default system keeps animating.
//!
//! Every lookup is tagged with a [`RequestTicket`]. Only the answer to the
//! most recently issued ticket is applied, so a slow response to an older
//! query can never overwrite a newer one.

use log::{info, warn};

use crate::api::types::HostSystem;
use crate::api::{ApiError, Backend};
use crate::orbit::PlaybackRate;
use crate::scene::body::{
    bodies_from_rows, default_bodies, fallback_label, system_name_from_rows, DEFAULT_SYSTEM_NAME,
};
use crate::scene::composer::{Frame, SceneComposer};

/// Sequence number of a body-list lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of a visualization session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the backend; the default system is shown
    Loading,
    /// The backend answered and its bodies are shown
    Ready { system_name: String },
    /// The backend failed; a placeholder name is shown over the held bodies
    Fallback { label: String },
}

/// Outcome of handing a response to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The response belonged to a superseded request and was dropped
    Stale,
}

/// State of one visualizer page
#[derive(Debug)]
pub struct VisualizationSession {
    host_id: String,
    state: SessionState,
    composer: SceneComposer,
    rate: PlaybackRate,
    issued: u64,
}

impl VisualizationSession {
    /// Start a session for a host, showing the default system
    pub fn new(host_id: impl Into<String>) -> Self {
        Self {
            host_id: host_id.into(),
            state: SessionState::Loading,
            composer: SceneComposer::new(DEFAULT_SYSTEM_NAME, default_bodies()),
            rate: PlaybackRate::default(),
            issued: 0,
        }
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    /// Name shown for the system in its current state
    pub fn system_name(&self) -> &str {
        match &self.state {
            SessionState::Fallback { label } => label,
            _ => self.composer.system_name(),
        }
    }

    pub fn planet_count(&self) -> usize {
        self.composer.bodies().len()
    }

    /// One-line description such as "3 planets orbiting"
    pub fn summary(&self) -> String {
        let count = self.planet_count();
        let noun = if count == 1 { "planet" } else { "planets" };
        format!("{} {} orbiting", count, noun)
    }

    /// Set the shared playback rate
    pub fn set_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
    }

    /// Point the session at another host and return its lookup ticket
    ///
    /// The session goes back to `Loading` with the default system on screen.
    /// Any lookup still in flight for the previous host is superseded.
    pub fn switch_host(&mut self, host_id: impl Into<String>) -> RequestTicket {
        self.host_id = host_id.into();
        self.state = SessionState::Loading;
        self.composer.set_bodies(DEFAULT_SYSTEM_NAME, default_bodies());
        self.begin_fetch()
    }

    /// Issue a ticket for a new body-list lookup
    pub fn begin_fetch(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Whether `ticket` is the most recently issued lookup
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply the backend's answer for `ticket`
    pub fn resolve(
        &mut self,
        ticket: RequestTicket,
        response: Result<HostSystem, ApiError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            warn!(
                "Discarding stale response #{} (latest is #{})",
                ticket.0, self.issued
            );
            return Resolution::Stale;
        }

        match response {
            Ok(system) => {
                let system_name = system_name_from_rows(&system.data)
                    .unwrap_or_else(|| fallback_label(&self.host_id));

                if system.data.is_empty() || system.total_rows == 0 {
                    info!("No planets returned for {}, showing default bodies", system_name);
                    self.composer.set_bodies(system_name.clone(), default_bodies());
                } else {
                    let bodies = bodies_from_rows(&system_name, &system.data);
                    info!("Loaded {} planets for {}", bodies.len(), system_name);
                    self.composer.set_bodies(system_name.clone(), bodies);
                }

                self.state = SessionState::Ready { system_name };
            }
            Err(err) => {
                let label = fallback_label(&self.host_id);
                warn!("Failed to load system {}: {}", self.host_id, err);
                self.composer.set_bodies(DEFAULT_SYSTEM_NAME, default_bodies());
                self.state = SessionState::Fallback { label };
            }
        }

        Resolution::Applied
    }

    /// Fetch and apply the body list synchronously
    pub fn load<B: Backend + ?Sized>(&mut self, backend: &B) -> Resolution {
        let ticket = self.begin_fetch();
        let response = backend.find_by_hostname(&self.host_id);
        self.resolve(ticket, response)
    }

    /// Compose the frame at `elapsed` seconds with the session's rate
    pub fn frame(&self, elapsed: f64) -> Frame<'_> {
        let mut frame = self.composer.compose(elapsed, self.rate);
        frame.star.label = self.system_name().to_string();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system(value: serde_json::Value) -> HostSystem {
        serde_json::from_value(value).unwrap()
    }

    fn kepler_11() -> HostSystem {
        system(json!({
            "hostname": "Kepler-11",
            "kepid": 6541920,
            "total_rows": 2,
            "data": [
                {"Host Name": "Kepler-11", "kepler_name": "Kepler-11 b", "koi_period": 10.3},
                {"Host Name": "Kepler-11", "kepler_name": "Kepler-11 c", "koi_period": 13.0}
            ]
        }))
    }

    #[test]
    fn test_loading_renders_defaults() {
        let session = VisualizationSession::new("6541920");
        assert_eq!(session.state(), &SessionState::Loading);
        assert_eq!(session.system_name(), DEFAULT_SYSTEM_NAME);
        assert_eq!(session.frame(1.0).planets.len(), 3);
        assert_eq!(session.summary(), "3 planets orbiting");
    }

    #[test]
    fn test_ready_after_success() {
        let mut session = VisualizationSession::new("6541920");
        let ticket = session.begin_fetch();
        assert_eq!(session.resolve(ticket, Ok(kepler_11())), Resolution::Applied);

        assert_eq!(
            session.state(),
            &SessionState::Ready {
                system_name: "Kepler-11".to_string()
            }
        );
        assert_eq!(session.planet_count(), 2);
        assert_eq!(session.frame(0.0).star.label, "Kepler-11");
    }

    #[test]
    fn test_fallback_keeps_rendering() {
        let mut session = VisualizationSession::new("4242");
        let ticket = session.begin_fetch();
        let err = ApiError::Unreachable {
            url: "http://localhost:8000".to_string(),
        };
        session.resolve(ticket, Err(err));

        assert_eq!(
            session.state(),
            &SessionState::Fallback {
                label: "Kepler-4242".to_string()
            }
        );
        let frame = session.frame(2.0);
        assert_eq!(frame.star.label, "Kepler-4242");
        assert_eq!(frame.planets.len(), 3);
    }

    #[test]
    fn test_empty_rows_keep_default_bodies() {
        let mut session = VisualizationSession::new("77");
        let ticket = session.begin_fetch();
        let empty = system(json!({"hostname": "x", "kepid": 77, "total_rows": 0, "data": []}));
        session.resolve(ticket, Ok(empty));

        assert_eq!(
            session.state(),
            &SessionState::Ready {
                system_name: "Kepler-77".to_string()
            }
        );
        assert_eq!(session.planet_count(), 3);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut session = VisualizationSession::new("Kepler-11");
        let first = session.begin_fetch();
        let second = session.switch_host("4242");

        // Newer request answers first, older one arrives late
        session.resolve(second, Err(ApiError::Unreachable { url: "u".into() }));
        assert_eq!(session.resolve(first, Ok(kepler_11())), Resolution::Stale);

        assert_eq!(session.system_name(), "Kepler-4242");
        assert_eq!(session.planet_count(), 3);
        assert!(session.is_current(second));
        assert!(!session.is_current(first));
        assert!(second > first);
    }

    #[test]
    fn test_switch_host_drops_previous_planets() {
        let mut session = VisualizationSession::new("Kepler-11");
        let ticket = session.begin_fetch();
        session.resolve(ticket, Ok(kepler_11()));
        assert_eq!(session.planet_count(), 2);

        let ticket = session.switch_host("4242");
        assert_eq!(session.state(), &SessionState::Loading);
        assert_eq!(session.system_name(), DEFAULT_SYSTEM_NAME);

        session.resolve(ticket, Err(ApiError::Unreachable { url: "u".into() }));
        let frame = session.frame(0.5);
        let labels: Vec<&str> = frame.planets.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Kepler-228 b", "Kepler-228 c", "Kepler-228 d"]);
        assert_eq!(frame.star.label, "Kepler-4242");
    }

    #[test]
    fn test_failed_reload_restores_defaults() {
        let mut session = VisualizationSession::new("Kepler-11");
        let ticket = session.begin_fetch();
        session.resolve(ticket, Ok(kepler_11()));

        let ticket = session.begin_fetch();
        let empty = system(json!({"hostname": "Kepler-11", "total_rows": 0, "data": []}));
        session.resolve(ticket, Ok(empty));
        assert_eq!(session.composer().bodies(), default_bodies().as_slice());

        session.resolve(ticket, Ok(kepler_11()));
        let ticket = session.begin_fetch();
        session.resolve(ticket, Err(ApiError::Unreachable { url: "u".into() }));
        assert_eq!(session.composer().bodies(), default_bodies().as_slice());
    }

    #[test]
    fn test_rate_is_shared() {
        let mut session = VisualizationSession::new("1");
        session.set_rate(PlaybackRate::frozen());
        let a = session.frame(1.0);
        let b = session.frame(100.0);
        for (pa, pb) in a.planets.iter().zip(&b.planets) {
            assert_eq!(pa.angle, pb.angle);
        }
    }
}
