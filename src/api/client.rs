//! Blocking HTTP client for the exoplanet ML/data backend
//!
//! Every call follows one policy: a non-success status is turned into
//! [`ApiError::Status`] carrying the body text, a connection failure into
//! [`ApiError::Unreachable`], and an unparseable body into
//! [`ApiError::Decode`]. Nothing is retried.

use chrono::Utc;
use log::{debug, warn};
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::path::Path;

use super::backend::Backend;
use super::error::{file_err, ApiError};
use super::payload::{decode_json, decode_lenient};
use super::types::{
    ConnectionState, ConnectionStatus, HostSystem, HostnamesResponse, InferenceReport,
    InferenceRequest, LightCurve, ModelCatalog, ProcessResponse, RetrainRequest, RetrainResponse,
    UploadResponse,
};
use crate::config::Config;

/// Preprocessing option sent when the caller has no preference
pub const DEFAULT_PROCESS_OPTION: &str = "string";

/// Client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base: config.api_base_url.clone(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL from path segments, percent-encoding each
    ///
    /// An empty final segment produces a trailing slash, which some backend
    /// routes require.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the body of a successful response as text
    fn send_text(&self, url: &Url, request: RequestBuilder) -> Result<String, ApiError> {
        debug!("Making API request to: {}", url);

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                warn!("Backend unreachable at {}: {}", url, e);
                ApiError::Unreachable {
                    url: url.to_string(),
                }
            } else {
                warn!("API request failed for {}: {}", url, e);
                ApiError::Request(e)
            }
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text()?;
        if !status.is_success() {
            warn!("HTTP error response from {}: {} {}", url, status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_text(url, request)?;
        decode_json(&body)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        self.send_json(&url, self.client.get(url.clone()))
    }

    /// Check whether the backend answers, without raising an error
    pub fn test_connection(&self) -> ConnectionStatus {
        let timestamp = Utc::now();
        let url = match self.endpoint(&["visualization", "hostnames"]) {
            Ok(url) => url,
            Err(_) => {
                return ConnectionStatus {
                    status: ConnectionState::Failed,
                    url: self.base.to_string(),
                    timestamp,
                }
            }
        };

        debug!("Testing connection to: {}", url);
        let status = match self.client.get(url.clone()).send() {
            Ok(response) if response.status().is_success() => ConnectionState::Success,
            Ok(response) => ConnectionState::HttpError(response.status().as_u16()),
            Err(e) => {
                warn!("Connection test failed: {}", e);
                ConnectionState::Failed
            }
        };

        ConnectionStatus {
            status,
            url: url.to_string(),
            timestamp,
        }
    }
}

impl Backend for ApiClient {
    fn list_csvs(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(&["data", "current_csvs"])
    }

    fn list_models(&self) -> Result<ModelCatalog, ApiError> {
        let url = self.endpoint(&["data", "current_models"])?;
        let body = self.send_text(&url, self.client.get(url.clone()))?;
        decode_lenient(&body)
    }

    fn upload_csv(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint(&["data", "upload_csv", ""])?;
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|e| file_err(path, e))?;
        self.send_json(&url, self.client.post(url.clone()).multipart(form))
    }

    fn process_csv(&self, filenames: &[String], option: &str) -> Result<ProcessResponse, ApiError> {
        let url = self.endpoint(&["data", "process_csv", ""])?;
        let mut fields: Vec<(&str, &str)> = filenames
            .iter()
            .map(|name| ("filenames", name.as_str()))
            .collect();
        fields.push(("option", option));
        self.send_json(&url, self.client.post(url.clone()).form(&fields))
    }

    fn retrain(&self, request: &RetrainRequest) -> Result<RetrainResponse, ApiError> {
        let url = self.endpoint(&["train", "retrain", ""])?;
        let fields = request.form_fields();
        self.send_json(&url, self.client.post(url.clone()).form(&fields))
    }

    fn run_inference(&self, request: &InferenceRequest) -> Result<InferenceReport, ApiError> {
        let url = self.endpoint(&["ml", "inference", ""])?;
        let query = request.query_pairs();
        self.send_json(&url, self.client.post(url.clone()).query(&query))
    }

    fn hostnames(&self) -> Result<Vec<String>, ApiError> {
        let response: HostnamesResponse = self.get_json(&["visualization", "hostnames"])?;
        Ok(response.hostnames)
    }

    fn find_by_hostname(&self, hostname: &str) -> Result<HostSystem, ApiError> {
        self.get_json(&["visualization", "find_by_hostname", hostname])
    }

    fn lightcurve(&self, star_id: &str, tce_num: &str) -> Result<LightCurve, ApiError> {
        self.get_json(&["visualization", "lightcurve", star_id, tce_num])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = Config::default().with_api_url(base).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.endpoint(&["data", "current_csvs"]).unwrap().as_str(),
            "http://localhost:8000/data/current_csvs"
        );
        assert_eq!(
            api.endpoint(&["data", "upload_csv", ""]).unwrap().as_str(),
            "http://localhost:8000/data/upload_csv/"
        );
    }

    #[test]
    fn test_endpoint_under_prefix() {
        let api = client("https://exo.example.org/api/");
        assert_eq!(
            api.endpoint(&["ml", "inference", ""]).unwrap().as_str(),
            "https://exo.example.org/api/ml/inference/"
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let api = client("http://localhost:8000");
        let url = api
            .endpoint(&["visualization", "find_by_hostname", "Kepler-11 / b?"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/visualization/find_by_hostname/Kepler-11%20%2F%20b%3F"
        );
    }

    #[test]
    fn test_missing_upload_file() {
        let api = client("http://localhost:8000");
        let err = api
            .upload_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
    }
}
