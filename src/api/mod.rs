//! Client side of the exoplanet ML/data backend
//!
//! This module provides a blocking HTTP client for the backend REST API, the
//! typed request and response payloads, and the normalization of the
//! loosely-shaped metric payloads the backend returns.

mod backend;
mod client;
mod error;
pub mod metrics;
pub mod payload;
pub mod types;

pub use backend::Backend;
pub use client::{ApiClient, DEFAULT_PROCESS_OPTION};
pub use error::{ApiError, BODY_SNIPPET_LEN};
pub use metrics::{ClassificationReport, ConfusionMatrix};
pub use types::{
    method_config, ConnectionStatus, HostSystem, Hyperparameters, InferenceReport,
    InferenceRequest, LightCurve, MethodConfig, ModelCatalog, ProcessResponse, RetrainRequest,
    RetrainResponse, UploadResponse, METHODS,
};
