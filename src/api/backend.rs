//! The backend as seen by the dashboard controllers

use std::path::Path;

use super::error::ApiError;
use super::types::{
    HostSystem, InferenceReport, InferenceRequest, LightCurve, ModelCatalog, ProcessResponse,
    RetrainRequest, RetrainResponse, UploadResponse,
};

/// Operations the exoplanet ML/data service offers
///
/// [`ApiClient`](super::ApiClient) implements this over HTTP; controllers
/// only depend on the trait.
pub trait Backend {
    /// Dataset filenames known to the backend
    fn list_csvs(&self) -> Result<Vec<String>, ApiError>;

    /// Trained models grouped by method
    fn list_models(&self) -> Result<ModelCatalog, ApiError>;

    /// Upload a local CSV file
    fn upload_csv(&self, path: &Path) -> Result<UploadResponse, ApiError>;

    /// Preprocess datasets into train/test splits
    fn process_csv(&self, filenames: &[String], option: &str) -> Result<ProcessResponse, ApiError>;

    /// Train a model on processed splits
    fn retrain(&self, request: &RetrainRequest) -> Result<RetrainResponse, ApiError>;

    /// Evaluate a trained model on datasets
    fn run_inference(&self, request: &InferenceRequest) -> Result<InferenceReport, ApiError>;

    /// Host star names available to the visualizer
    fn hostnames(&self) -> Result<Vec<String>, ApiError>;

    /// Catalog rows for every planet of a host
    fn find_by_hostname(&self, hostname: &str) -> Result<HostSystem, ApiError>;

    /// Light curve of one threshold-crossing event
    fn lightcurve(&self, star_id: &str, tce_num: &str) -> Result<LightCurve, ApiError>;
}
