//! Datasets view: list, upload and preprocess CSV files

use log::info;
use std::path::Path;

use crate::api::types::{ProcessResponse, UploadResponse};
use crate::api::{Backend, DEFAULT_PROCESS_OPTION};

/// State of the datasets view
#[derive(Debug, Default)]
pub struct DatasetsPage {
    csvs: Vec<String>,
    last_upload: Option<UploadResponse>,
    processed: Option<ProcessResponse>,
    error: Option<String>,
}

impl DatasetsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn csvs(&self) -> &[String] {
        &self.csvs
    }

    pub fn last_upload(&self) -> Option<&UploadResponse> {
        self.last_upload.as_ref()
    }

    pub fn processed(&self) -> Option<&ProcessResponse> {
        self.processed.as_ref()
    }

    /// Current error banner, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload the dataset list
    pub fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        self.error = None;
        match backend.list_csvs() {
            Ok(csvs) => {
                self.csvs = csvs;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Upload a CSV file, then reload the list so it shows up
    pub fn upload<B: Backend + ?Sized>(&mut self, backend: &B, path: &Path) -> bool {
        self.error = None;
        self.last_upload = None;
        match backend.upload_csv(path) {
            Ok(response) => {
                info!("Uploaded {} as {}", path.display(), response.filename);
                self.last_upload = Some(response);
                self.refresh(backend)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Preprocess one dataset
    pub fn process<B: Backend + ?Sized>(&mut self, backend: &B, filename: &str) -> bool {
        self.error = None;
        self.processed = None;
        match backend.process_csv(&[filename.to_string()], DEFAULT_PROCESS_OPTION) {
            Ok(response) => {
                self.processed = Some(response);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
