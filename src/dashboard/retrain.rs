//! Retrain view: preprocess datasets and train a model on them

use log::info;

use crate::api::types::{
    method_config, Hyperparameters, MethodConfig, ProcessedData, RetrainRequest, RetrainResponse,
    METHODS,
};
use crate::api::{Backend, DEFAULT_PROCESS_OPTION};
use crate::dashboard::toggle_selection;

/// State of the retrain view
#[derive(Debug)]
pub struct RetrainPage {
    csvs: Vec<String>,
    selected: Vec<String>,
    method: &'static MethodConfig,
    hyperparameters: Hyperparameters,
    processed: Option<ProcessedData>,
    result: Option<RetrainResponse>,
    error: Option<String>,
}

impl Default for RetrainPage {
    fn default() -> Self {
        Self {
            csvs: Vec::new(),
            selected: Vec::new(),
            method: &METHODS[0],
            hyperparameters: Hyperparameters::form_defaults(),
            processed: None,
            result: None,
            error: None,
        }
    }
}

impl RetrainPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn csvs(&self) -> &[String] {
        &self.csvs
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn method(&self) -> &'static MethodConfig {
        self.method
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn processed(&self) -> Option<&ProcessedData> {
        self.processed.as_ref()
    }

    pub fn result(&self) -> Option<&RetrainResponse> {
        self.result.as_ref()
    }

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

    /// Select or deselect a dataset; processed splits no longer match and are dropped
    pub fn toggle_csv(&mut self, name: &str) {
        toggle_selection(&mut self.selected, name);
        self.processed = None;
        self.result = None;
    }

    /// Choose the training method by name
    pub fn select_method(&mut self, name: &str) -> bool {
        match method_config(name) {
            Some(method) => {
                self.method = method;
                true
            }
            None => {
                self.error = Some(format!("Unknown training method: {}", name));
                false
            }
        }
    }

    pub fn set_n_estimators(&mut self, value: Option<u32>) {
        self.hyperparameters.n_estimators = value;
    }

    pub fn set_max_depth(&mut self, value: Option<u32>) {
        self.hyperparameters.max_depth = value;
    }

    pub fn set_learning_rate(&mut self, value: Option<f64>) {
        self.hyperparameters.learning_rate = value.filter(|v| v.is_finite());
    }

    /// Preprocess the selected datasets into train/test splits
    pub fn process<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        if self.selected.is_empty() {
            self.error = Some("Please select at least one dataset.".to_string());
            return false;
        }

        self.error = None;
        self.processed = None;
        self.result = None;
        match backend.process_csv(&self.selected, DEFAULT_PROCESS_OPTION) {
            Ok(response) => {
                info!("Processed {} datasets: {}", self.selected.len(), response.message);
                self.processed = Some(response.data);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Training request for the current selection, once data is processed
    pub fn build_request(&self) -> Option<RetrainRequest> {
        let data = self.processed.as_ref()?;
        Some(RetrainRequest {
            file_train: data.train_filename.clone()?,
            file_test: data.test_filename.clone()?,
            scaler_path: data.scaler_path.clone()?,
            method: self.method.name.to_string(),
            hyperparameters: self.hyperparameters,
        })
    }

    /// Train the selected method on the processed splits
    pub fn retrain<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        let Some(request) = self.build_request() else {
            self.error = Some("Data not processed yet. Please process datasets first.".to_string());
            return false;
        };

        self.error = None;
        self.result = None;
        match backend.retrain(&request) {
            Ok(response) => {
                self.result = Some(response);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
