//! Models view: browse trained models and evaluate one on datasets

use crate::api::types::{InferenceReport, InferenceRequest, ModelCatalog};
use crate::api::Backend;
use crate::dashboard::toggle_selection;

/// The inference dialog opened on one model
#[derive(Debug, Clone, Default)]
pub struct InferenceDialog {
    pub method: String,
    pub model: String,
    pub selected_csvs: Vec<String>,
    pub report: Option<InferenceReport>,
}

/// State of the models view
#[derive(Debug, Default)]
pub struct ModelsPage {
    models: ModelCatalog,
    csvs: Vec<String>,
    dialog: Option<InferenceDialog>,
    error: Option<String>,
}

impl ModelsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models(&self) -> &ModelCatalog {
        &self.models
    }

    pub fn csvs(&self) -> &[String] {
        &self.csvs
    }

    pub fn dialog(&self) -> Option<&InferenceDialog> {
        self.dialog.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload both the model catalog and the dataset list
    ///
    /// The two lists load independently; a failure of one keeps the other.
    pub fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        self.error = None;
        let mut ok = true;

        match backend.list_models() {
            Ok(models) => self.models = models,
            Err(e) => {
                self.error = Some(e.to_string());
                ok = false;
            }
        }

        match backend.list_csvs() {
            Ok(csvs) => self.csvs = csvs,
            Err(e) => {
                self.error = Some(e.to_string());
                ok = false;
            }
        }

        ok
    }

    /// Open the inference dialog for a model
    pub fn open_inference(&mut self, method: &str, model: &str) {
        self.dialog = Some(InferenceDialog {
            method: method.to_string(),
            model: model.to_string(),
            ..Default::default()
        });
    }

    /// Select or deselect a dataset in the open dialog
    pub fn toggle_csv(&mut self, name: &str) {
        if let Some(dialog) = self.dialog.as_mut() {
            toggle_selection(&mut dialog.selected_csvs, name);
        }
    }

    /// Evaluate the chosen model on the selected datasets
    pub fn run_inference<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        let request = match self.dialog.as_ref() {
            Some(dialog) if !dialog.selected_csvs.is_empty() => InferenceRequest {
                model_type: dialog.method.clone(),
                model_name: dialog.model.clone(),
                csv_names: dialog.selected_csvs.clone(),
            },
            _ => {
                self.error = Some("Choose a model and at least one dataset.".to_string());
                return false;
            }
        };

        self.error = None;
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.report = None;
        }
        match backend.run_inference(&request) {
            Ok(report) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.report = Some(report);
                }
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Close the dialog and forget its selection and results
    pub fn reset_dialog(&mut self) {
        self.dialog = None;
    }

    /// Summary metrics of the last inference, in display order
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        self.dialog
            .as_ref()
            .and_then(|d| d.report.as_ref())
            .map(InferenceReport::metrics)
            .unwrap_or_default()
    }
}
