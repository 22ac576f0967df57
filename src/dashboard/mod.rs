//! Controllers for the dashboard views
//!
//! Each view keeps all of its state in one controller struct. Rendering code
//! reads that state through accessors; every change goes through a named
//! transition method. A failed backend call sets the view's error banner and
//! leaves the rest of its state as it was.

pub mod datasets;
pub mod models;
pub mod retrain;

pub use datasets::DatasetsPage;
pub use models::{InferenceDialog, ModelsPage};
pub use retrain::RetrainPage;

/// Add `name` to a multi-selection, or remove it if already selected
pub(crate) fn toggle_selection(selection: &mut Vec<String>, name: &str) {
    if let Some(pos) = selection.iter().position(|n| n == name) {
        selection.remove(pos);
    } else {
        selection.push(name.to_string());
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory backend for controller tests

    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::Path;

    use serde_json::json;

    use crate::api::types::{
        HostSystem, InferenceReport, InferenceRequest, LightCurve, ModelCatalog,
        ProcessResponse, RetrainRequest, RetrainResponse, UploadResponse,
    };
    use crate::api::{ApiError, Backend};

    /// Backend that answers from canned data and records what it was asked
    #[derive(Default)]
    pub struct FakeBackend {
        pub csvs: Vec<String>,
        pub models: ModelCatalog,
        /// When set, every call fails with this status
        pub fail_with: Option<u16>,
        pub processed: RefCell<Vec<Vec<String>>>,
        pub retrained: RefCell<Vec<RetrainRequest>>,
        pub inferred: RefCell<Vec<InferenceRequest>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            let mut models = BTreeMap::new();
            models.insert("randomforest".to_string(), vec!["rf_1.pkl".to_string()]);
            Self {
                csvs: vec!["kepler.csv".to_string(), "tess.csv".to_string()],
                models,
                ..Default::default()
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::new()
            }
        }

        fn check(&self) -> Result<(), ApiError> {
            match self.fail_with {
                Some(status) => Err(ApiError::Status {
                    status,
                    body: "backend exploded".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    impl Backend for FakeBackend {
        fn list_csvs(&self) -> Result<Vec<String>, ApiError> {
            self.check()?;
            Ok(self.csvs.clone())
        }

        fn list_models(&self) -> Result<ModelCatalog, ApiError> {
            self.check()?;
            Ok(self.models.clone())
        }

        fn upload_csv(&self, path: &Path) -> Result<UploadResponse, ApiError> {
            self.check()?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(serde_json::from_value(json!({
                "message": "uploaded",
                "filename": filename,
                "filepath": format!("uploads/{}", filename),
                "data_head": [{"kepid": 1, "koi_period": 3.5}]
            }))
            .unwrap())
        }

        fn process_csv(
            &self,
            filenames: &[String],
            _option: &str,
        ) -> Result<ProcessResponse, ApiError> {
            self.check()?;
            self.processed.borrow_mut().push(filenames.to_vec());
            Ok(serde_json::from_value(json!({
                "message": "processed",
                "data": {
                    "train_filename": "train.csv",
                    "test_filename": "test.csv",
                    "scaler_path": "scaler.pkl",
                    "train_stats": {"num_samples": 80, "num_features": 12},
                    "test_stats": {"num_samples": 20, "num_features": 12}
                }
            }))
            .unwrap())
        }

        fn retrain(&self, request: &RetrainRequest) -> Result<RetrainResponse, ApiError> {
            self.check()?;
            self.retrained.borrow_mut().push(request.clone());
            Ok(serde_json::from_value(json!({
                "message": "trained",
                "results": {
                    request.method.clone(): {
                        "accuracy": 0.91,
                        "confusion_matrix": [[45, 5], [4, 46]],
                        "classification_report": {"accuracy": 0.91}
                    }
                }
            }))
            .unwrap())
        }

        fn run_inference(&self, request: &InferenceRequest) -> Result<InferenceReport, ApiError> {
            self.check()?;
            self.inferred.borrow_mut().push(request.clone());
            Ok(serde_json::from_value(json!({
                "model_type": request.model_type,
                "accuracy": 0.9,
                "precision_macro": 0.89,
                "recall_macro": 0.88,
                "f1_macro": 0.885,
                "precision_weighted": 0.9,
                "recall_weighted": 0.9,
                "f1_weighted": 0.9,
                "confusion_matrix": {"0": {"0": 9, "1": 1}, "1": {"0": 1, "1": 9}},
                "classification_report": {},
                "num_predictions": 20,
                "sample_predictions": [0, 1, 1]
            }))
            .unwrap())
        }

        fn hostnames(&self) -> Result<Vec<String>, ApiError> {
            self.check()?;
            Ok(vec!["Kepler-11".to_string()])
        }

        fn find_by_hostname(&self, hostname: &str) -> Result<HostSystem, ApiError> {
            self.check()?;
            Ok(serde_json::from_value(json!({
                "hostname": hostname,
                "kepid": 6541920,
                "total_rows": 1,
                "data": [{"Host Name": hostname, "koi_period": 10.3}]
            }))
            .unwrap())
        }

        fn lightcurve(&self, _star_id: &str, _tce_num: &str) -> Result<LightCurve, ApiError> {
            self.check()?;
            Ok(serde_json::from_value(json!({"time": [0.0, 1.0], "flux": [1.0, 0.99]})).unwrap())
        }
    }
}
