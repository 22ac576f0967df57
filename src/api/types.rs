//! Request and response types of the backend API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use self::Hyperparameter::{LearningRate, MaxDepth, NEstimators};
use super::metrics::{
    ClassificationReport, ConfusionMatrix, RawClassificationReport, RawConfusionMatrix,
};

/// One row of a dataset preview, column name to cell
pub type DataRow = Map<String, Value>;

/// Trained models grouped by method name
pub type ModelCatalog = BTreeMap<String, Vec<String>>;

/// Answer to `POST /data/upload_csv/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub filepath: String,
    #[serde(default)]
    pub data_head: Vec<DataRow>,
}

/// Class balance of a processed split
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProcessStats {
    pub num_samples: Option<u64>,
    pub num_features: Option<u64>,
    pub class_counts: Option<BTreeMap<String, f64>>,
    pub class_percentage: Option<BTreeMap<String, f64>>,
}

/// Files and statistics produced by preprocessing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProcessedData {
    pub train_filename: Option<String>,
    pub train_filepath: Option<String>,
    pub train_stats: Option<ProcessStats>,
    pub test_filename: Option<String>,
    pub test_filepath: Option<String>,
    pub test_stats: Option<ProcessStats>,
    pub all_filename: Option<String>,
    pub scaler_path: Option<String>,
    #[serde(default)]
    pub train_head: Vec<DataRow>,
    #[serde(default)]
    pub test_head: Vec<DataRow>,
}

/// Answer to `POST /data/process_csv/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcessResponse {
    pub message: String,
    pub data: ProcessedData,
}

/// Tunable hyperparameters of a training method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hyperparameter {
    NEstimators,
    MaxDepth,
    LearningRate,
}

impl Hyperparameter {
    /// Form field name expected by the backend
    pub fn field(&self) -> &'static str {
        match self {
            Hyperparameter::NEstimators => "n_estimators",
            Hyperparameter::MaxDepth => "max_depth",
            Hyperparameter::LearningRate => "learning_rate",
        }
    }
}

/// A training method and the hyperparameters it accepts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodConfig {
    pub name: &'static str,
    pub label: &'static str,
    pub accepts: &'static [Hyperparameter],
}

impl MethodConfig {
    pub fn accepts(&self, param: Hyperparameter) -> bool {
        self.accepts.contains(&param)
    }
}

/// Training methods offered by the backend
pub const METHODS: &[MethodConfig] = &[
    MethodConfig {
        name: "randomforest",
        label: "Random Forest",
        accepts: &[NEstimators, MaxDepth],
    },
    MethodConfig {
        name: "adaboost",
        label: "AdaBoost",
        accepts: &[NEstimators, LearningRate],
    },
    MethodConfig {
        name: "stacking",
        label: "Stacking",
        accepts: &[],
    },
    MethodConfig {
        name: "bagging",
        label: "Bagging",
        accepts: &[NEstimators],
    },
    MethodConfig {
        name: "randomsubspace",
        label: "Random Subspace",
        accepts: &[NEstimators],
    },
    MethodConfig {
        name: "rsm",
        label: "RSM",
        accepts: &[NEstimators],
    },
    MethodConfig {
        name: "extratrees",
        label: "ExtraTrees",
        accepts: &[NEstimators, MaxDepth],
    },
    MethodConfig {
        name: "extremelyrandomizedtrees",
        label: "Extremely Randomized Trees",
        accepts: &[NEstimators, MaxDepth],
    },
    MethodConfig {
        name: "et",
        label: "ET (alias)",
        accepts: &[NEstimators, MaxDepth],
    },
];

/// Look up a training method by name
pub fn method_config(name: &str) -> Option<&'static MethodConfig> {
    METHODS.iter().find(|m| m.name == name)
}

/// Tree count the retrain form starts with
pub const DEFAULT_N_ESTIMATORS: u32 = 100;
/// Tree depth the retrain form starts with
pub const DEFAULT_MAX_DEPTH: u32 = 10;
/// Boosting learning rate the retrain form starts with
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Optional hyperparameter overrides for retraining
///
/// `Default` leaves every value unset so the backend picks its own;
/// [`Hyperparameters::form_defaults`] holds the values the retrain view
/// starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hyperparameters {
    pub n_estimators: Option<u32>,
    pub max_depth: Option<u32>,
    pub learning_rate: Option<f64>,
}

impl Hyperparameters {
    pub fn form_defaults() -> Self {
        Self {
            n_estimators: Some(DEFAULT_N_ESTIMATORS),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            learning_rate: Some(DEFAULT_LEARNING_RATE),
        }
    }
}

/// Body of `POST /train/retrain/`
#[derive(Debug, Clone, PartialEq)]
pub struct RetrainRequest {
    pub file_train: String,
    pub file_test: String,
    pub scaler_path: String,
    pub method: String,
    pub hyperparameters: Hyperparameters,
}

impl RetrainRequest {
    /// Form fields; hyperparameters the method does not accept are left out
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("file_train", self.file_train.clone()),
            ("file_test", self.file_test.clone()),
            ("scaler_path", self.scaler_path.clone()),
            ("models", self.method.clone()),
        ];

        let accepts = |param: Hyperparameter| method_config(&self.method).is_some_and(|m| m.accepts(param));
        let hp = &self.hyperparameters;

        if let Some(n) = hp.n_estimators.filter(|_| accepts(NEstimators)) {
            fields.push((NEstimators.field(), n.to_string()));
        }
        if let Some(depth) = hp.max_depth.filter(|_| accepts(MaxDepth)) {
            fields.push((MaxDepth.field(), depth.to_string()));
        }
        if let Some(rate) = hp
            .learning_rate
            .filter(|r| r.is_finite() && accepts(LearningRate))
        {
            fields.push((LearningRate.field(), rate.to_string()));
        }

        fields
    }
}

/// Training outcome of one method
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MethodResult {
    pub accuracy: f64,
    pub confusion_matrix: Option<RawConfusionMatrix>,
    pub classification_report: Option<RawClassificationReport>,
}

impl MethodResult {
    pub fn confusion_matrix(&self) -> Option<ConfusionMatrix> {
        self.confusion_matrix.clone().map(ConfusionMatrix::from)
    }

    pub fn classification_report(&self) -> Option<ClassificationReport> {
        self.classification_report
            .clone()
            .map(ClassificationReport::from)
    }
}

/// Answer to `POST /train/retrain/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetrainResponse {
    pub message: String,
    pub results: BTreeMap<String, MethodResult>,
}

/// Query of `POST /ml/inference/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub model_type: String,
    pub model_name: String,
    pub csv_names: Vec<String>,
}

impl InferenceRequest {
    /// Query pairs, one `list_csv_names` entry per dataset
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("model_type", self.model_type.clone()),
            ("model_name", self.model_name.clone()),
        ];
        pairs.extend(
            self.csv_names
                .iter()
                .map(|name| ("list_csv_names", name.clone())),
        );
        pairs
    }
}

/// Answer to `POST /ml/inference/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InferenceReport {
    #[serde(default)]
    pub model_type: Option<Value>,
    pub accuracy: f64,
    pub precision_macro: f64,
    pub recall_macro: f64,
    pub f1_macro: f64,
    pub precision_weighted: f64,
    pub recall_weighted: f64,
    pub f1_weighted: f64,
    pub confusion_matrix: Option<RawConfusionMatrix>,
    pub classification_report: Option<RawClassificationReport>,
    #[serde(default)]
    pub num_predictions: u64,
    #[serde(default)]
    pub sample_predictions: Vec<Value>,
}

impl InferenceReport {
    /// Labelled summary metrics in display order
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Accuracy", self.accuracy),
            ("Precision (macro)", self.precision_macro),
            ("Recall (macro)", self.recall_macro),
            ("F1 (macro)", self.f1_macro),
            ("Precision (weighted)", self.precision_weighted),
            ("Recall (weighted)", self.recall_weighted),
            ("F1 (weighted)", self.f1_weighted),
            ("Num predictions", self.num_predictions as f64),
        ]
    }

    pub fn confusion_matrix(&self) -> Option<ConfusionMatrix> {
        self.confusion_matrix.clone().map(ConfusionMatrix::from)
    }

    pub fn classification_report(&self) -> Option<ClassificationReport> {
        self.classification_report
            .clone()
            .map(ClassificationReport::from)
    }
}

/// Answer to `GET /visualization/hostnames`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostnamesResponse {
    pub total_hostnames: usize,
    pub hostnames: Vec<String>,
}

/// Answer to `GET /visualization/find_by_hostname/{hostname}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostSystem {
    pub hostname: String,
    #[serde(default)]
    pub kepid: Option<i64>,
    pub total_rows: usize,
    #[serde(default)]
    pub data: Vec<DataRow>,
}

/// Answer to `GET /visualization/lightcurve/{star_id}/{tce_num}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LightCurve {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    /// Any further columns the backend attaches
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LightCurve {
    /// Whether every time stamp has a flux value
    pub fn is_consistent(&self) -> bool {
        self.time.len() == self.flux.len()
    }

    /// `(time, flux)` pairs, truncated to the shorter column
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.flux.iter().copied())
    }

    /// Minimum and maximum finite flux
    pub fn flux_range(&self) -> Option<(f64, f64)> {
        self.flux
            .iter()
            .copied()
            .filter(|f| f.is_finite())
            .fold(None, |range, f| match range {
                None => Some((f, f)),
                Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
            })
    }
}

/// Reachability of the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Success,
    /// The backend answered with this HTTP status
    HttpError(u16),
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Success => write!(f, "success"),
            ConnectionState::HttpError(code) => write!(f, "error_{}", code),
            ConnectionState::Failed => write!(f, "failed"),
        }
    }
}

/// Result of probing the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub status: ConnectionState,
    pub url: String,
    pub timestamp: DateTime<Utc>,
}
