//! Evaluation metrics returned by training and inference
//!
//! The backend is not consistent about the shape of these payloads: a
//! confusion matrix may arrive as a nested array or as a label-keyed object,
//! and a classification report mixes per-class objects with bare numbers.
//! The raw shapes are modelled as untagged enums and normalized into one
//! canonical form before anything displays them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Confusion matrix exactly as the backend sent it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawConfusionMatrix {
    /// `[[tn, fp], [fn, tp]]`, rows are actual classes
    Rows(Vec<Vec<f64>>),
    /// `{"actual": {"predicted": count}}`
    Labeled(BTreeMap<String, BTreeMap<String, f64>>),
}

/// Square confusion matrix with one label per row and column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    /// Class labels, shared by rows (actual) and columns (predicted)
    pub labels: Vec<String>,
    /// `cells[actual][predicted]`
    pub cells: Vec<Vec<f64>>,
}

impl ConfusionMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all cells
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Fraction of samples on the diagonal, `None` for an empty matrix
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let diagonal: f64 = (0..self.size()).map(|i| self.cells[i][i]).sum();
        Some(diagonal / total)
    }
}

impl From<RawConfusionMatrix> for ConfusionMatrix {
    fn from(raw: RawConfusionMatrix) -> Self {
        match raw {
            RawConfusionMatrix::Rows(rows) => {
                // Ragged or non-square input is padded with zeros
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                let size = width.max(rows.len());
                let mut cells = vec![vec![0.0; size]; size];
                for (i, row) in rows.iter().enumerate() {
                    for (j, value) in row.iter().enumerate() {
                        cells[i][j] = *value;
                    }
                }
                ConfusionMatrix {
                    labels: (0..size).map(|i| i.to_string()).collect(),
                    cells,
                }
            }
            RawConfusionMatrix::Labeled(map) => {
                // Labels seen either as actual or as predicted, sorted
                let labels: Vec<String> = map
                    .iter()
                    .flat_map(|(actual, row)| std::iter::once(actual).chain(row.keys()))
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let cells = labels
                    .iter()
                    .map(|actual| {
                        labels
                            .iter()
                            .map(|predicted| {
                                map.get(actual)
                                    .and_then(|row| row.get(predicted))
                                    .copied()
                                    .unwrap_or(0.0)
                            })
                            .collect()
                    })
                    .collect();
                ConfusionMatrix { labels, cells }
            }
        }
    }
}

/// Precision, recall and F1 for one class or one average
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ClassMetrics {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    #[serde(rename = "f1-score")]
    pub f1_score: Option<f64>,
    pub support: Option<f64>,
}

/// One entry of a raw classification report
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawReportEntry {
    Metrics(ClassMetrics),
    Scalar(f64),
}

/// Classification report exactly as the backend sent it
pub type RawClassificationReport = BTreeMap<String, RawReportEntry>;

/// Classification report split into per-class rows and summary rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Per-class metrics in label order
    pub classes: Vec<(String, ClassMetrics)>,
    pub macro_avg: Option<ClassMetrics>,
    pub weighted_avg: Option<ClassMetrics>,
    pub accuracy: Option<f64>,
}

impl From<RawClassificationReport> for ClassificationReport {
    fn from(raw: RawClassificationReport) -> Self {
        let mut report = ClassificationReport::default();
        for (key, entry) in raw {
            match (key.as_str(), entry) {
                ("accuracy", RawReportEntry::Scalar(value)) => report.accuracy = Some(value),
                // Some serializers emit accuracy as a metrics object
                ("accuracy", RawReportEntry::Metrics(m)) => report.accuracy = m.precision,
                ("macro avg", RawReportEntry::Metrics(m)) => report.macro_avg = Some(m),
                ("weighted avg", RawReportEntry::Metrics(m)) => report.weighted_avg = Some(m),
                (_, RawReportEntry::Metrics(m)) => report.classes.push((key, m)),
                (_, RawReportEntry::Scalar(_)) => {}
            }
        }
        report
    }
}
