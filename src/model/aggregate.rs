use serde::Serialize;

use crate::model::label::Label;

/// Cell counts under the malignant-is-positive convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn sensitivity(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn specificity(&self) -> Option<f64> {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fp)
    }
}

fn ratio(num: usize, denom: usize) -> Option<f64> {
    if denom == 0 {
        None
    } else {
        Some(num as f64 / denom as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAccuracy {
    pub label: Label,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    /// Confidence distribution over samples of this true label.
    pub confidence: ConfidenceStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceStats {
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdPoint {
    pub threshold: f64,
    pub included: usize,
    pub correct: usize,
    /// Zero when nothing clears the threshold, so the curve stays plottable.
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub per_class: Vec<ClassAccuracy>,
    pub confidence: ConfidenceStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_correct: Option<ConfidenceStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_incorrect: Option<ConfidenceStats>,
    pub confidence_histogram: Vec<usize>,
    pub predicted_benign: usize,
    pub predicted_malignant: usize,
    pub confusion: ConfusionMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specificity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    pub threshold_curve: Vec<ThresholdPoint>,
}

impl AggregateReport {
    pub fn class_accuracy(&self, label: Label) -> Option<&ClassAccuracy> {
        self.per_class.iter().find(|c| c.label == label)
    }
}
