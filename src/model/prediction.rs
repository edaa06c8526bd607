use std::time::Duration;

use crate::model::label::Label;
use crate::predict::EndpointError;

/// A validated model answer for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    label: Label,
    confidence: f64,
}

impl Prediction {
    pub fn new(class: i64, confidence: f64) -> Result<Self, EndpointError> {
        let label = Label::from_class(class).ok_or_else(|| EndpointError::InvalidField {
            field: "predicted_class",
            value: class.to_string(),
        })?;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(EndpointError::InvalidField {
                field: "confidence",
                value: confidence.to_string(),
            });
        }
        Ok(Self { label, confidence })
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    sample_id: String,
    truth: Label,
    predicted: Label,
    confidence: f64,
    latency: Duration,
}

impl PredictionResult {
    pub fn new(
        sample_id: impl Into<String>,
        truth: Label,
        prediction: Prediction,
        latency: Duration,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            truth,
            predicted: prediction.label(),
            confidence: prediction.confidence(),
            latency,
        }
    }

    pub fn sample_id(&self) -> &str {
        &self.sample_id
    }

    pub fn truth(&self) -> Label {
        self.truth
    }

    pub fn predicted(&self) -> Label {
        self.predicted
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn is_correct(&self) -> bool {
        self.predicted == self.truth
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/prediction.rs"]
mod tests;
