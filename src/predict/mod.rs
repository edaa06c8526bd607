use std::time::Duration;

use thiserror::Error;

use crate::model::prediction::Prediction;

pub mod http;

pub use http::HttpPredictor;

/// Anything that went wrong between sending an image and holding a
/// validated [`Prediction`].
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("endpoint reported status {0:?}")]
    Rejected(String),

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Source of predictions for the evaluation stage.
pub trait Predictor {
    fn predict(&self, image: &[u8], file_name: &str) -> Result<Prediction, EndpointError>;

    fn health_check(&self) -> Result<(), EndpointError> {
        Ok(())
    }
}

/// In-process prediction functions returning `(class, confidence)`.
impl<F> Predictor for F
where
    F: Fn(&[u8]) -> Result<(i64, f64), EndpointError>,
{
    fn predict(&self, image: &[u8], _file_name: &str) -> Result<Prediction, EndpointError> {
        let (class, confidence) = self(image)?;
        Prediction::new(class, confidence)
    }
}
