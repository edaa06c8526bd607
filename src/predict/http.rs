use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use crate::model::prediction::Prediction;
use crate::predict::{EndpointError, Predictor};

const BODY_SNIPPET_MAX: usize = 200;

/// JSON body returned by `POST /predict`.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_class: i64,
    confidence: f64,
    status: String,
}

#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EndpointError> {
        let mut builder = Client::builder().timeout(timeout);
        if is_loopback(base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> EndpointError {
        if err.is_timeout() {
            EndpointError::Timeout(self.timeout)
        } else {
            EndpointError::Transport(err.to_string())
        }
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, image: &[u8], file_name: &str) -> Result<Prediction, EndpointError> {
        let part = multipart::Part::bytes(image.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.predict_url())
            .multipart(form)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().map_err(|e| self.map_send_error(e))?;
        if status != StatusCode::OK {
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }
        parse_response(&body)
    }

    fn health_check(&self) -> Result<(), EndpointError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }
        Ok(())
    }
}

/// Validates a `/predict` body. A payload whose `status` is not `success`
/// is rejected even when the HTTP status was 200.
pub fn parse_response(body: &str) -> Result<Prediction, EndpointError> {
    let parsed: PredictResponse =
        serde_json::from_str(body).map_err(|e| EndpointError::Malformed(e.to_string()))?;
    if parsed.status != "success" {
        return Err(EndpointError::Rejected(parsed.status));
    }
    Prediction::new(parsed.predicted_class, parsed.confidence)
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/predict/http.rs"]
mod tests;
