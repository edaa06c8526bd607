use std::path::PathBuf;

use thiserror::Error;

use crate::input::InputError;

/// Run-level failures. Per-sample problems never surface here; they are
/// recorded as exclusions by the evaluation stage instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize summary")]
    Json(#[from] serde_json::Error),

    #[error("no endpoint produced a report ({0} attempted)")]
    NoReports(usize),
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}
