use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::sample::Sample;

pub mod archive;
pub mod manifest;
pub mod synthetic;

pub use archive::load_archive;
pub use manifest::load_manifest;
pub use synthetic::{synthetic_samples, write_synthetic};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl InputError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where the labeled evaluation set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSource {
    Archive {
        root: PathBuf,
        per_class_limit: usize,
        seed: u64,
    },
    Manifest(PathBuf),
    Synthetic,
}

impl SampleSource {
    pub fn describe(&self) -> String {
        match self {
            SampleSource::Archive { root, seed, .. } => {
                format!("archive:{} (seed {seed})", root.display())
            }
            SampleSource::Manifest(path) => format!("manifest:{}", path.display()),
            SampleSource::Synthetic => "synthetic".to_string(),
        }
    }
}

pub fn load_samples(source: &SampleSource) -> Result<Vec<Sample>, InputError> {
    let samples = match source {
        SampleSource::Archive {
            root,
            per_class_limit,
            seed,
        } => load_archive(root, *per_class_limit, *seed)?,
        SampleSource::Manifest(path) => load_manifest(path)?,
        SampleSource::Synthetic => synthetic_samples()?,
    };
    let (benign, malignant) = samples.iter().fold((0usize, 0usize), |(b, m), s| {
        if s.label().is_positive() {
            (b, m + 1)
        } else {
            (b + 1, m)
        }
    });
    tracing::info!(
        source = %source.describe(),
        total = samples.len(),
        benign,
        malignant,
        "loaded evaluation samples"
    );
    Ok(samples)
}

pub(crate) fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
