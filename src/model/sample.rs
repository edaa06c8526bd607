use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::model::label::Label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Encoded { file_name: String, bytes: Vec<u8> },
}

/// One labeled input image. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    id: String,
    label: Label,
    source: ImageSource,
}

impl Sample {
    pub fn from_file(id: impl Into<String>, label: Label, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            label,
            source: ImageSource::File(path.into()),
        }
    }

    pub fn encoded(
        id: impl Into<String>,
        label: Label,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: id.into(),
            label,
            source: ImageSource::Encoded {
                file_name: file_name.into(),
                bytes,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ImageSource::File(path) => Some(path),
            ImageSource::Encoded { .. } => None,
        }
    }

    /// Name sent as the multipart file name.
    pub fn file_name(&self) -> Cow<'_, str> {
        match &self.source {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or(Cow::Borrowed(self.id.as_str())),
            ImageSource::Encoded { file_name, .. } => Cow::Borrowed(file_name.as_str()),
        }
    }

    pub fn read_image(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.source {
            ImageSource::File(path) => std::fs::read(path).map(Cow::Owned),
            ImageSource::Encoded { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
        }
    }
}
