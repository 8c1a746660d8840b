//! Failures raised while loading or replacing the video data source.

use std::path::PathBuf;

use thiserror::Error;

/// Who is to blame for a [`SourceError`]. The transport maps `Caller` to a
/// 4xx status and `Internal` to a 5xx one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Caller,
    Internal,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not read mock file at path \"{}\".", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mock file at path \"{}\" is not valid JSON.", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mock file does not contain a valid items array.")]
    MissingItems { path: PathBuf },

    #[error("File is required.")]
    UploadMissingFile,

    #[error("Uploaded file is not valid JSON.")]
    UploadInvalidJson(#[source] serde_json::Error),

    #[error("Uploaded JSON must contain a valid items array.")]
    UploadMissingItems,
}

impl SourceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unreadable { .. } | Self::InvalidJson { .. } | Self::MissingItems { .. } => {
                ErrorClass::Internal
            }
            Self::UploadMissingFile | Self::UploadInvalidJson(_) | Self::UploadMissingItems => {
                ErrorClass::Caller
            }
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
