use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SourceError, SourceResult};

use super::raw::{RawVideoRecord, VideoListDocument};

/// Where [`VideoDataSource::get_videos`] currently reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    FileBacked,
    OverrideActive,
}

/// Supplies raw video records, either from the configured JSON file or from
/// an uploaded override.
///
/// The override lives only in this process: once installed it replaces the
/// file for the rest of the process lifetime and is lost on restart. Separate
/// instances of the service never see each other's uploads.
pub struct VideoDataSource {
    mock_file_path: PathBuf,
    uploaded: RwLock<Option<Arc<Vec<RawVideoRecord>>>>,
}

impl VideoDataSource {
    pub fn new(mock_file_path: PathBuf) -> Self {
        Self {
            mock_file_path,
            uploaded: RwLock::new(None),
        }
    }

    pub fn mock_file_path(&self) -> &Path {
        &self.mock_file_path
    }

    pub fn state(&self) -> SourceState {
        if self.uploaded.read().is_some() {
            SourceState::OverrideActive
        } else {
            SourceState::FileBacked
        }
    }

    /// Returns the override when one is installed, otherwise re-reads the
    /// file on every call.
    pub async fn get_videos(&self) -> SourceResult<Arc<Vec<RawVideoRecord>>> {
        let uploaded = self.uploaded.read().clone();
        if let Some(uploaded) = uploaded {
            return Ok(uploaded);
        }

        let raw = tokio::fs::read_to_string(&self.mock_file_path)
            .await
            .map_err(|source| SourceError::Unreadable {
                path: self.mock_file_path.clone(),
                source,
            })?;
        let parsed: Value =
            serde_json::from_str(&raw).map_err(|source| SourceError::InvalidJson {
                path: self.mock_file_path.clone(),
                source,
            })?;
        let document =
            VideoListDocument::from_value(parsed).ok_or_else(|| SourceError::MissingItems {
                path: self.mock_file_path.clone(),
            })?;

        debug!(
            path = %self.mock_file_path.display(),
            kind = %document.kind,
            items = document.items.len(),
            "read mock file"
        );
        Ok(Arc::new(to_records(&document.items)))
    }

    /// Parses an uploaded document and installs its `items` as the override.
    ///
    /// On failure nothing changes: a prior override (or the file source) stays
    /// in effect.
    pub fn set_from_raw_content(&self, raw: &str) -> SourceResult<usize> {
        let parsed: Value = serde_json::from_str(raw).map_err(|err| {
            warn!(error = %err, "rejected upload: not valid JSON");
            SourceError::UploadInvalidJson(err)
        })?;
        let Some(document) = VideoListDocument::from_value(parsed) else {
            warn!("rejected upload: missing items array");
            return Err(SourceError::UploadMissingItems);
        };

        let count = document.items.len();
        let records = Arc::new(to_records(&document.items));
        *self.uploaded.write() = Some(records);
        info!(
            kind = %document.kind,
            items = count,
            "installed uploaded video override"
        );
        Ok(count)
    }

    /// Upload entry point for transports that hand over raw file bytes.
    /// Invalid UTF-8 sequences are replaced before parsing.
    pub fn set_from_raw_bytes(&self, raw: &[u8]) -> SourceResult<usize> {
        self.set_from_raw_content(&String::from_utf8_lossy(raw))
    }
}

fn to_records(items: &[Value]) -> Vec<RawVideoRecord> {
    items.iter().map(RawVideoRecord::from_value).collect()
}
