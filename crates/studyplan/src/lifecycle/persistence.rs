//! Saving and restoring session state through a [`KeyValueStore`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::model::{FileStatus, RoadmapStep, TrackedFile};
use crate::storage::KeyValueStore;

pub const FILES_KEY: &str = "pdf_study_assistant_data";
pub const ROADMAP_KEY: &str = "pdf_study_assistant_roadmap";

/// Error recorded for entries that were in flight when the state was saved.
pub const RELOAD_INTERRUPTED_MESSAGE: &str = "Sayfa yenilendiği için işlem tamamlanamadı.";

/// Marks entries that cannot resume after a restart as failed.
///
/// Returns how many entries were rewritten.
pub fn restore_after_reload(files: &mut [TrackedFile]) -> usize {
    let mut corrected = 0;
    for file in files.iter_mut() {
        if matches!(file.status, FileStatus::Analyzing | FileStatus::Uploading) {
            file.status = FileStatus::Error;
            file.result = None;
            file.error_message = Some(RELOAD_INTERRUPTED_MESSAGE.to_string());
            corrected += 1;
        }
    }
    corrected
}

/// Session state as found in the durable store.
#[derive(Debug, Default)]
pub struct RestoredState {
    pub files: Vec<TrackedFile>,
    pub roadmap: Vec<RoadmapStep>,
    /// Entries rewritten by [`restore_after_reload`].
    pub corrected: usize,
}

pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            source: e,
        })?;
        self.store.set(key, &json)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                source: e,
            })
    }

    /// Writes every entry without its raw payload.
    pub fn save_files(&self, files: &[TrackedFile]) -> Result<(), StorageError> {
        self.save(FILES_KEY, files)
    }

    /// Reads the saved entries and applies the reload correction.
    pub fn load_files(&self) -> Result<(Vec<TrackedFile>, usize), StorageError> {
        let mut files: Vec<TrackedFile> = self.load(FILES_KEY)?.unwrap_or_default();
        let corrected = restore_after_reload(&mut files);
        Ok((files, corrected))
    }

    pub fn save_roadmap(&self, roadmap: &[RoadmapStep]) -> Result<(), StorageError> {
        self.save(ROADMAP_KEY, roadmap)
    }

    pub fn load_roadmap(&self) -> Result<Vec<RoadmapStep>, StorageError> {
        Ok(self.load(ROADMAP_KEY)?.unwrap_or_default())
    }

    /// Loads both keys. A key that cannot be read or parsed is logged and
    /// treated as empty.
    pub fn restore(&self) -> RestoredState {
        let (files, corrected) = self.load_files().unwrap_or_else(|e| {
            log::error!("Failed to load saved files, starting empty: {}", e);
            (Vec::new(), 0)
        });
        let roadmap = self.load_roadmap().unwrap_or_else(|e| {
            log::error!("Failed to load saved roadmap, starting empty: {}", e);
            Vec::new()
        });

        if corrected > 0 {
            log::warn!(
                "{} file(s) were interrupted by a restart and marked as failed",
                corrected
            );
        }

        RestoredState {
            files,
            roadmap,
            corrected,
        }
    }

    /// Removes both keys.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(FILES_KEY)?;
        self.store.remove(ROADMAP_KEY)
    }
}
