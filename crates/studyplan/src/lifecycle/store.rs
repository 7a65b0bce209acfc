//! The ordered collection of tracked files and their status transitions.

use std::sync::Arc;

use crate::ids::generate_id;
use crate::model::{AnalysisResult, FileStatus, RawFile, TrackedFile};

/// A status change applied to one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    Analyzing,
    Completed(AnalysisResult),
    Failed(String),
}

impl StatusUpdate {
    pub fn status(&self) -> FileStatus {
        match self {
            StatusUpdate::Analyzing => FileStatus::Analyzing,
            StatusUpdate::Completed(_) => FileStatus::Completed,
            StatusUpdate::Failed(_) => FileStatus::Error,
        }
    }
}

/// Most-recent-first list of tracked files.
#[derive(Debug, Default)]
pub struct FileStore {
    files: Vec<TrackedFile>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(files: Vec<TrackedFile>) -> Self {
        Self { files }
    }

    /// Creates an `idle` entry per payload and puts the batch, in its own
    /// order, ahead of the existing entries. Returns the new ids.
    pub fn add_files(&mut self, payloads: Vec<RawFile>, now_millis: i64) -> Vec<String> {
        let new_files: Vec<TrackedFile> = payloads
            .into_iter()
            .map(|raw| TrackedFile {
                id: generate_id(),
                file_size: raw.size(),
                file_name: raw.name,
                file_type: raw.mime_type,
                raw_payload: Some(Arc::from(raw.bytes)),
                status: FileStatus::Idle,
                result: None,
                error_message: None,
                timestamp: now_millis,
            })
            .collect();

        let ids = new_files.iter().map(|f| f.id.clone()).collect();
        self.files.splice(0..0, new_files);
        ids
    }

    /// Removes the entry. Returns false when it was not present.
    pub fn remove_file(&mut self, id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Sets the status and both outcome fields. Returns the updated entry,
    /// or `None` when the id is unknown.
    pub fn update_status(&mut self, id: &str, update: StatusUpdate) -> Option<&TrackedFile> {
        let file = self.files.iter_mut().find(|f| f.id == id)?;
        file.status = update.status();
        match update {
            StatusUpdate::Analyzing => {
                file.result = None;
                file.error_message = None;
            }
            StatusUpdate::Completed(result) => {
                file.result = Some(result);
                file.error_message = None;
            }
            StatusUpdate::Failed(message) => {
                file.result = None;
                file.error_message = Some(message);
            }
        }
        Some(file)
    }

    pub fn get(&self, id: &str) -> Option<&TrackedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> RawFile {
        RawFile::new(name, "application/pdf", name.as_bytes().to_vec())
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            summary: "özet".to_string(),
            topics: vec!["A".to_string()],
            study_plan: Vec::new(),
        }
    }

    #[test]
    fn test_add_files_prepends_batch_in_order() {
        let mut store = FileStore::new();
        store.add_files(vec![payload("old.pdf")], 1);
        let ids = store.add_files(vec![payload("a.pdf"), payload("b.pdf")], 2);

        assert_eq!(ids.len(), 2);
        let names: Vec<&str> = store.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "old.pdf"]);
        assert_eq!(store.files()[0].id, ids[0]);
        assert_eq!(store.files()[1].id, ids[1]);
    }

    #[test]
    fn test_new_entries_start_idle_with_payload() {
        let mut store = FileStore::new();
        let ids = store.add_files(vec![payload("a.pdf")], 42);
        let file = store.get(&ids[0]).unwrap();

        assert_eq!(file.status, FileStatus::Idle);
        assert_eq!(file.file_size, 5);
        assert_eq!(file.file_type, "application/pdf");
        assert_eq!(file.timestamp, 42);
        assert_eq!(file.raw_payload.as_deref(), Some(&b"a.pdf"[..]));
    }

    #[test]
    fn test_add_empty_batch() {
        let mut store = FileStore::new();
        assert!(store.add_files(Vec::new(), 0).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_status_keeps_outcome_consistent() {
        let mut store = FileStore::new();
        let id = store.add_files(vec![payload("a.pdf")], 0).remove(0);

        store.update_status(&id, StatusUpdate::Analyzing);
        assert_eq!(store.get(&id).unwrap().status, FileStatus::Analyzing);

        store.update_status(&id, StatusUpdate::Failed("hata".to_string()));
        let file = store.get(&id).unwrap();
        assert_eq!(file.status, FileStatus::Error);
        assert_eq!(file.error_message.as_deref(), Some("hata"));
        assert!(file.result.is_none());

        store.update_status(&id, StatusUpdate::Completed(sample_result()));
        let file = store.get(&id).unwrap();
        assert!(file.is_completed());
        assert!(file.error_message.is_none());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = FileStore::new();
        store.add_files(vec![payload("a.pdf")], 0);
        assert!(store
            .update_status("missing", StatusUpdate::Completed(sample_result()))
            .is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.files()[0].status, FileStatus::Idle);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = FileStore::new();
        let ids = store.add_files(vec![payload("a.pdf"), payload("b.pdf")], 0);

        assert!(store.remove_file(&ids[0]));
        assert!(!store.remove_file(&ids[0]));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
