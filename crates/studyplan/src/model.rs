//! Domain types shared by the lifecycle store, AI clients and report renderer.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Processing status of a tracked file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Idle,
    Uploading,
    Analyzing,
    Completed,
    Error,
}

impl FileStatus {
    /// Returns true for `completed` and `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Completed | FileStatus::Error)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Idle => write!(f, "idle"),
            FileStatus::Uploading => write!(f, "uploading"),
            FileStatus::Analyzing => write!(f, "analyzing"),
            FileStatus::Completed => write!(f, "completed"),
            FileStatus::Error => write!(f, "error"),
        }
    }
}

/// Study priority of a plan item. Serialized with the Turkish labels the
/// remote service is asked to produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(rename = "Yüksek", alias = "HIGH", alias = "High")]
    High,
    #[serde(rename = "Orta", alias = "MEDIUM", alias = "Medium")]
    Medium,
    #[serde(rename = "Düşük", alias = "LOW", alias = "Low")]
    Low,
}

impl Priority {
    /// Wire labels in schema order.
    pub const LABELS: [&'static str; 3] = ["Yüksek", "Orta", "Düşük"];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => Self::LABELS[0],
            Priority::Medium => Self::LABELS[1],
            Priority::Low => Self::LABELS[2],
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a study plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyItem {
    pub topic: String,
    pub action: String,
    pub priority: Priority,
}

/// Output of one successful document analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    /// Topics in the order the service returned them (duplicates kept).
    pub topics: Vec<String>,
    pub study_plan: Vec<StudyItem>,
}

/// One phase of the cross-document curriculum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub step_name: String,
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
}

/// An uploaded document and its processing state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFile {
    pub id: String,
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// MIME type.
    pub file_type: String,
    /// Only available within the session that received the upload.
    #[serde(skip)]
    pub raw_payload: Option<Arc<[u8]>>,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl TrackedFile {
    pub fn is_completed(&self) -> bool {
        self.status == FileStatus::Completed && self.result.is_some()
    }

    /// File size in megabytes, as shown to users.
    pub fn size_in_mb(&self) -> f64 {
        self.file_size as f64 / 1024.0 / 1024.0
    }
}

/// A document payload as handed over by the user.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, SessionError> {
        let bytes = std::fs::read(path).map_err(|e| SessionError::ReadInput {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
