//! Session state-change notifications.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::model::{FileStatus, TrackedFile};

/// A change applied by the session loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// An entry was created or moved to a new status.
    #[serde(rename_all = "camelCase")]
    FileStatusChanged {
        id: String,
        file_name: String,
        status: FileStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },
    FileRemoved { id: String },
    /// A roadmap generation succeeded and replaced the previous roadmap.
    RoadmapUpdated { steps: usize },
    /// All entries and the roadmap were discarded.
    Cleared,
}

impl SessionEvent {
    pub fn status_changed(file: &TrackedFile) -> Self {
        SessionEvent::FileStatusChanged {
            id: file.id.clone(),
            file_name: file.file_name.clone(),
            status: file.status,
            error_message: file.error_message.clone(),
        }
    }
}

/// Fans session events out to any number of observers.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}
