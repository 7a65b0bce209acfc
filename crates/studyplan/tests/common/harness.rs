//! Test harness for sessions backed by a temporary data directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::task::JoinHandle;

use studyplan::{FileKeyValueStore, RawFile, Session, SessionDeps, SessionHandle};

use super::backend::FakeBackend;

pub struct TestHarness {
    /// Keeps the data directory alive for the harness lifetime.
    temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub backend: Arc<FakeBackend>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_backend(FakeBackend::new())
    }

    pub fn with_backend(backend: FakeBackend) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        Self {
            temp_dir,
            data_dir,
            backend: Arc::new(backend),
        }
    }

    /// Starts a session over the harness data directory.
    pub fn start(&self) -> (SessionHandle, JoinHandle<()>) {
        Session::start(SessionDeps {
            backend: self.backend.clone(),
            store: Arc::new(FileKeyValueStore::new(&self.data_dir)),
        })
    }

    /// Stops the session and waits for its loop to exit.
    pub async fn stop(&self, handle: SessionHandle, join: JoinHandle<()>) {
        handle.shutdown().expect("session already stopped");
        join.await.expect("session loop panicked");
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    pub fn pdf(name: &str, content: &[u8]) -> RawFile {
        RawFile::new(name, "application/pdf", content.to_vec())
    }

    /// Gives spawned tasks time to run and report back.
    pub async fn let_tasks_run() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
