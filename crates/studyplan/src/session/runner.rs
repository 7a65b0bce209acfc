//! The session loop: sole owner and writer of the session state.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::events::{EventBroadcaster, SessionEvent};
use super::handle::SessionHandle;
use crate::aggregate;
use crate::ai::{AiError, AnalysisClient, GenerativeBackend, RoadmapClient};
use crate::encoding::encode_payload;
use crate::error::SessionError;
use crate::lifecycle::{FileStore, Persistence, StatusUpdate};
use crate::model::{RawFile, RoadmapStep, TrackedFile};
use crate::storage::KeyValueStore;

/// Recorded when an entry has no payload to analyze.
pub const MISSING_PAYLOAD_MESSAGE: &str = "Dosya verisi bulunamadı.";

/// Recorded when a failure carries no description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Bilinmeyen bir hata oluştu";

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Collaborators a session is built from.
pub struct SessionDeps {
    pub backend: Arc<dyn GenerativeBackend>,
    pub store: Arc<dyn KeyValueStore>,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Most recent first.
    pub files: Vec<TrackedFile>,
    pub roadmap: Vec<RoadmapStep>,
    pub roadmap_in_progress: bool,
    /// Analyses started by this session that have not reported back.
    pub analyses_in_flight: usize,
}

pub(crate) type Reply<T> = oneshot::Sender<T>;

pub(crate) enum SessionCommand {
    AddFiles {
        payloads: Vec<RawFile>,
        reply: Reply<Vec<String>>,
    },
    RemoveFile {
        id: String,
        reply: Reply<bool>,
    },
    Clear {
        reply: Reply<()>,
    },
    GenerateRoadmap {
        reply: Reply<Result<Option<Vec<RoadmapStep>>, SessionError>>,
    },
    Snapshot {
        reply: Reply<SessionSnapshot>,
    },
    AnalysisFinished {
        id: String,
        outcome: StatusUpdate,
    },
    RoadmapFinished {
        generation: u64,
        result: Result<Vec<RoadmapStep>, AiError>,
        reply: Reply<Result<Option<Vec<RoadmapStep>>, SessionError>>,
    },
    Shutdown,
}

pub struct Session {
    files: FileStore,
    roadmap: Vec<RoadmapStep>,
    roadmap_in_progress: bool,
    /// Bumped by every clear. Results of requests started earlier are stale.
    generation: u64,
    /// Ids with a running analysis job.
    in_flight: HashSet<String>,
    persistence: Persistence,
    analysis: AnalysisClient,
    roadmap_client: RoadmapClient,
    events: EventBroadcaster,
    /// Handed to spawned tasks so they can report back. Weak so the loop
    /// ends once every handle is gone and nothing is in flight.
    commands: mpsc::WeakUnboundedSender<SessionCommand>,
}

impl Session {
    /// Restores saved state and spawns the session loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(deps: SessionDeps) -> (SessionHandle, JoinHandle<()>) {
        let persistence = Persistence::new(deps.store);
        let restored = persistence.restore();
        if restored.corrected > 0 {
            if let Err(e) = persistence.save_files(&restored.files) {
                error!("Failed to save corrected files: {}", e);
            }
        }
        info!(
            "Session restored with {} file(s) and {} roadmap step(s)",
            restored.files.len(),
            restored.roadmap.len()
        );

        let (sender, receiver) = mpsc::unbounded_channel();
        let events = EventBroadcaster::new(EVENT_CHANNEL_CAPACITY);

        let session = Session {
            files: FileStore::from_files(restored.files),
            roadmap: restored.roadmap,
            roadmap_in_progress: false,
            generation: 0,
            in_flight: HashSet::new(),
            persistence,
            analysis: AnalysisClient::new(Arc::clone(&deps.backend)),
            roadmap_client: RoadmapClient::new(deps.backend),
            events: events.clone(),
            commands: sender.downgrade(),
        };

        let join = tokio::spawn(session.run(receiver));
        (SessionHandle::new(sender, events), join)
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<SessionCommand>) {
        debug!("Session loop started");

        while let Some(command) = receiver.recv().await {
            match command {
                SessionCommand::AddFiles { payloads, reply } => {
                    let ids = self.add_files(payloads);
                    let _ = reply.send(ids);
                }
                SessionCommand::RemoveFile { id, reply } => {
                    let removed = self.remove_file(&id);
                    let _ = reply.send(removed);
                }
                SessionCommand::Clear { reply } => {
                    self.clear();
                    let _ = reply.send(());
                }
                SessionCommand::GenerateRoadmap { reply } => self.generate_roadmap(reply),
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                SessionCommand::AnalysisFinished { id, outcome } => {
                    self.finish_analysis(&id, outcome)
                }
                SessionCommand::RoadmapFinished {
                    generation,
                    result,
                    reply,
                } => self.finish_roadmap(generation, result, reply),
                SessionCommand::Shutdown => {
                    debug!("Session loop received shutdown");
                    break;
                }
            }
        }

        debug!("Session loop stopped");
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            files: self.files.files().to_vec(),
            roadmap: self.roadmap.clone(),
            roadmap_in_progress: self.roadmap_in_progress,
            analyses_in_flight: self.in_flight.len(),
        }
    }

    fn persist_files(&self) {
        if let Err(e) = self.persistence.save_files(self.files.files()) {
            error!("Failed to save files: {}", e);
        }
    }

    fn add_files(&mut self, payloads: Vec<RawFile>) -> Vec<String> {
        let now = chrono::Utc::now().timestamp_millis();
        let ids = self.files.add_files(payloads, now);
        if ids.is_empty() {
            return ids;
        }

        for id in &ids {
            if let Some(file) = self.files.get(id) {
                self.events.send(SessionEvent::status_changed(file));
            }
        }

        // Idle entries are never written, so a restart cannot leave one behind
        for id in &ids {
            let Some(file) = self.files.update_status(id, StatusUpdate::Analyzing) else {
                continue;
            };
            self.events.send(SessionEvent::status_changed(file));
            let job = AnalysisJob {
                id: file.id.clone(),
                file_name: file.file_name.clone(),
                mime_type: file.file_type.clone(),
                payload: file.raw_payload.clone(),
            };
            self.spawn_analysis(job);
        }
        self.persist_files();

        info!("Added {} file(s) for analysis", ids.len());
        ids
    }

    fn spawn_analysis(&mut self, job: AnalysisJob) {
        let Some(sender) = self.commands.upgrade() else {
            warn!("Session is shutting down, not analyzing '{}'", job.file_name);
            return;
        };
        self.in_flight.insert(job.id.clone());
        let client = self.analysis.clone();
        let span = tracing::info_span!("analysis", file = %job.file_name);

        tokio::spawn(
            async move {
                let outcome = job.run(&client).await;
                let _ = sender.send(SessionCommand::AnalysisFinished {
                    id: job.id,
                    outcome,
                });
            }
            .instrument(span),
        );
    }

    fn finish_analysis(&mut self, id: &str, outcome: StatusUpdate) {
        self.in_flight.remove(id);
        match self.files.update_status(id, outcome) {
            Some(file) => {
                self.events.send(SessionEvent::status_changed(file));
                self.persist_files();
            }
            None => debug!("Analysis finished for removed file {}, ignoring", id),
        }
    }

    fn remove_file(&mut self, id: &str) -> bool {
        if !self.files.remove_file(id) {
            return false;
        }
        self.in_flight.remove(id);
        self.events.send(SessionEvent::FileRemoved { id: id.to_string() });
        self.persist_files();
        true
    }

    fn clear(&mut self) {
        self.files.clear();
        self.roadmap.clear();
        self.in_flight.clear();
        self.generation += 1;
        if let Err(e) = self.persistence.clear() {
            error!("Failed to remove saved state: {}", e);
        }
        self.events.send(SessionEvent::Cleared);
        info!("Cleared all files and the roadmap");
    }

    fn generate_roadmap(&mut self, reply: Reply<Result<Option<Vec<RoadmapStep>>, SessionError>>) {
        if self.roadmap_in_progress {
            let _ = reply.send(Err(SessionError::RoadmapInProgress));
            return;
        }
        if !aggregate::has_completed(self.files.files()) {
            debug!("No completed analyses, skipping roadmap generation");
            let _ = reply.send(Ok(None));
            return;
        }
        let Some(sender) = self.commands.upgrade() else {
            let _ = reply.send(Err(SessionError::ChannelClosed));
            return;
        };

        let results = aggregate::completed_results(self.files.files());
        let client = self.roadmap_client.clone();
        let generation = self.generation;
        self.roadmap_in_progress = true;
        info!("Generating roadmap from {} analyses", results.len());

        tokio::spawn(async move {
            let result = client.build_roadmap(&results).await;
            let _ = sender.send(SessionCommand::RoadmapFinished {
                generation,
                result,
                reply,
            });
        });
    }

    fn finish_roadmap(
        &mut self,
        generation: u64,
        result: Result<Vec<RoadmapStep>, AiError>,
        reply: Reply<Result<Option<Vec<RoadmapStep>>, SessionError>>,
    ) {
        self.roadmap_in_progress = false;
        if generation != self.generation {
            info!("Session was cleared while the roadmap was generated, discarding it");
            let _ = reply.send(Err(SessionError::RoadmapDiscarded));
            return;
        }
        match result {
            Ok(steps) => {
                self.roadmap = steps.clone();
                if let Err(e) = self.persistence.save_roadmap(&self.roadmap) {
                    error!("Failed to save roadmap: {}", e);
                }
                self.events
                    .send(SessionEvent::RoadmapUpdated { steps: steps.len() });
                let _ = reply.send(Ok(Some(steps)));
            }
            Err(e) => {
                error!("Roadmap generation failed: {}", e);
                let _ = reply.send(Err(SessionError::Roadmap(e)));
            }
        }
    }
}

/// Everything a spawned analysis needs, detached from the store.
struct AnalysisJob {
    id: String,
    file_name: String,
    mime_type: String,
    payload: Option<Arc<[u8]>>,
}

impl AnalysisJob {
    async fn run(&self, client: &AnalysisClient) -> StatusUpdate {
        let Some(payload) = self.payload.as_deref() else {
            warn!("No payload for '{}'", self.file_name);
            return StatusUpdate::Failed(MISSING_PAYLOAD_MESSAGE.to_string());
        };

        let encoded = encode_payload(payload);
        match client.analyze(&encoded, &self.mime_type).await {
            Ok(result) => {
                info!("Analyzed '{}'", self.file_name);
                StatusUpdate::Completed(result)
            }
            Err(e) => {
                error!("Failed to analyze '{}': {}", self.file_name, e);
                StatusUpdate::Failed(failure_message(&e))
            }
        }
    }
}

fn failure_message(error: &dyn std::error::Error) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
