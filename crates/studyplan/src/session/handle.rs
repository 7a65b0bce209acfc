use chrono::NaiveDateTime;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::confirm::{Confirm, CLEAR_CONFIRMATION_QUESTION};
use super::events::{EventBroadcaster, SessionEvent};
use super::runner::{SessionCommand, SessionSnapshot};
use crate::aggregate::{self, TopicIndex};
use crate::error::SessionError;
use crate::model::{RawFile, RoadmapStep};
use crate::report;

/// Cloneable front end to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    events: EventBroadcaster,
}

impl SessionHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<SessionCommand>,
        events: EventBroadcaster,
    ) -> Self {
        Self { commands, events }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| SessionError::ChannelClosed)?;
        response.await.map_err(|_| SessionError::ChannelClosed)
    }

    /// Tracks every payload and starts its analysis. Returns the new ids,
    /// in payload order.
    pub async fn add_files(&self, payloads: Vec<RawFile>) -> Result<Vec<String>, SessionError> {
        self.request(|reply| SessionCommand::AddFiles { payloads, reply })
            .await
    }

    /// Returns false when no entry has this id.
    pub async fn remove_file(&self, id: &str) -> Result<bool, SessionError> {
        let id = id.to_string();
        self.request(|reply| SessionCommand::RemoveFile { id, reply })
            .await
    }

    /// Discards every entry and the roadmap once `confirm` approves.
    /// Returns whether anything was cleared.
    pub async fn clear_all(&self, confirm: &dyn Confirm) -> Result<bool, SessionError> {
        if !confirm.confirm(CLEAR_CONFIRMATION_QUESTION) {
            log::debug!("Clear declined");
            return Ok(false);
        }
        self.request(|reply| SessionCommand::Clear { reply }).await?;
        Ok(true)
    }

    /// Builds a new roadmap from the completed analyses.
    ///
    /// `Ok(None)` means nothing is completed yet and no request was made.
    /// On failure the previous roadmap stays in place.
    pub async fn generate_roadmap(&self) -> Result<Option<Vec<RoadmapStep>>, SessionError> {
        self.request(|reply| SessionCommand::GenerateRoadmap { reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    pub async fn topic_index(&self) -> Result<TopicIndex, SessionError> {
        let snapshot = self.snapshot().await?;
        Ok(aggregate::topic_index(&snapshot.files))
    }

    /// Renders the offline HTML report of the current state.
    pub async fn render_report(&self, generated_at: NaiveDateTime) -> Result<String, SessionError> {
        let snapshot = self.snapshot().await?;
        let index = aggregate::topic_index(&snapshot.files);
        Ok(report::render(
            &snapshot.files,
            &index.all_topics,
            &index.high_priority_topics,
            &snapshot.roadmap,
            generated_at,
        ))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Resolves once every analysis this session started has reported
    /// back. Entries restored without a running job do not count.
    pub async fn wait_until_settled(&self) -> Result<SessionSnapshot, SessionError> {
        // Subscribe before looking so no change slips in between
        let mut events = self.subscribe();
        loop {
            let snapshot = self.snapshot().await?;
            if snapshot.analyses_in_flight == 0 {
                return Ok(snapshot);
            }

            match events.recv().await {
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::debug!("Missed {} session events while waiting", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(SessionError::ChannelClosed)
                }
            }
        }
    }

    /// Stops the session loop. Analyses still in flight are dropped.
    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Shutdown)
            .map_err(|_| SessionError::ChannelClosed)
    }
}
