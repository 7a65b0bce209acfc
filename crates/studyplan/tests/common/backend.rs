//! Scripted generative backend.
//!
//! Analysis answers are keyed by the document payload, roadmap answers are
//! served in order. A gated backend holds every call until the test
//! releases it.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Semaphore;

use studyplan::ai::{GenerateRequest, GenerativeBackend, Part};
use studyplan::encoding::encode_payload;
use studyplan::AiError;

/// How the fake service answers one call.
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Empty,
    Fail(String),
}

impl Answer {
    fn into_result(self) -> Result<Option<String>, AiError> {
        match self {
            Answer::Text(text) => Ok(Some(text)),
            Answer::Empty => Ok(None),
            Answer::Fail(message) => Err(AiError::Transport(message)),
        }
    }
}

/// Builds an analysis answer. Priorities use the wire labels.
pub fn analysis_json(summary: &str, topics: &[&str], plan: &[(&str, &str)]) -> String {
    let study_plan: Vec<_> = plan
        .iter()
        .map(|(topic, priority)| {
            json!({ "topic": topic, "action": format!("{} konusunu çalış", topic), "priority": priority })
        })
        .collect();
    json!({ "summary": summary, "topics": topics, "studyPlan": study_plan }).to_string()
}

#[derive(Default)]
pub struct FakeBackend {
    analyses: Mutex<HashMap<String, Answer>>,
    roadmaps: Mutex<VecDeque<Answer>>,
    gate: Option<Semaphore>,
    analysis_calls: AtomicUsize,
    roadmap_calls: AtomicUsize,
    finished_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for [`FakeBackend::release`].
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn answer_document(&self, payload: &[u8], answer: Answer) {
        self.analyses
            .lock()
            .unwrap()
            .insert(encode_payload(payload), answer);
    }

    pub fn answer_roadmap(&self, answer: Answer) {
        self.roadmaps.lock().unwrap().push_back(answer);
    }

    /// Lets `calls` waiting or future calls through the gate.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn roadmap_calls(&self) -> usize {
        self.roadmap_calls.load(Ordering::SeqCst)
    }

    /// Calls that got past the gate and produced an answer.
    pub fn finished_calls(&self) -> usize {
        self.finished_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<Option<String>, AiError> {
        let document = request.parts.iter().find_map(|part| match part {
            Part::InlineData { data, .. } => Some(data.clone()),
            Part::Text(_) => None,
        });

        match &document {
            Some(_) => self.analysis_calls.fetch_add(1, Ordering::SeqCst),
            None => self.roadmap_calls.fetch_add(1, Ordering::SeqCst),
        };

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| AiError::Transport(e.to_string()))?
                .forget();
        }

        let answer = match document {
            Some(data) => self
                .analyses
                .lock()
                .unwrap()
                .get(&data)
                .cloned()
                .unwrap_or_else(|| Answer::Fail("unexpected document".to_string())),
            None => self
                .roadmaps
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Answer::Fail("unexpected roadmap request".to_string())),
        };

        self.finished_calls.fetch_add(1, Ordering::SeqCst);
        answer.into_result()
    }
}
