//! Clients for the remote generative-AI service.
//!
//! [`GenerativeBackend`] is the only seam that touches the network.
//! [`AnalysisClient`] and [`RoadmapClient`] build prompts on top of it and
//! validate the structured answers before handing them out.

pub mod analysis;
pub mod backend;
pub mod error;
pub mod gemini;
pub mod roadmap;
pub mod validation;

pub use analysis::AnalysisClient;
pub use backend::{GenerateRequest, GenerativeBackend, Part};
pub use error::AiError;
pub use gemini::GeminiBackend;
pub use roadmap::RoadmapClient;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::backend::{GenerateRequest, GenerativeBackend};
    use super::error::AiError;

    /// Answers requests from a queue and records what it was sent.
    #[derive(Default)]
    pub struct ScriptedBackend {
        answers: Mutex<VecDeque<Result<Option<String>, AiError>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_text(&self, text: &str) {
            self.answers.lock().unwrap().push_back(Ok(Some(text.to_string())));
        }

        pub fn push_empty(&self) {
            self.answers.lock().unwrap().push_back(Ok(None));
        }

        pub fn push_error(&self, error: AiError) {
            self.answers.lock().unwrap().push_back(Err(error));
        }

        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        async fn generate(&self, request: GenerateRequest) -> Result<Option<String>, AiError> {
            self.requests.lock().unwrap().push(request);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::Transport("no scripted answer".to_string())))
        }
    }
}
