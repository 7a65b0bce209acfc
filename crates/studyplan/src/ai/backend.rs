//! The seam between the AI clients and the remote service.

use async_trait::async_trait;
use serde_json::Value;

use super::error::AiError;

/// One part of a request's content.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64-encoded binary data with its MIME type.
    InlineData { mime_type: String, data: String },
}

/// A structured-output generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub parts: Vec<Part>,
    /// Schema the service is asked to shape its JSON answer after.
    pub response_schema: Value,
}

impl GenerateRequest {
    pub fn new(response_schema: Value) -> Self {
        Self {
            parts: Vec::new(),
            response_schema,
        }
    }

    pub fn inline_data(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.parts.push(Part::InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }
}

/// A generative model that answers with JSON text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Sends the request. `Ok(None)` means the service answered without text.
    async fn generate(&self, request: GenerateRequest) -> Result<Option<String>, AiError>;
}
