use thiserror::Error;

/// Message used when the service answers without any text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "API boş yanıt döndürdü.";

/// Errors from calls to the remote generative service.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{}", EMPTY_RESPONSE_MESSAGE)]
    EmptyResponse,

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Response does not match the expected schema: {0}")]
    SchemaMismatch(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Transport(e.to_string())
    }
}
