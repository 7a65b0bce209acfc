//! Local validation of structured answers before deserialization.

use serde_json::Value;

use super::error::AiError;

const ANALYSIS_SCHEMA_JSON: &str = include_str!("../../../../schema/analysis-response.json");
const ROADMAP_SCHEMA_JSON: &str = include_str!("../../../../schema/roadmap-response.json");

/// Which answer shape to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Analysis,
    Roadmap,
}

impl ResponseKind {
    fn schema_source(&self) -> &'static str {
        match self {
            ResponseKind::Analysis => ANALYSIS_SCHEMA_JSON,
            ResponseKind::Roadmap => ROADMAP_SCHEMA_JSON,
        }
    }
}

/// Parses `text` as JSON and checks it against the schema for `kind`.
pub fn parse_and_validate(kind: ResponseKind, text: &str) -> Result<Value, AiError> {
    let value: Value = serde_json::from_str(text)?;
    validate(kind, &value)?;
    Ok(value)
}

pub fn validate(kind: ResponseKind, value: &Value) -> Result<(), AiError> {
    let schema: Value = serde_json::from_str(kind.schema_source())
        .map_err(|e| AiError::SchemaMismatch(format!("Invalid embedded schema JSON: {}", e)))?;

    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| AiError::SchemaMismatch(format!("Failed to compile JSON schema: {}", e)))?;

    let error_messages: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    if !error_messages.is_empty() {
        return Err(AiError::SchemaMismatch(error_messages.join("; ")));
    }

    Ok(())
}
