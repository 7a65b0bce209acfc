//! Secret resolution for the AI service API key.
//!
//! Secrets are resolved from multiple sources in priority order:
//!
//! 1. **Direct value** - For quick local testing (e.g., `"api_key": "..."`)
//! 2. **File reference** - For Docker secrets pattern (e.g., `"api_key_file": "/run/secrets/gemini"`)
//! 3. **Env var reference** - For CI and production (e.g., `"api_key_env_var": "GEMINI_API_KEY"`)

use secrecy::SecretString;
use std::fs;

use crate::config::schema::{AiConfig, DEFAULT_API_KEY_ENV_VARS};

/// Error type for secret resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },

    #[error("No API key configured: set ai.api_key, ai.api_key_file, ai.api_key_env_var or one of {candidates}")]
    NoApiKey { candidates: String },
}

/// Result type for secret resolution.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from multiple sources in priority order:
/// 1. Direct value (if provided and non-empty)
/// 2. File contents (if path provided)
/// 3. Environment variable (if name provided)
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(SecretString::from(value.to_string()));
        }
    }

    if let Some(path) = file_path {
        if !path.is_empty() {
            let expanded = expand_home(path);
            return match fs::read_to_string(&expanded) {
                Ok(content) => Ok(SecretString::from(content.trim().to_string())),
                Err(e) => Err(SecretError::FileReadError {
                    path: expanded,
                    source: e,
                }),
            };
        }
    }

    if let Some(var_name) = env_var {
        if !var_name.is_empty() {
            return match std::env::var(var_name) {
                // Env vars may carry trailing newlines
                Ok(value) => Ok(SecretString::from(value.trim())),
                Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                    name: var_name.to_string(),
                }),
                Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                    name: var_name.to_string(),
                }),
            };
        }
    }

    Err(SecretError::NoSourceProvided)
}

/// Resolves a secret, returning None if no source is provided instead of an error.
pub fn resolve_secret_optional(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<Option<SecretString>> {
    match resolve_secret(direct, file_path, env_var) {
        Ok(secret) => Ok(Some(secret)),
        Err(SecretError::NoSourceProvided) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolves the API key for the remote AI service.
///
/// Explicitly configured sources win. Without any, the well-known
/// environment variables are tried in order.
pub fn resolve_api_key(config: &AiConfig) -> Result<SecretString> {
    if let Some(secret) = resolve_secret_optional(
        config.api_key.as_deref(),
        config.api_key_file.as_deref(),
        config.api_key_env_var.as_deref(),
    )? {
        return Ok(secret);
    }

    for name in DEFAULT_API_KEY_ENV_VARS {
        match resolve_secret(None, None, Some(name)) {
            Ok(secret) => return Ok(secret),
            Err(SecretError::EnvVarNotSet { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(SecretError::NoApiKey {
        candidates: DEFAULT_API_KEY_ENV_VARS.join(", "),
    })
}

/// Expands `~` to the user's home directory.
///
/// Only `~` and `~/path` are supported, not `~user/path`.
pub(crate) fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            if path == "~" {
                return home.to_string_lossy().into_owned();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
