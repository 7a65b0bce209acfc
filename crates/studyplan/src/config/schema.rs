use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variables consulted for the API key when none is configured.
pub const DEFAULT_API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    /// Directory holding the persisted session state.
    #[serde(default)]
    pub data_directory: Option<String>,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_directory: None,
            ai: AiConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    /// Resolves the data directory, falling back to the platform data dir.
    pub fn data_directory(&self) -> PathBuf {
        match &self.data_directory {
            Some(dir) if !dir.is_empty() => PathBuf::from(crate::secrets::expand_home(dir)),
            _ => default_data_directory(),
        }
    }
}

/// Location of the config file when none is given explicitly.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
        .unwrap_or_else(std::env::temp_dir)
        .join("studyplan")
        .join("config.json")
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join("studyplan")
}

/// Remote generative-AI service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key given inline (quick local testing only).
    #[serde(default)]
    pub api_key: Option<String>,
    /// File containing the API key.
    #[serde(default)]
    pub api_key_file: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env_var: Option<String>,
    /// Per-request timeout. Requests wait indefinitely when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            api_key_file: None,
            api_key_env_var: None,
            request_timeout_secs: None,
        }
    }
}

/// Limits applied to uploads before a file is tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_accepted_mime_types")]
    pub accepted_mime_types: Vec<String>,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_accepted_mime_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            accepted_mime_types: default_accepted_mime_types(),
        }
    }
}

impl UploadConfig {
    /// Returns the reason a payload is refused, if any.
    pub fn rejection_reason(&self, mime_type: &str, size: u64) -> Option<String> {
        if !self
            .accepted_mime_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime_type))
        {
            return Some(format!(
                "unsupported type '{}' (accepted: {})",
                mime_type,
                self.accepted_mime_types.join(", ")
            ));
        }
        if size > self.max_file_size_bytes {
            return Some(format!(
                "file is {} bytes, limit is {} bytes",
                size, self.max_file_size_bytes
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert_eq!(config.upload.max_file_size_bytes, 10 * 1024 * 1024);
        assert!(config.data_directory().ends_with("studyplan"));
        assert!(default_config_path().ends_with("studyplan/config.json"));
    }

    #[test]
    fn test_explicit_data_directory() {
        let config = Config {
            data_directory: Some("/var/lib/studyplan".to_string()),
            ..Config::default()
        };
        assert_eq!(config.data_directory(), PathBuf::from("/var/lib/studyplan"));
    }

    #[test]
    fn test_rejection_reason() {
        let upload = UploadConfig::default();
        assert!(upload.rejection_reason("application/pdf", 1024).is_none());
        assert!(upload.rejection_reason("APPLICATION/PDF", 1024).is_none());
        assert!(upload
            .rejection_reason("image/png", 1024)
            .unwrap()
            .contains("unsupported type"));
        assert!(upload
            .rejection_reason("application/pdf", 11 * 1024 * 1024)
            .unwrap()
            .contains("limit"));
    }
}
