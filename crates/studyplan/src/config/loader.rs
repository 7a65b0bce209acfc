use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

/// Loads the config at `path`, or returns the defaults when the file does
/// not exist. Any other read or validation failure is an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(path)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let base_url = config.ai.base_url.as_str();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::Validation {
            message: format!("ai.base_url must be an http(s) URL, got '{}'", base_url),
        });
    }

    if config.ai.model.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "ai.model must not be empty".to_string(),
        });
    }

    if config.upload.max_file_size_bytes == 0 {
        return Err(ConfigError::Validation {
            message: "upload.max_file_size_bytes must be greater than zero".to_string(),
        });
    }

    if config.upload.accepted_mime_types.is_empty() {
        return Err(ConfigError::Validation {
            message: "upload.accepted_mime_types must list at least one type".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "data_directory": "/tmp/studyplan",
            "ai": {
                "model": "gemini-2.5-flash",
                "api_key_env_var": "MY_GEMINI_KEY",
                "request_timeout_secs": 90
            },
            "upload": {
                "max_file_size_bytes": 5242880
            }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.data_directory.as_deref(), Some("/tmp/studyplan"));
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(config.ai.base_url, crate::config::schema::DEFAULT_BASE_URL);
        assert_eq!(config.ai.request_timeout_secs, Some(90));
        assert_eq!(config.upload.max_file_size_bytes, 5_242_880);
        assert_eq!(config.upload.accepted_mime_types, vec!["application/pdf"]);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.ai.model, crate::config::schema::DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_version() {
        let result = load_config_from_str(r#"{ "version": "2.0" }"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "worker_count": 4 }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_zero_file_size_rejected() {
        let result = load_config_from_str(r#"{ "upload": { "max_file_size_bytes": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = load_config_from_str(r#"{ "ai": { "base_url": "ftp://example.com" } }"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let result = load_config_from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config_or_default(dir.path().join("config.json")).unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ai": { "model": "gemini-2.5-pro" } }"#).unwrap();

        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.ai.model, "gemini-2.5-pro");
    }
}
