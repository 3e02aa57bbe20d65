use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Fully-resolved application configuration. The binary resolves the file
/// location and hands the parsed value down; core crates never read storage
/// or the environment themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub search: SearchCredentials,
    #[serde(default)]
    pub searchad: SearchAdCredentials,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub record: RecordConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Naver Open API credentials, sent as static request headers.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Naver SearchAd credentials. All three fields must be present for the
/// volume enrichment step to run; otherwise the step is skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchAdCredentials {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub customer_id: Option<String>,
}

impl SearchAdCredentials {
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some() && self.customer_id.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "blogrank.db".to_string()
}

/// Remote record sink. Absent URL disables the sink.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordConfig {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            batch_pause_ms: default_batch_pause_ms(),
        }
    }
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    20
}

fn default_batch_pause_ms() -> u64 {
    1500
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.client_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "search.client_id".to_string(),
            });
        }
        if self.search.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "search.client_secret".to_string(),
            });
        }
        if self.limits.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.probe_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let raw = r#"
            [search]
            client_id = "id"
            client_secret = "secret"
        "#;
        let config = AppConfig::from_toml_str(raw).unwrap();
        assert!(!config.searchad.is_complete());
        assert_eq!(config.storage.database_path, "blogrank.db");
        assert_eq!(config.limits.probe_timeout_secs, 10);
        assert_eq!(config.limits.batch_pause_ms, 1500);
        assert!(config.record.webhook_url.is_none());
    }

    #[test]
    fn test_full_searchad_section_enables_enrichment() {
        let raw = r#"
            [search]
            client_id = "id"
            client_secret = "secret"

            [searchad]
            api_key = "license"
            secret_key = "hmac-secret"
            customer_id = "12345"
        "#;
        let config = AppConfig::from_toml_str(raw).unwrap();
        assert!(config.searchad.is_complete());
    }

    #[test]
    fn test_partial_searchad_section_is_incomplete() {
        let raw = r#"
            [search]
            client_id = "id"
            client_secret = "secret"

            [searchad]
            api_key = "license"
        "#;
        let config = AppConfig::from_toml_str(raw).unwrap();
        assert!(!config.searchad.is_complete());
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let raw = r#"
            [search]
            client_id = ""
            client_secret = "secret"
        "#;
        assert!(matches!(
            AppConfig::from_toml_str(raw),
            Err(ConfigError::MissingField { .. })
        ));
    }
}
