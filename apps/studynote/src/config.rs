//! Application configuration from the environment.

use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Unset keys are reported when generation is attempted.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub gemini: GeminiConfig,
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studynote")
        .join("studynote.db")
}

impl AppConfig {
    /// Read configuration from the process environment, after loading a
    /// `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_path = var("STUDYNOTE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let base_url = var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if Url::parse(&base_url).is_err() {
            return Err(ConfigError::Invalid {
                name: "GEMINI_BASE_URL",
                value: base_url,
            });
        }

        Ok(Self {
            db_path,
            gemini: GeminiConfig {
                api_key: var("GEMINI_API_KEY"),
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_BASE_URL);
        assert!(config.db_path.ends_with("studynote/studynote.db"));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STUDYNOTE_DB_PATH", "/tmp/notes.db"),
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("GEMINI_BASE_URL", "http://localhost:8080"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/notes.db"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.gemini.base_url, "http://localhost:8080");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.gemini.api_key, None);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("GEMINI_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "GEMINI_BASE_URL", .. }));
    }
}
