use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::AnalyzerError;

/// Environment variable holding the Google API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Immutable application configuration, loaded once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// API key for the Gemini endpoint (falls back to GOOGLE_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// Model identifier (e.g., "gemini-1.5-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generative language API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the source priority.
    pub fn load() -> Result<Self, AnalyzerError> {
        load_config()
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Set the request timeout, keeping sub-second precision
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }

    /// Build a configuration around an explicit API key, using defaults elsewhere
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with CALORIE_COUNTER__ prefix
/// 2. calorie_counter.toml file in current directory
/// 3. Default values
///
/// The API key is required. When neither source sets it, GOOGLE_API_KEY is used;
/// if that is also missing the load fails and nothing else should start.
pub fn load_config() -> Result<AppConfig, AnalyzerError> {
    let settings = Config::builder()
        .add_source(File::with_name("calorie_counter").required(false))
        // CALORIE_COUNTER__MODEL, CALORIE_COUNTER__TIMEOUT_MS, ...
        .add_source(
            Environment::with_prefix("CALORIE_COUNTER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;
    config.api_key = resolve_api_key(&config.api_key, std::env::var(API_KEY_ENV).ok())?;
    Ok(config)
}

/// Pick the configured key, else the environment key; blank values count as missing.
pub(crate) fn resolve_api_key(
    configured: &str,
    from_env: Option<String>,
) -> Result<String, AnalyzerError> {
    if !configured.trim().is_empty() {
        return Ok(configured.trim().to_string());
    }

    from_env
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            AnalyzerError::Configuration(format!(
                "Please set the Google API key in the {} environment variable.",
                API_KEY_ENV
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.temperature, 0.4);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_with_api_key() {
        let config = AppConfig::with_api_key("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_set_timeout_keeps_fractional_seconds() {
        let mut config = AppConfig::default();
        config.set_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.timeout(), Duration::from_millis(1500));

        config.set_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_configured_key_wins_over_env() {
        let key = resolve_api_key("from-file", Some("from-env".to_string())).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn test_env_key_used_when_not_configured() {
        let key = resolve_api_key("", Some(" from-env ".to_string())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = resolve_api_key("   ", None);
        match result {
            Err(err @ AnalyzerError::Configuration(_)) => {
                let message = err.to_string();
                assert!(message.contains("GOOGLE_API_KEY"));
                assert_eq!(message.lines().count(), 1);
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }

        assert!(resolve_api_key("", Some("  ".to_string())).is_err());
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings = Config::builder()
            .set_override("model", "gemini-2.0-flash")
            .unwrap()
            .set_override("timeout_ms", 2500_i64)
            .unwrap()
            .build()
            .unwrap();

        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.max_tokens, 2048);
    }
}
