//! Runtime Configuration
//!
//! Read once at startup from `window.__NTU_CONFIG__`, falling back to values
//! baked in at build time (`NTU_API_BASE_URL`, `NTU_GOOGLE_CLIENT_ID`).

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// JS global holding the deployment's config object
const CONFIG_GLOBAL: &str = "__NTU_CONFIG__";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("apiBaseUrl must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("pageSize must be greater than zero")]
    ZeroPageSize,
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
    #[error("malformed runtime config: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub api_base_url: String,
    /// OAuth client id for Google sign-in; the button is hidden when unset
    pub google_client_id: Option<String>,
    /// Staleness window for cached list pages
    pub stale_time_ms: u32,
    pub toast_timeout_ms: u32,
    pub page_size: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("NTU_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            google_client_id: option_env!("NTU_GOOGLE_CLIENT_ID").map(str::to_string),
            stale_time_ms: 30_000,
            toast_timeout_ms: 4_000,
            page_size: 10,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Check values and normalize the base URL (no trailing slash)
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let base = self.api_base_url.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url));
        }
        self.api_base_url = base;
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.google_client_id = self
            .google_client_id
            .filter(|id| !id.trim().is_empty());
        self.level_filter()?;
        Ok(self)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Parse a config object given as JSON (missing keys take defaults)
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value::<AppConfig>(value)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?
            .validate()
    }

    /// Load from the page, or the build-time defaults when the global is absent
    pub fn load() -> Result<Self, ConfigError> {
        let global = web_sys::window()
            .and_then(|win| js_sys::Reflect::get(&win, &CONFIG_GLOBAL.into()).ok())
            .filter(|value| !value.is_undefined() && !value.is_null());

        match global {
            Some(value) => serde_wasm_bindgen::from_value::<AppConfig>(value)
                .map_err(|e| ConfigError::Malformed(e.to_string()))?
                .validate(),
            None => AppConfig::default().validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = AppConfig::from_json(json!({ "apiBaseUrl": "https://api.ntucoder.edu.vn/" })).unwrap();
        assert_eq!(config.api_base_url, "https://api.ntucoder.edu.vn");
        assert_eq!(config.stale_time_ms, 30_000);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = AppConfig::from_json(json!({ "apiBaseUrl": "ftp://example" })).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("ftp://example".to_string()));
    }

    #[test]
    fn test_rejects_zero_page_size_and_bad_level() {
        assert_eq!(
            AppConfig::from_json(json!({ "pageSize": 0 })).unwrap_err(),
            ConfigError::ZeroPageSize
        );
        assert_eq!(
            AppConfig::from_json(json!({ "logLevel": "loud" })).unwrap_err(),
            ConfigError::InvalidLogLevel("loud".to_string())
        );
    }

    #[test]
    fn test_blank_google_client_id_is_dropped() {
        let config = AppConfig::from_json(json!({ "googleClientId": "  " })).unwrap();
        assert_eq!(config.google_client_id, None);
    }

    #[test]
    fn test_malformed_config() {
        let err = AppConfig::from_json(json!({ "pageSize": "ten" })).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }
}
