use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::{parse_bool, parse_csv};

/// Raw configuration as defined in a TOML file.
///
/// Durations are kept as strings (`"14m"`, `"100ms"`) and parsed by the
/// loader so errors can name the offending key.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub gemini: FileGeminiConfig,
    #[serde(default)]
    pub keep_alive: FileKeepAliveConfig,
    #[serde(default)]
    pub translation: FileTranslationConfig,
    #[serde(default)]
    pub rate_limit: FileRateLimitConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileKeepAliveConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTranslationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_text_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_pause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRateLimitConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_requests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_proxy_hops: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub self_url: Option<String>,
    pub keep_alive_startup_delay: Option<String>,
    pub keep_alive_interval: Option<String>,
    pub rate_limit_enabled: Option<bool>,
    pub rate_limit_window: Option<String>,
    pub rate_limit_max_requests: Option<u32>,
    pub rate_limit_trusted_proxy_hops: Option<usize>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            config_path: var("HOGEN_CONFIG_PATH").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            // Hosting platforms inject PORT; SERVER_PORT is the explicit override.
            server_port: var("SERVER_PORT")
                .or_else(|| var("PORT"))
                .and_then(|raw| raw.parse().ok()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL"),
            gemini_base_url: var("GEMINI_BASE_URL"),
            self_url: var("SELF_URL").or_else(|| var("RENDER_EXTERNAL_URL")),
            keep_alive_startup_delay: var("KEEP_ALIVE_STARTUP_DELAY"),
            keep_alive_interval: var("KEEP_ALIVE_INTERVAL"),
            rate_limit_enabled: var("RATE_LIMIT_ENABLED").and_then(|raw| parse_bool(&raw)),
            rate_limit_window: var("RATE_LIMIT_WINDOW"),
            rate_limit_max_requests: var("RATE_LIMIT_MAX_REQUESTS")
                .and_then(|raw| raw.parse().ok()),
            rate_limit_trusted_proxy_hops: var("RATE_LIMIT_TRUSTED_PROXY_HOPS")
                .and_then(|raw| raw.parse().ok()),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").map(|raw| parse_csv(&raw)),
            dev_mode: var("DEV_MODE").and_then(|raw| parse_bool(&raw)),
        }
    }
}
