use std::{fmt, path::PathBuf, time::Duration};

use hogen_core::{
    batch::BatchSettings,
    keep_alive::KeepAliveSettings,
    translation::GeminiSettings,
    validation::ValidationLimits,
};

/// Fully resolved service configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub keep_alive: KeepAliveConfig,
    pub translation: TranslationConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            chunk_size: self.translation.chunk_size,
            chunk_pause: self.translation.chunk_pause,
            item_timeout: self.translation.item_timeout,
        }
    }

    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_text_chars: self.translation.max_text_chars,
            max_batch_items: self.translation.max_batch_items,
        }
    }

    /// Provider settings, or `None` when no API key is configured.
    pub fn gemini_settings(&self) -> Option<GeminiSettings> {
        let api_key = self.gemini.api_key.as_deref()?;
        Some(GeminiSettings {
            api_key: api_key.to_string(),
            model: self.gemini.model.clone(),
            base_url: self.gemini.base_url.clone(),
            request_timeout: self.gemini.request_timeout,
        })
    }

    pub fn keep_alive_settings(&self) -> KeepAliveSettings {
        KeepAliveSettings {
            self_url: self.keep_alive.self_url.clone(),
            startup_delay: self.keep_alive.startup_delay,
            interval: self.keep_alive.interval,
            ping_timeout: self.keep_alive.ping_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        let defaults = GeminiSettings::new(String::new());
        Self {
            api_key: None,
            model: defaults.model,
            base_url: defaults.base_url,
            request_timeout: defaults.request_timeout,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Public base URL of this deployment; keep-alive is disabled without it.
    pub self_url: Option<String>,
    pub startup_delay: Duration,
    pub interval: Duration,
    pub ping_timeout: Duration,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        let defaults = KeepAliveSettings::default();
        Self {
            self_url: defaults.self_url,
            startup_delay: defaults.startup_delay,
            interval: defaults.interval,
            ping_timeout: defaults.ping_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    pub max_text_chars: usize,
    pub max_batch_items: usize,
    pub chunk_size: usize,
    pub chunk_pause: Duration,
    pub item_timeout: Duration,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let limits = ValidationLimits::default();
        let batch = BatchSettings::default();
        Self {
            max_text_chars: limits.max_text_chars,
            max_batch_items: limits.max_batch_items,
            chunk_size: batch.chunk_size,
            chunk_pause: batch.chunk_pause,
            item_timeout: batch.item_timeout,
        }
    }
}

/// Process-wide fixed-window limit per client address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub window: Duration,
    pub max_requests: u32,
    /// Reverse proxies in front of the service. The client address is read
    /// this many entries from the right of `X-Forwarded-For`; `0` ignores the
    /// header and keys on the socket peer.
    pub trusted_proxy_hops: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_secs(15 * 60),
            max_requests: 100,
            trusted_proxy_hops: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.is_wildcard_included()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_core_defaults() {
        let config = Config::default();
        assert_eq!(config.batch_settings(), BatchSettings::default());
        assert_eq!(config.validation_limits(), ValidationLimits::default());
        assert_eq!(config.keep_alive_settings(), KeepAliveSettings::default());
        assert!(config.gemini_settings().is_none());
        assert_eq!(config.rate_limit.max_requests, 100);
    }

    #[test]
    fn gemini_settings_carry_key_and_model() {
        let mut config = Config::default();
        config.gemini.api_key = Some("k".into());
        config.gemini.model = "gemini-2.0-flash".into();

        let settings = config.gemini_settings().expect("configured");
        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.model, "gemini-2.0-flash");
    }

    #[test]
    fn gemini_debug_hides_key() {
        let config = GeminiConfig {
            api_key: Some("very-secret".into()),
            ..GeminiConfig::default()
        };
        assert!(!format!("{config:?}").contains("very-secret"));
    }

    #[test]
    fn empty_origin_list_allows_any() {
        assert!(CorsConfig::default().allows_any_origin());
        let cors = CorsConfig {
            allowed_origins: vec!["https://hogen.example.com".into()],
        };
        assert!(!cors.allows_any_origin());
    }
}
