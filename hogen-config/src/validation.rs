use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use super::models::{Config, CorsConfig, KeepAliveConfig};

/// Common hosted-platform idle cutoff; intervals at or past it let the
/// instance sleep between pings.
const PLATFORM_IDLE_CUTOFF: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
    #[error("keep-alive URL `{url}` is invalid: {reason}")]
    InvalidSelfUrl { url: String, reason: String },
    #[error("invalid CORS origin `{origin}`")]
    InvalidCorsOrigin { origin: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigWarning> {
        self.items.iter()
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(needle))
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    require_nonzero("translation.chunk_size", config.translation.chunk_size)?;
    require_nonzero("translation.max_text_chars", config.translation.max_text_chars)?;
    require_nonzero("translation.max_batch_items", config.translation.max_batch_items)?;
    if config.translation.item_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroValue {
            field: "translation.item_timeout",
        });
    }

    if config.rate_limit.enabled {
        require_nonzero("rate_limit.max_requests", config.rate_limit.max_requests as usize)?;
        if config.rate_limit.window.is_zero() {
            return Err(ConfigGuardRailError::ZeroValue {
                field: "rate_limit.window",
            });
        }
    } else if !config.dev_mode {
        warnings.push_with_hint(
            "Rate limiting disabled; translation endpoints are unthrottled",
            "Set RATE_LIMIT_ENABLED=true outside local development",
        );
    }

    if !config.gemini.is_configured() {
        warnings.push_with_hint(
            "GEMINI_API_KEY not set; translation requests will fail",
            "Set GEMINI_API_KEY in the environment or the [gemini] section",
        );
    }

    check_keep_alive(&config.keep_alive, config.dev_mode, &mut warnings)?;
    check_cors(&config.cors, &mut warnings)?;

    Ok(warnings)
}

fn require_nonzero(field: &'static str, value: usize) -> Result<(), ConfigGuardRailError> {
    if value == 0 {
        Err(ConfigGuardRailError::ZeroValue { field })
    } else {
        Ok(())
    }
}

fn check_keep_alive(
    keep_alive: &KeepAliveConfig,
    dev_mode: bool,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    let Some(raw) = keep_alive.self_url.as_deref() else {
        if !dev_mode {
            warnings.push_with_hint(
                "No public URL configured; keep-alive self-ping is disabled",
                "Set SELF_URL (or RENDER_EXTERNAL_URL on Render) to keep the instance awake",
            );
        }
        return Ok(());
    };

    let parsed = Url::parse(raw).map_err(|err| ConfigGuardRailError::InvalidSelfUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigGuardRailError::InvalidSelfUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }

    if keep_alive.interval.is_zero() {
        return Err(ConfigGuardRailError::ZeroValue {
            field: "keep_alive.interval",
        });
    }
    if keep_alive.interval >= PLATFORM_IDLE_CUTOFF {
        warnings.push_with_hint(
            format!(
                "Keep-alive interval {} is not shorter than the 15 minute idle cutoff",
                humantime::format_duration(keep_alive.interval)
            ),
            "Use an interval such as 14m so pings land before the platform idles the service",
        );
    }

    Ok(())
}

fn check_cors(cors: &CorsConfig, warnings: &mut ConfigWarnings) -> Result<(), ConfigGuardRailError> {
    for origin in &cors.allowed_origins {
        if origin == "*" {
            continue;
        }
        HeaderValue::from_str(origin).map_err(|_| ConfigGuardRailError::InvalidCorsOrigin {
            origin: origin.clone(),
        })?;
        Url::parse(origin).map_err(|_| ConfigGuardRailError::InvalidCorsOrigin {
            origin: origin.clone(),
        })?;
    }

    if cors.is_wildcard_included() && cors.allowed_origins.len() > 1 {
        warnings.push("CORS wildcard `*` listed alongside explicit origins; any origin is allowed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.gemini.api_key = Some("key".into());
        config.keep_alive.self_url = Some("https://hogen.example.com".into());
        config
    }

    #[test]
    fn complete_config_has_no_warnings() {
        let warnings = apply_guard_rails(&configured()).expect("valid");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let mut config = configured();
        config.translation.chunk_size = 0;
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigGuardRailError::ZeroValue {
                field: "translation.chunk_size"
            }
        );
    }

    #[test]
    fn missing_key_and_url_warn() {
        let warnings = apply_guard_rails(&Config::default()).expect("valid");
        assert!(warnings.mentions("GEMINI_API_KEY"));
        assert!(warnings.mentions("keep-alive"));
    }

    #[test]
    fn dev_mode_skips_keep_alive_warning() {
        let mut config = Config::default();
        config.dev_mode = true;
        let warnings = apply_guard_rails(&config).expect("valid");
        assert!(!warnings.mentions("keep-alive"));
    }

    #[test]
    fn long_interval_warns() {
        let mut config = configured();
        config.keep_alive.interval = Duration::from_secs(20 * 60);
        let warnings = apply_guard_rails(&config).expect("valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.mentions("idle cutoff"));
    }

    #[test]
    fn non_http_self_url_is_rejected() {
        let mut config = configured();
        config.keep_alive.self_url = Some("ftp://hogen.example.com".into());
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidSelfUrl { .. })
        ));
    }

    #[test]
    fn malformed_origin_is_rejected() {
        let mut config = configured();
        config.cors.allowed_origins = vec!["not a url".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCorsOrigin { .. })
        ));
    }
}
