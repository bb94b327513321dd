use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, GeminiConfig, KeepAliveConfig, RateLimitConfig,
        ServerConfig, TranslationConfig,
    },
    sources::{EnvConfig, FileConfig},
    util::parse_duration,
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> =
    Lazy::new(|| vec![PathBuf::from("hogen.toml"), PathBuf::from("config/hogen.toml")]);

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Skip `.env` loading entirely.
    pub skip_env_file: bool,
}

/// Resolves [`Config`] with precedence environment > TOML file > defaults.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Load `.env`, then compose from the process environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        self.compose(EnvConfig::gather(), env_file_loaded)
    }

    /// Compose from an already gathered environment without touching `.env`.
    pub fn load_with_env(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        self.compose(env, false)
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }

        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };

        match result {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn compose(&self, env: EnvConfig, env_file_loaded: bool) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();
        let (file, config_path) = self.load_file_config(&env)?;

        if config_path.is_none() {
            warnings.push_with_hint(
                "No hogen.toml detected; using environment variables and defaults",
                "Create hogen.toml or set HOGEN_CONFIG_PATH to customise limits and timeouts",
            );
        }

        let FileConfig {
            server: file_server,
            gemini: file_gemini,
            keep_alive: file_keep_alive,
            translation: file_translation,
            rate_limit: file_rate_limit,
            cors: file_cors,
            dev_mode: file_dev_mode,
        } = file;

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or(server_defaults.host),
            port: env
                .server_port
                .or(file_server.port)
                .unwrap_or(server_defaults.port),
        };

        let gemini_defaults = GeminiConfig::default();
        let gemini = GeminiConfig {
            api_key: env
                .gemini_api_key
                .or(file_gemini.api_key.filter(|key| !key.trim().is_empty())),
            model: env
                .gemini_model
                .or(file_gemini.model)
                .unwrap_or(gemini_defaults.model),
            base_url: env
                .gemini_base_url
                .or(file_gemini.base_url)
                .unwrap_or(gemini_defaults.base_url),
            request_timeout: resolve_duration(
                "gemini.request_timeout",
                None,
                file_gemini.request_timeout,
                gemini_defaults.request_timeout,
            )?,
        };

        let keep_alive_defaults = KeepAliveConfig::default();
        let keep_alive = KeepAliveConfig {
            self_url: env
                .self_url
                .or(file_keep_alive.self_url)
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            startup_delay: resolve_duration(
                "keep_alive.startup_delay",
                env.keep_alive_startup_delay,
                file_keep_alive.startup_delay,
                keep_alive_defaults.startup_delay,
            )?,
            interval: resolve_duration(
                "keep_alive.interval",
                env.keep_alive_interval,
                file_keep_alive.interval,
                keep_alive_defaults.interval,
            )?,
            ping_timeout: resolve_duration(
                "keep_alive.ping_timeout",
                None,
                file_keep_alive.ping_timeout,
                keep_alive_defaults.ping_timeout,
            )?,
        };

        let translation_defaults = TranslationConfig::default();
        let translation = TranslationConfig {
            max_text_chars: file_translation
                .max_text_chars
                .unwrap_or(translation_defaults.max_text_chars),
            max_batch_items: file_translation
                .max_batch_items
                .unwrap_or(translation_defaults.max_batch_items),
            chunk_size: file_translation
                .chunk_size
                .unwrap_or(translation_defaults.chunk_size),
            chunk_pause: resolve_duration(
                "translation.chunk_pause",
                None,
                file_translation.chunk_pause,
                translation_defaults.chunk_pause,
            )?,
            item_timeout: resolve_duration(
                "translation.item_timeout",
                None,
                file_translation.item_timeout,
                translation_defaults.item_timeout,
            )?,
        };

        let rate_limit_defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            enabled: env
                .rate_limit_enabled
                .or(file_rate_limit.enabled)
                .unwrap_or(rate_limit_defaults.enabled),
            window: resolve_duration(
                "rate_limit.window",
                env.rate_limit_window,
                file_rate_limit.window,
                rate_limit_defaults.window,
            )?,
            max_requests: env
                .rate_limit_max_requests
                .or(file_rate_limit.max_requests)
                .unwrap_or(rate_limit_defaults.max_requests),
            trusted_proxy_hops: env
                .rate_limit_trusted_proxy_hops
                .or(file_rate_limit.trusted_proxy_hops)
                .unwrap_or(rate_limit_defaults.trusted_proxy_hops),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .or(file_cors.allowed_origins)
                .unwrap_or_default(),
        };

        let config = Config {
            server,
            gemini,
            keep_alive,
            translation,
            rate_limit,
            cors,
            dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        warnings.extend(validation::apply_guard_rails(&config)?);
        debug!(?config, warnings = warnings.len(), "configuration resolved");

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigLoadError::MissingConfig { path }),
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((FileConfig::default(), None)),
            },
        };

        let file = read_file_config(&path)?;
        Ok((file, Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_duration(
    key: &'static str,
    env: Option<String>,
    file: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match env.or(file) {
        Some(raw) => parse_duration(&raw).map_err(|source| ConfigLoadError::InvalidDuration {
            key,
            value: raw,
            source,
        }),
        None => Ok(default),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration `{value}` for {key}")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
