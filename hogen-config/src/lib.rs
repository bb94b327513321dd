//! Configuration for the Hogen dialect translation service.
//!
//! [`ConfigLoader`] reads an optional `.env` file, an optional `hogen.toml`,
//! and the process environment, then composes a typed [`Config`] and runs
//! guard rails over it. Environment values win over the file and the file
//! wins over built-in defaults.

pub mod loader;
pub mod models;
pub mod sources;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    Config, ConfigMetadata, CorsConfig, GeminiConfig, KeepAliveConfig, RateLimitConfig,
    ServerConfig, TranslationConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
