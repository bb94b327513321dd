use std::{fmt, sync::Arc, time::Instant};

use anyhow::Context;
use chrono::{DateTime, Utc};
use hogen_config::Config;
use hogen_core::{
    DialectCatalog,
    activity::ActivityTracker,
    batch::BatchOrchestrator,
    keep_alive::KeepAliveScheduler,
    translation::{GeminiTranslator, Translator, UnconfiguredTranslator},
    validation::ValidationLimits,
};
use tracing::{info, warn};

use super::middleware::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: DialectCatalog,
    pub limits: ValidationLimits,
    pub translator: Arc<dyn Translator>,
    pub orchestrator: Arc<BatchOrchestrator>,
    pub activity: Arc<ActivityTracker>,
    pub keep_alive: KeepAliveScheduler,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("translator", &self.translator)
            .field("keep_alive", &self.keep_alive.state())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire state from explicit collaborators. Tests inject stub translators
    /// and schedulers here.
    pub fn new(
        config: Config,
        translator: Arc<dyn Translator>,
        keep_alive: KeepAliveScheduler,
    ) -> Self {
        let orchestrator = BatchOrchestrator::new(Arc::clone(&translator), config.batch_settings());
        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| {
                Arc::new(RateLimiter::new(
                    config.rate_limit.window,
                    config.rate_limit.max_requests,
                    config.rate_limit.trusted_proxy_hops,
                ))
            });

        Self {
            limits: config.validation_limits(),
            config: Arc::new(config),
            catalog: DialectCatalog::standard(),
            translator,
            orchestrator: Arc::new(orchestrator),
            activity: Arc::new(ActivityTracker::new()),
            keep_alive,
            rate_limiter,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Build the production translator and scheduler from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let translator: Arc<dyn Translator> = match config.gemini_settings() {
            Some(settings) => {
                info!(model = %settings.model, "gemini translator configured");
                Arc::new(
                    GeminiTranslator::new(settings)
                        .context("failed to build Gemini HTTP client")?,
                )
            }
            None => {
                warn!("GEMINI_API_KEY not set; translation endpoints will fail");
                Arc::new(UnconfiguredTranslator)
            }
        };

        let keep_alive = KeepAliveScheduler::new(&config.keep_alive_settings())
            .context("failed to build keep-alive HTTP client")?;

        Ok(Self::new(config, translator, keep_alive))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
