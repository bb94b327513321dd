#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum_test::TestServer;
use hogen_config::Config;
use hogen_core::{
    Dialect, Direction, ProviderError, keep_alive::KeepAliveScheduler, translation::Translator,
};
use hogen_server::{infra::app_state::AppState, routes::create_app};

/// Deterministic translator: known phrases map to fixed output, anything
/// containing `fail` errors, everything else is tagged with the dialect.
#[derive(Debug, Default)]
pub struct StubTranslator {
    phrases: HashMap<&'static str, &'static str>,
    pub calls: AtomicUsize,
}

impl StubTranslator {
    pub fn with_phrases(phrases: &[(&'static str, &'static str)]) -> Self {
        Self {
            phrases: phrases.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        text: &str,
        direction: Direction,
        dialect: &'static Dialect,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1)).await;

        if text.contains("fail") {
            return Err(ProviderError::Api {
                status: 500,
                message: format!("could not translate {text}"),
            });
        }
        if let Some(translated) = self.phrases.get(text) {
            return Ok((*translated).to_string());
        }
        Ok(format!("[{}→{}:{}] {text}", direction.from(), direction.to(), dialect.code))
    }
}

#[derive(Debug)]
pub struct PanickingTranslator;

#[async_trait]
impl Translator for PanickingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _direction: Direction,
        _dialect: &'static Dialect,
    ) -> Result<String, ProviderError> {
        panic!("translator exploded");
    }
}

/// Config with rate limiting off and keep-alive disabled.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.rate_limit.enabled = false;
    config.translation.chunk_pause = Duration::from_millis(1);
    config
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn spawn_app(config: Config, translator: Arc<dyn Translator>) -> TestApp {
    let state = AppState::new(config, translator, KeepAliveScheduler::disabled());
    let server = TestServer::new(create_app(state.clone())).expect("test server");
    TestApp { server, state }
}

pub fn spawn_default_app() -> TestApp {
    spawn_app(test_config(), Arc::new(StubTranslator::default()))
}
