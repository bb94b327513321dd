//! # Hogen Server
//!
//! Translates between standard Japanese (標準語) and regional dialects (方言)
//! over HTTP, backed by Google Gemini.
//!
//! ## Overview
//!
//! - **Single translation**: `POST /api/translate`
//! - **Batch translation**: `POST /api/translate/batch`, at most five provider calls in flight
//! - **Keep-alive**: optional self-ping so idle-stopping hosts keep the instance warm
//! - **Status**: `/`, `/api/health`, `/api/stats`, `/api/dialects`

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use hogen_config::{Config, ConfigLoad, ConfigLoader};
use hogen_server::{infra::app_state::AppState, routes};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "hogen-server")]
#[command(about = "Standard Japanese and regional dialect translation service")]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a hogen.toml configuration file
    #[arg(short, long, env = "HOGEN_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();
    init_tracing();
    let config = load_runtime_config(&args)?;
    run_server(config).await
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    info!(
        translation.max_text_chars = config.translation.max_text_chars,
        translation.max_batch_items = config.translation.max_batch_items,
        translation.chunk_size = config.translation.chunk_size,
        rate_limit.enabled = config.rate_limit.enabled,
        rate_limit.max_requests = config.rate_limit.max_requests,
        keep_alive.enabled = config.keep_alive.self_url.is_some(),
        "configuration in effect"
    );

    Ok(config)
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = AppState::from_config(config)?;
    let keep_alive = state.keep_alive.clone();
    let router = routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting Hogen dialect translation server on {}", addr);

    keep_alive.start();

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        keep_alive.stop();
        info!("shutdown signal received; draining connections");
    })
    .await
    .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_overrides() {
        let args = ServeArgs::try_parse_from([
            "hogen-server",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--config",
            "conf/hogen.toml",
        ])
        .expect("valid args");

        assert_eq!(args.port, Some(8080));
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.config, Some(PathBuf::from("conf/hogen.toml")));
        assert!(args.env_file.is_none());
    }
}
