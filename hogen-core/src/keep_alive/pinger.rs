use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Serialize;

use crate::api::routes;

/// Result of one self-ping. Never fed back into scheduler state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PingOutcome {
    /// HTTP 200.
    Ok {
        /// Always 200.
        status: u16,
    },
    /// Any other HTTP status.
    UnexpectedStatus {
        /// Status returned.
        status: u16,
    },
    /// Transport failure.
    Failed {
        /// Transport error text.
        reason: String,
    },
    /// No answer within the ping timeout.
    TimedOut,
}

impl PingOutcome {
    /// Whether the ping got a 200.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { status } => write!(f, "ok ({status})"),
            Self::UnexpectedStatus { status } => write!(f, "unexpected status {status}"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Issues one self-ping.
#[async_trait]
pub trait SelfPinger: Send + Sync + fmt::Debug {
    /// Ping once. Never errors; failures are reported in the outcome.
    async fn ping(&self) -> PingOutcome;

    /// Full URL being pinged, for logs and status output.
    fn target(&self) -> &str;
}

/// Issues `GET {self_url}/api/keep-alive` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpSelfPinger {
    client: reqwest::Client,
    target: String,
}

impl HttpSelfPinger {
    /// Pinger for `self_url` with a per-request `timeout`.
    pub fn new(self_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hogen-keep-alive/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            target: format!("{}{}", self_url.trim_end_matches('/'), routes::KEEP_ALIVE),
        })
    }
}

#[async_trait]
impl SelfPinger for HttpSelfPinger {
    async fn ping(&self) -> PingOutcome {
        match self.client.get(&self.target).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => PingOutcome::Ok {
                status: response.status().as_u16(),
            },
            Ok(response) => PingOutcome::UnexpectedStatus {
                status: response.status().as_u16(),
            },
            Err(err) if err.is_timeout() => PingOutcome::TimedOut,
            Err(err) => PingOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    fn target(&self) -> &str {
        &self.target
    }
}
