//! Self-ping scheduler.
//!
//! Hosting platforms that idle-stop quiet services are kept awake by having
//! the service `GET` its own public `/api/keep-alive` endpoint on a timer.
//!
//! ```text
//! Disabled                      (no public URL; start/stop are no-ops)
//! Idle --start--> Scheduled --startup delay--> Running --interval--> Running
//!   |                 |                           |
//!   +------stop-------+-----------stop------------+-----> Stopped
//! ```
//!
//! Ping outcomes are logged and counted but never change the state. The
//! scheduler does not touch the activity tracker; the keep-alive route is
//! filtered out of activity accounting by the server middleware instead.

mod pinger;

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use pinger::{HttpSelfPinger, PingOutcome, SelfPinger};

/// Wait after start before the first ping.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(5 * 60);
/// Gap between pings, below a 15 minute idle cutoff.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(14 * 60);
/// Ceiling on a single ping.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheduler lifecycle. See the module diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepAliveState {
    /// No public URL; nothing is ever scheduled.
    Disabled,
    /// Configured but not started.
    Idle,
    /// Waiting out the startup delay.
    Scheduled,
    /// Pinging on the interval.
    Running,
    /// Terminal; the task is cancelled.
    Stopped,
}

/// Inputs for [`KeepAliveScheduler::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveSettings {
    /// Public base URL of this deployment. `None` disables the scheduler.
    pub self_url: Option<String>,
    /// Wait before the first ping.
    pub startup_delay: Duration,
    /// Gap between pings.
    pub interval: Duration,
    /// Ceiling on one ping.
    pub ping_timeout: Duration,
}

impl Default for KeepAliveSettings {
    fn default() -> Self {
        Self {
            self_url: None,
            startup_delay: DEFAULT_STARTUP_DELAY,
            interval: DEFAULT_INTERVAL,
            ping_timeout: DEFAULT_PING_TIMEOUT,
        }
    }
}

/// Point-in-time view of the scheduler for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeepAliveStatus {
    /// Current state.
    pub state: KeepAliveState,
    /// Whether a public URL is configured.
    pub enabled: bool,
    /// URL being pinged.
    pub target: Option<String>,
    /// Configured startup delay.
    pub startup_delay_seconds: u64,
    /// Configured interval.
    pub interval_seconds: u64,
    /// Pings attempted.
    pub pings_sent: u64,
    /// Pings that did not return 200.
    pub pings_failed: u64,
    /// When the last ping finished.
    pub last_ping_at: Option<DateTime<Utc>>,
    /// Result of the last ping.
    pub last_outcome: Option<PingOutcome>,
}

#[derive(Debug)]
struct Inner {
    state: KeepAliveState,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
    pings_sent: u64,
    pings_failed: u64,
    last_ping_at: Option<DateTime<Utc>>,
    last_outcome: Option<PingOutcome>,
}

impl Inner {
    fn new(state: KeepAliveState) -> Self {
        Self {
            state,
            cancel: None,
            task: None,
            pings_sent: 0,
            pings_failed: 0,
            last_ping_at: None,
            last_outcome: None,
        }
    }
}

/// Owns the self-ping task and its state machine.
///
/// Cheap to clone; clones share the same task and state.
#[derive(Debug, Clone)]
pub struct KeepAliveScheduler {
    pinger: Option<Arc<dyn SelfPinger>>,
    startup_delay: Duration,
    interval: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl KeepAliveScheduler {
    /// Build from settings, pinging over HTTP when a public URL is present.
    pub fn new(settings: &KeepAliveSettings) -> Result<Self, reqwest::Error> {
        let Some(self_url) = settings
            .self_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Ok(Self::disabled());
        };

        let pinger = HttpSelfPinger::new(self_url, settings.ping_timeout)?;
        Ok(Self::with_pinger(
            Arc::new(pinger),
            settings.startup_delay,
            settings.interval,
        ))
    }

    /// Enabled scheduler driven by a custom pinger.
    pub fn with_pinger(
        pinger: Arc<dyn SelfPinger>,
        startup_delay: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            pinger: Some(pinger),
            startup_delay,
            interval,
            inner: Arc::new(Mutex::new(Inner::new(KeepAliveState::Idle))),
        }
    }

    /// Scheduler that never pings.
    pub fn disabled() -> Self {
        Self {
            pinger: None,
            startup_delay: DEFAULT_STARTUP_DELAY,
            interval: DEFAULT_INTERVAL,
            inner: Arc::new(Mutex::new(Inner::new(KeepAliveState::Disabled))),
        }
    }

    /// `Idle -> Scheduled`. Returns `false` without side effects from any
    /// other state. Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let Some(pinger) = self.pinger.clone() else {
            debug!("keep-alive disabled; no public URL configured");
            return false;
        };

        let mut inner = self.inner.lock();
        if inner.state != KeepAliveState::Idle {
            debug!(state = ?inner.state, "keep-alive start ignored");
            return false;
        }

        let cancel = CancellationToken::new();
        inner.state = KeepAliveState::Scheduled;
        inner.cancel = Some(cancel.clone());
        inner.task = Some(tokio::spawn(run(
            Arc::clone(&self.inner),
            Arc::clone(&pinger),
            self.startup_delay,
            self.interval,
            cancel,
        )));

        info!(
            target_url = pinger.target(),
            startup_delay_secs = self.startup_delay.as_secs(),
            interval_secs = self.interval.as_secs(),
            "keep-alive scheduled"
        );
        true
    }

    /// Move to `Stopped` and cancel any pending work. Idempotent; returns
    /// whether this call changed the state.
    pub fn stop(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            KeepAliveState::Disabled | KeepAliveState::Stopped => false,
            KeepAliveState::Idle | KeepAliveState::Scheduled | KeepAliveState::Running => {
                inner.state = KeepAliveState::Stopped;
                if let Some(cancel) = inner.cancel.take() {
                    cancel.cancel();
                }
                if let Some(task) = inner.task.take() {
                    task.abort();
                }
                info!("keep-alive stopped");
                true
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> KeepAliveState {
        self.inner.lock().state
    }

    /// Whether a pinger is configured.
    pub fn is_enabled(&self) -> bool {
        self.pinger.is_some()
    }

    /// Snapshot of state, configuration and counters.
    pub fn status(&self) -> KeepAliveStatus {
        let inner = self.inner.lock();
        KeepAliveStatus {
            state: inner.state,
            enabled: self.pinger.is_some(),
            target: self.pinger.as_ref().map(|pinger| pinger.target().to_string()),
            startup_delay_seconds: self.startup_delay.as_secs(),
            interval_seconds: self.interval.as_secs(),
            pings_sent: inner.pings_sent,
            pings_failed: inner.pings_failed,
            last_ping_at: inner.last_ping_at,
            last_outcome: inner.last_outcome.clone(),
        }
    }
}

async fn run(
    inner: Arc<Mutex<Inner>>,
    pinger: Arc<dyn SelfPinger>,
    startup_delay: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(startup_delay) => {}
    }

    {
        let mut guard = inner.lock();
        if guard.state != KeepAliveState::Scheduled {
            return;
        }
        guard.state = KeepAliveState::Running;
    }
    info!(target_url = pinger.target(), "keep-alive running");

    let mut ticker = tokio::time::interval_at(Instant::now(), interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = pinger.ping() => outcome,
        };
        record_ping(&inner, pinger.target(), outcome);
    }

    debug!("keep-alive task exiting");
}

fn record_ping(inner: &Mutex<Inner>, target: &str, outcome: PingOutcome) {
    if outcome.is_success() {
        info!(target_url = target, outcome = %outcome, "keep-alive ping");
    } else {
        warn!(target_url = target, outcome = %outcome, "keep-alive ping failed");
    }

    let mut guard = inner.lock();
    guard.pings_sent += 1;
    if !outcome.is_success() {
        guard.pings_failed += 1;
    }
    guard.last_ping_at = Some(Utc::now());
    guard.last_outcome = Some(outcome);
}
