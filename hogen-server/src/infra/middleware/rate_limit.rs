use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use hogen_core::api::routes;
use tracing::{debug, warn};

use crate::infra::{app_state::AppState, errors::AppError};

/// Expired windows are swept once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32, reset_after: Duration },
    Limited { retry_after: Duration },
}

/// In-memory fixed-window limiter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    trusted_proxy_hops: usize,
    entries: DashMap<String, WindowEntry>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32, trusted_proxy_hops: usize) -> Self {
        Self {
            window,
            max_requests,
            trusted_proxy_hops,
            entries: DashMap::new(),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        if self.entries.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowEntry {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        let reset_after = self.window.saturating_sub(now.saturating_duration_since(entry.started));

        if entry.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after: reset_after,
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
            reset_after,
        }
    }

    fn prune(&self, now: Instant) {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.started) < self.window);
        debug!(before, after = self.entries.len(), "pruned rate limit windows");
    }
}

/// Client address as seen by the outermost trusted proxy, else the socket peer.
///
/// Each proxy appends the address it received from, so only the last
/// `trusted_proxy_hops` entries of `X-Forwarded-For` are trustworthy. Entries
/// further left are client-controlled and never used as the key.
fn client_key(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trusted_proxy_hops: usize,
) -> String {
    if let Some(forwarded) = trusted_proxy_hops
        .checked_sub(1)
        .and_then(|skip| forwarded_for_from_right(headers, skip))
    {
        return forwarded;
    }

    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for_from_right(headers: &HeaderMap, skip: usize) -> Option<String> {
    let mut entries: Vec<&str> = Vec::new();
    for value in headers.get_all("x-forwarded-for") {
        let value = value.to_str().ok()?;
        entries.extend(value.split(',').map(str::trim));
    }

    entries
        .into_iter()
        .rev()
        .nth(skip)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
}

pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };
    if routes::is_self_ping(req.uri().path()) {
        return next.run(req).await;
    }

    let key = client_key(
        req.headers(),
        req.extensions().get::<ConnectInfo<SocketAddr>>(),
        limiter.trusted_proxy_hops,
    );
    match limiter.check(&key) {
        RateDecision::Allowed { remaining, .. } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limiter.max_requests()),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!(client = %key, path = %req.uri().path(), "rate limit exceeded");
            AppError::rate_limited(retry_after).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_after_max_and_resets_with_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2, 1);
        let start = Instant::now();

        assert!(matches!(
            limiter.check_at("a", start),
            RateDecision::Allowed { remaining: 1, .. }
        ));
        assert!(matches!(
            limiter.check_at("a", start),
            RateDecision::Allowed { remaining: 0, .. }
        ));
        assert_eq!(
            limiter.check_at("a", start + Duration::from_secs(20)),
            RateDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );

        assert!(matches!(
            limiter.check_at("b", start),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("a", start + Duration::from_secs(61)),
            RateDecision::Allowed { remaining: 1, .. }
        ));
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn proxy_appended_entry_wins_over_peer() {
        let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 5000)));

        assert_eq!(client_key(&forwarded("203.0.113.7"), Some(&peer), 1), "203.0.113.7");
        assert_eq!(client_key(&HeaderMap::new(), Some(&peer), 1), "10.0.0.2");
        assert_eq!(client_key(&HeaderMap::new(), None, 1), "unknown");
    }

    #[test]
    fn client_supplied_prefix_is_ignored() {
        let headers = forwarded("1.1.1.1, 2.2.2.2, 203.0.113.7");

        assert_eq!(client_key(&headers, None, 1), "203.0.113.7");
        assert_eq!(client_key(&headers, None, 2), "2.2.2.2");
        assert_eq!(client_key(&forwarded("203.0.113.7"), None, 2), "unknown");
    }

    #[test]
    fn zero_hops_ignores_the_header() {
        let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 5000)));
        assert_eq!(client_key(&forwarded("203.0.113.7"), Some(&peer), 0), "10.0.0.2");
    }

    #[test]
    fn repeated_headers_are_read_in_order() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("6.6.6.6"));
        headers.append("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_key(&headers, None, 1), "198.51.100.1");
    }
}
