use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::ACCEPT},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use hogen_core::api::routes;
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

const SERVICE_NAME: &str = "hogen";

/// Service summary; HTML for browsers, JSON otherwise.
pub async fn root_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if prefers_html(&headers) {
        return Html(render_dashboard(&state)).into_response();
    }

    let endpoints: Vec<Value> = routes::ENDPOINTS
        .iter()
        .map(|(method, path)| json!({ "method": method, "path": path }))
        .collect();

    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "gemini_configured": state.translator.is_configured(),
        "keep_alive": state.keep_alive.state(),
        "endpoints": endpoints,
    }))
    .into_response()
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "gemini_configured": state.translator.is_configured(),
        "supported_dialects_count": state.catalog.len(),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Self-ping target. Excluded from activity accounting and rate limiting by
/// the middleware stack.
pub async fn keep_alive_handler(State(state): State<AppState>) -> Json<Value> {
    let activity = state.activity.snapshot();
    Json(json!({
        "status": "alive",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "activity_count": activity.activity_count,
        "last_activity_at": activity.last_activity_at.to_rfc3339(),
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<Value> {
    let now = Utc::now();
    let activity = state.activity.snapshot();
    let memory = memory_stats::memory_stats().map(|usage| {
        json!({
            "physical_bytes": usage.physical_mem,
            "virtual_bytes": usage.virtual_mem,
        })
    });
    let translation = &state.config.translation;

    Json(json!({
        "success": true,
        "data": {
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at.to_rfc3339(),
            "uptime_seconds": state.uptime_seconds(),
            "memory": memory,
            "activity": {
                "activity_count": activity.activity_count,
                "last_activity_at": activity.last_activity_at.to_rfc3339(),
                "idle_seconds": activity.idle_seconds(now),
            },
            "keep_alive": state.keep_alive.status(),
            "translation": {
                "gemini_configured": state.translator.is_configured(),
                "model": state.config.gemini.model,
                "max_text_chars": state.limits.max_text_chars,
                "max_batch_items": state.limits.max_batch_items,
                "chunk_size": translation.chunk_size,
                "chunk_pause_ms": translation.chunk_pause.as_millis() as u64,
                "item_timeout_ms": translation.item_timeout.as_millis() as u64,
            },
            "rate_limit": {
                "enabled": state.config.rate_limit.enabled,
                "window_seconds": state.config.rate_limit.window.as_secs(),
                "max_requests": state.config.rate_limit.max_requests,
                "trusted_proxy_hops": state.config.rate_limit.trusted_proxy_hops,
            },
        },
    }))
}

/// True when `text/html` appears in `Accept` ahead of any JSON media type.
fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    let position = |needle: &str| accept.find(needle);
    match (position("text/html"), position("application/json")) {
        (Some(html), Some(json)) => html < json,
        (Some(_), None) => true,
        _ => false,
    }
}

fn render_dashboard(state: &AppState) -> String {
    let activity = state.activity.snapshot();
    let keep_alive = state.keep_alive.status();
    let endpoints: String = routes::ENDPOINTS
        .iter()
        .map(|(method, path)| format!("<li><code>{method} {path}</code></li>"))
        .collect();
    let dialects: String = state
        .catalog
        .iter()
        .map(|dialect| format!("<li>{} <small>({})</small></li>", dialect.name, dialect.code))
        .collect();
    let provider = if state.translator.is_configured() {
        "configured"
    } else {
        "not configured"
    };

    format!(
        r#"<!doctype html>
<html lang="ja">
<head><meta charset="utf-8"><title>方言翻訳 API</title></head>
<body>
<h1>方言翻訳 API <small>v{version}</small></h1>
<p>Gemini: {provider} / uptime {uptime}s / requests {count} / keep-alive {keep_alive:?}</p>
<h2>Endpoints</h2>
<ul>{endpoints}</ul>
<h2>Dialects</h2>
<ul>{dialects}</ul>
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
        uptime = state.uptime_seconds(),
        count = activity.activity_count,
        keep_alive = keep_alive.state,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn browser_accept_prefers_html() {
        assert!(prefers_html(&accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
        assert!(!prefers_html(&accept("application/json, text/html")));
        assert!(!prefers_html(&accept("*/*")));
        assert!(!prefers_html(&HeaderMap::new()));
    }
}
