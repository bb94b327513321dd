use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hogen_core::api::routes;
use tracing::debug;

use crate::infra::app_state::AppState;

/// Count every organic request and log its outcome. Self-pings are not
/// counted so keep-alive traffic cannot mask genuine idleness.
pub async fn track_activity(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let self_ping = routes::is_self_ping(&path);
    if !self_ping {
        state.activity.record_activity();
    }

    let started = Instant::now();
    let response = next.run(req).await;

    debug!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        self_ping,
        "request handled"
    );
    response
}
