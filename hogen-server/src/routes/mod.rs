use std::any::Any;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use hogen_config::CorsConfig;
use hogen_core::api::routes;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{
    handlers,
    infra::{
        app_state::AppState,
        errors::AppError,
        middleware::{enforce_rate_limit, track_activity},
    },
};

/// Build the full application router.
///
/// Layers, outermost first: panic capture, request tracing, CORS, activity
/// accounting, rate limiting. Activity sits outside the limiter so rejected
/// requests still count as organic traffic.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = if state.config.dev_mode {
        CorsLayer::permissive()
    } else {
        build_cors_layer(&state.config.cors)
    };

    Router::new()
        .route(routes::ROOT, get(handlers::root_handler))
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(routes::DIALECTS, get(handlers::list_dialects_handler))
        .route(routes::KEEP_ALIVE, get(handlers::keep_alive_handler))
        .route(routes::STATS, get(handlers::stats_handler))
        .route(routes::translate::SINGLE, post(handlers::translate_handler))
        .route(
            routes::translate::BATCH,
            post(handlers::batch_translate_handler),
        )
        .fallback(handlers::not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = if cors.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");

    AppError::internal("Internal server error").into_response()
}
