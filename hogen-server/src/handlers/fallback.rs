use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use hogen_core::api::routes;
use serde_json::{Value, json};

/// Unmatched routes get a 404 that lists what is served.
pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    let available: Vec<Value> = routes::ENDPOINTS
        .iter()
        .map(|(method, path)| json!(format!("{method} {path}")))
        .collect();

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not found",
            "message": format!("No route for {method} {}", uri.path()),
            "available_endpoints": available,
        })),
    )
        .into_response()
}
