use axum::{Json, extract::State};
use hogen_core::api::types::{ApiResponse, DialectListData};

use crate::infra::app_state::AppState;

pub async fn list_dialects_handler(State(state): State<AppState>) -> Json<ApiResponse<DialectListData>> {
    let dialects: Vec<_> = state.catalog.iter().copied().collect();
    Json(ApiResponse::ok(DialectListData {
        total_count: dialects.len(),
        dialects,
    }))
}
