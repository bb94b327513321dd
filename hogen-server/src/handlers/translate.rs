use std::time::Instant;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use hogen_core::{
    api::types::{
        ApiResponse, BatchTranslateRequestBody, BatchTranslationData, TranslateRequestBody,
        TranslationData,
    },
    validation::{validate_batch_request, validate_translate_request},
};
use tracing::info;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn translate_handler(
    State(state): State<AppState>,
    body: Result<Json<TranslateRequestBody>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TranslationData>>> {
    let Json(body) = body?;
    let request = validate_translate_request(&body, &state.catalog, &state.limits)?;

    let started = Instant::now();
    let translated_text = state
        .translator
        .translate(&request.text, request.direction, request.dialect)
        .await?;
    let processing_time_ms = started.elapsed().as_millis() as u64;

    info!(
        dialect = request.dialect.code,
        from = %request.direction.from(),
        to = %request.direction.to(),
        chars = request.text.chars().count(),
        processing_time_ms,
        "translation completed"
    );

    Ok(Json(ApiResponse::ok(TranslationData {
        original_text: request.text,
        translated_text,
        from_type: request.direction.from(),
        to_type: request.direction.to(),
        dialect_code: request.dialect.code,
        dialect_name: request.dialect.name,
        processing_time_ms,
    })))
}

pub async fn batch_translate_handler(
    State(state): State<AppState>,
    body: Result<Json<BatchTranslateRequestBody>, JsonRejection>,
) -> AppResult<Json<ApiResponse<BatchTranslationData>>> {
    let Json(body) = body?;
    let job = validate_batch_request(&body, &state.catalog, &state.limits)?;

    let outcome = state.orchestrator.run(&job).await;

    Ok(Json(ApiResponse::ok(BatchTranslationData {
        total_count: outcome.total_count,
        success_count: outcome.success_count,
        error_count: outcome.error_count,
        processing_time_ms: outcome.elapsed.as_millis() as u64,
        results: outcome.results,
        from_type: job.direction.from(),
        to_type: job.direction.to(),
        dialect_code: job.dialect.code,
        dialect_name: job.dialect.name,
    })))
}
