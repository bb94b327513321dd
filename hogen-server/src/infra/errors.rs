use std::{fmt, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use hogen_core::{ProviderError, ValidationError, api::types::ErrorBody};
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

/// HTTP-facing failure rendered as the `{success:false, error, ...}` envelope.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    /// Stable, per-kind label clients can match on.
    pub error: String,
    pub message: Option<String>,
    pub supported_dialects: Option<Vec<String>>,
    pub retry_after: Option<Duration>,
}

impl AppError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
            supported_dialects: None,
            retry_after: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn rate_limited(retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(StatusCode::TOO_MANY_REQUESTS, "Too many requests")
        }
        .with_message("Rate limit exceeded, please try again later")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.error, message),
            None => f.write_str(&self.error),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.error,
            message: self.message,
            supported_dialects: self.supported_dialects,
        });

        let mut response = (self.status, body).into_response();
        if let Some(retry_after) = self.retry_after {
            // Round up so clients never retry inside the window.
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let mut app_error = Self::bad_request(err.summary()).with_message(err.to_string());
        app_error.supported_dialects = err.supported_dialects().map(<[String]>::to_vec);
        app_error
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        warn!(error = %err, "translation provider call failed");
        Self::internal("Translation failed").with_message(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid JSON body").with_message(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = ?err, "unhandled internal error");
        Self::internal("Internal server error")
    }
}
