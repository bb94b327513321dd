use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{batch::BatchItemResult, dialect::Dialect, language::LanguageType};

/// Raw body of `POST /api/translate`.
///
/// Every field is optional so that missing values surface as validation
/// failures with a specific reason instead of a generic deserialization error.
/// `text` stays untyped so a non-string value is reported as missing text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateRequestBody {
    /// Text to translate.
    #[serde(default)]
    pub text: Option<Value>,
    /// Source register, `standard` or `dialect`.
    #[serde(default)]
    pub from: Option<String>,
    /// Target register, `standard` or `dialect`.
    #[serde(default)]
    pub to: Option<String>,
    /// Dialect code from the catalog.
    #[serde(default)]
    pub dialect: Option<String>,
}

/// Raw body of `POST /api/translate/batch`.
///
/// `texts` stays untyped until validation so a non-string item can be
/// reported by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchTranslateRequestBody {
    /// Texts to translate, in order.
    #[serde(default)]
    pub texts: Option<Value>,
    /// Source register.
    #[serde(default)]
    pub from: Option<String>,
    /// Target register.
    #[serde(default)]
    pub to: Option<String>,
    /// Dialect code shared by every item.
    #[serde(default)]
    pub dialect: Option<String>,
}

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload of a successful single translation.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationData {
    /// Input after trimming.
    pub original_text: String,
    /// Provider output after cleanup.
    pub translated_text: String,
    /// Source register.
    pub from_type: LanguageType,
    /// Target register.
    pub to_type: LanguageType,
    /// Dialect code.
    pub dialect_code: &'static str,
    /// Dialect display name.
    pub dialect_name: &'static str,
    /// Provider round trip in milliseconds.
    pub processing_time_ms: u64,
}

/// Payload of a batch translation.
#[derive(Debug, Clone, Serialize)]
pub struct BatchTranslationData {
    /// Per-item results ordered by index.
    pub results: Vec<BatchItemResult>,
    /// Number of items submitted.
    pub total_count: usize,
    /// Items that translated.
    pub success_count: usize,
    /// Items that failed.
    pub error_count: usize,
    /// Wall-clock time for the whole batch in milliseconds.
    pub processing_time_ms: u64,
    /// Source register.
    pub from_type: LanguageType,
    /// Target register.
    pub to_type: LanguageType,
    /// Dialect code.
    pub dialect_code: &'static str,
    /// Dialect display name.
    pub dialect_name: &'static str,
}

/// Payload of the dialect list.
#[derive(Debug, Clone, Serialize)]
pub struct DialectListData {
    /// Catalog entries in order.
    pub dialects: Vec<Dialect>,
    /// Number of dialects.
    pub total_count: usize,
}

/// Failure envelope. `error` is stable per failure kind; `message` carries
/// best-effort detail.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Stable failure summary.
    pub error: String,
    /// Detail for the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Valid codes, present for an unsupported dialect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_dialects: Option<Vec<String>>,
}
