//! Request validation pipeline.
//!
//! Checks run in a fixed order and the first failure wins:
//! text presence, text length, language types, distinct direction, dialect.
//! Batch requests validate every item's shape first (reporting its position),
//! then the shared direction and dialect once.

use serde_json::Value;

use crate::{
    api::types::{BatchTranslateRequestBody, TranslateRequestBody},
    dialect::{Dialect, DialectCatalog},
    error::ValidationError,
    language::{Direction, LanguageType},
};

/// Default per-text character limit.
pub const MAX_TEXT_CHARS: usize = 2000;
/// Default batch item limit.
pub const MAX_BATCH_ITEMS: usize = 20;

/// Size limits applied during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Characters (not bytes) allowed per text.
    pub max_text_chars: usize,
    /// Items allowed per batch.
    pub max_batch_items: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_text_chars: MAX_TEXT_CHARS,
            max_batch_items: MAX_BATCH_ITEMS,
        }
    }
}

/// A normalized single translation request. `text` is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Trimmed input.
    pub text: String,
    /// Validated direction.
    pub direction: Direction,
    /// Catalog entry.
    pub dialect: &'static Dialect,
}

/// A normalized batch. Every text is trimmed and shares one direction and
/// dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Trimmed inputs in submitted order.
    pub texts: Vec<String>,
    /// Validated direction.
    pub direction: Direction,
    /// Catalog entry.
    pub dialect: &'static Dialect,
}

/// Validate a single request body.
pub fn validate_translate_request(
    body: &TranslateRequestBody,
    catalog: &DialectCatalog,
    limits: &ValidationLimits,
) -> Result<TranslationRequest, ValidationError> {
    let text = body
        .text
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(ValidationError::TextRequired)?;

    let actual = text.chars().count();
    if actual > limits.max_text_chars {
        return Err(ValidationError::TextTooLong {
            max: limits.max_text_chars,
            actual,
        });
    }

    let direction = validate_direction(body.from.as_deref(), body.to.as_deref())?;
    let dialect = validate_dialect(body.dialect.as_deref(), catalog)?;

    Ok(TranslationRequest {
        text: text.to_string(),
        direction,
        dialect,
    })
}

/// Validate a batch request body.
pub fn validate_batch_request(
    body: &BatchTranslateRequestBody,
    catalog: &DialectCatalog,
    limits: &ValidationLimits,
) -> Result<BatchJob, ValidationError> {
    let items = match &body.texts {
        Some(Value::Array(items)) => items,
        _ => return Err(ValidationError::TextsRequired),
    };

    if items.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if items.len() > limits.max_batch_items {
        return Err(ValidationError::BatchTooLarge {
            max: limits.max_batch_items,
            actual: items.len(),
        });
    }

    let texts = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_batch_item(index, item, limits))
        .collect::<Result<Vec<_>, _>>()?;

    let direction = validate_direction(body.from.as_deref(), body.to.as_deref())?;
    let dialect = validate_dialect(body.dialect.as_deref(), catalog)?;

    Ok(BatchJob {
        texts,
        direction,
        dialect,
    })
}

fn validate_batch_item(
    index: usize,
    item: &Value,
    limits: &ValidationLimits,
) -> Result<String, ValidationError> {
    let Value::String(raw) = item else {
        return Err(ValidationError::BatchItemNotString { index });
    };

    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::BatchItemEmpty { index });
    }

    let actual = text.chars().count();
    if actual > limits.max_text_chars {
        return Err(ValidationError::BatchItemTooLong {
            index,
            max: limits.max_text_chars,
            actual,
        });
    }

    Ok(text.to_string())
}

fn validate_direction(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Direction, ValidationError> {
    let from = parse_language_type("from", from)?;
    let to = parse_language_type("to", to)?;
    Direction::new(from, to)
}

fn parse_language_type(
    field: &'static str,
    raw: Option<&str>,
) -> Result<LanguageType, ValidationError> {
    raw.and_then(LanguageType::parse).ok_or_else(|| {
        ValidationError::InvalidLanguageType {
            field,
            value: raw.map(str::to_string),
        }
    })
}

fn validate_dialect(
    code: Option<&str>,
    catalog: &DialectCatalog,
) -> Result<&'static Dialect, ValidationError> {
    let code = code
        .filter(|code| !code.trim().is_empty())
        .ok_or(ValidationError::DialectRequired)?;

    catalog
        .get(code)
        .ok_or_else(|| ValidationError::UnsupportedDialect {
            code: code.to_string(),
            supported: catalog.codes(),
        })
}
