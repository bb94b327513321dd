use std::time::Duration;

use thiserror::Error;

use crate::language::LanguageType;

/// Client-caused request problems, detected before any provider call.
///
/// [`ValidationError::summary`] is the stable, user-facing `error` string;
/// the `Display` output is the detail message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is missing, not a string, or blank.
    #[error("`text` must be a non-empty string")]
    TextRequired,

    /// Text exceeds the character limit.
    #[error("text must be at most {max} characters (got {actual})")]
    TextTooLong {
        /// Allowed characters.
        max: usize,
        /// Submitted characters.
        actual: usize,
    },

    /// `from` or `to` is missing or unknown.
    #[error("`{field}` must be \"standard\" or \"dialect\"")]
    InvalidLanguageType {
        /// `from` or `to`.
        field: &'static str,
        /// Submitted value, if any.
        value: Option<String>,
    },

    /// `from` equals `to`.
    #[error("`from` and `to` are both \"{0}\"")]
    SameLanguageType(LanguageType),

    /// Dialect is missing.
    #[error("`dialect` is required")]
    DialectRequired,

    /// Dialect code is not in the catalog.
    #[error("dialect `{code}` is not supported")]
    UnsupportedDialect {
        /// Submitted code.
        code: String,
        /// Valid codes in catalog order.
        supported: Vec<String>,
    },

    /// `texts` is missing or not an array.
    #[error("`texts` must be an array of strings")]
    TextsRequired,

    /// `texts` is empty.
    #[error("`texts` must contain at least one item")]
    EmptyBatch,

    /// `texts` exceeds the item limit.
    #[error("`texts` may contain at most {max} items (got {actual})")]
    BatchTooLarge {
        /// Allowed items.
        max: usize,
        /// Submitted items.
        actual: usize,
    },

    /// A batch item is not a string.
    #[error("texts[{index}] must be a string")]
    BatchItemNotString {
        /// Position in `texts`.
        index: usize,
    },

    /// A batch item is blank.
    #[error("texts[{index}] is empty")]
    BatchItemEmpty {
        /// Position in `texts`.
        index: usize,
    },

    /// A batch item exceeds the character limit.
    #[error("texts[{index}] must be at most {max} characters (got {actual})")]
    BatchItemTooLong {
        /// Position in `texts`.
        index: usize,
        /// Allowed characters.
        max: usize,
        /// Submitted characters.
        actual: usize,
    },
}

impl ValidationError {
    /// Stable user-facing `error` string for this failure.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::TextRequired => "Text is required",
            Self::TextTooLong { .. } => "Text is too long",
            Self::InvalidLanguageType { .. } => "Invalid language type",
            Self::SameLanguageType(_) => {
                "Source and target language types must differ"
            }
            Self::DialectRequired => "Dialect is required",
            Self::UnsupportedDialect { .. } => "Unsupported dialect",
            Self::TextsRequired => "Texts array is required",
            Self::EmptyBatch => "Texts array is empty",
            Self::BatchTooLarge { .. } => "Too many texts",
            Self::BatchItemNotString { .. }
            | Self::BatchItemEmpty { .. }
            | Self::BatchItemTooLong { .. } => "Invalid text in batch",
        }
    }

    /// Position of the offending batch item, when the failure has one.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::BatchItemNotString { index }
            | Self::BatchItemEmpty { index }
            | Self::BatchItemTooLong { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Valid codes to report alongside an unsupported dialect.
    pub fn supported_dialects(&self) -> Option<&[String]> {
        match self {
            Self::UnsupportedDialect { supported, .. } => Some(supported),
            _ => None,
        }
    }
}

/// The remote translation dependency is unreachable, unconfigured, or
/// rejected the request.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key was supplied.
    #[error("translation provider is not configured")]
    NotConfigured,

    /// Transport or decode failure. Carries no request URL.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status with the provider's message.
    #[error("provider returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider message, or the raw body when it is not the error envelope.
        message: String,
    },

    /// The provider answered without any text.
    #[error("provider returned no text")]
    EmptyResponse,

    /// The call exceeded its deadline.
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    /// Any other provider failure.
    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Whether the failure is a missing API key.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}
