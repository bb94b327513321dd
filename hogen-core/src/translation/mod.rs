//! Translation provider seam.
//!
//! [`Translator`] is the single-call, stateless contract the rest of the
//! crate depends on. [`GeminiTranslator`] implements it against the Gemini
//! `generateContent` API; [`UnconfiguredTranslator`] stands in when no API key
//! is available so every other endpoint keeps working.

mod gemini;
mod prompt;

use std::fmt;

use async_trait::async_trait;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiSettings, GeminiTranslator};
pub use prompt::{build_prompt, clean_response};

use crate::{dialect::Dialect, error::ProviderError, language::Direction};

/// One stateless translation call.
#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    /// Translate `text` in `direction` for `dialect`. No retries.
    async fn translate(
        &self,
        text: &str,
        direction: Direction,
        dialect: &'static Dialect,
    ) -> Result<String, ProviderError>;

    /// Whether a real provider backs this translator.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Fails every call with [`ProviderError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredTranslator;

#[async_trait]
impl Translator for UnconfiguredTranslator {
    async fn translate(
        &self,
        _text: &str,
        _direction: Direction,
        _dialect: &'static Dialect,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}
