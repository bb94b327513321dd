use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// The two registers a translation moves between.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LanguageType {
    /// 標準語.
    Standard,
    /// 方言.
    Dialect,
}

impl LanguageType {
    /// Parse the exact wire spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "standard" => Some(Self::Standard),
            "dialect" => Some(Self::Dialect),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Dialect => "dialect",
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `(from, to)` pair. Construction guarantees `from != to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    from: LanguageType,
    to: LanguageType,
}

impl Direction {
    /// Standard Japanese into a dialect.
    pub const TO_DIALECT: Self = Self {
        from: LanguageType::Standard,
        to: LanguageType::Dialect,
    };

    /// A dialect into standard Japanese.
    pub const TO_STANDARD: Self = Self {
        from: LanguageType::Dialect,
        to: LanguageType::Standard,
    };

    /// Pair `from` and `to`, rejecting identical registers.
    pub fn new(
        from: LanguageType,
        to: LanguageType,
    ) -> Result<Self, ValidationError> {
        if from == to {
            return Err(ValidationError::SameLanguageType(from));
        }
        Ok(Self { from, to })
    }

    /// Source register.
    pub fn from(&self) -> LanguageType {
        self.from
    }

    /// Target register.
    pub fn to(&self) -> LanguageType {
        self.to
    }

    /// Whether the output is dialect.
    pub fn is_to_dialect(&self) -> bool {
        self.to == LanguageType::Dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(LanguageType::parse("standard"), Some(LanguageType::Standard));
        assert_eq!(LanguageType::parse("dialect"), Some(LanguageType::Dialect));
        assert_eq!(LanguageType::parse("Standard"), None);
        assert_eq!(LanguageType::parse(""), None);
    }

    #[test]
    fn identical_endpoints_are_rejected() {
        for value in [LanguageType::Standard, LanguageType::Dialect] {
            assert_eq!(
                Direction::new(value, value),
                Err(ValidationError::SameLanguageType(value))
            );
        }
        assert_eq!(
            Direction::new(LanguageType::Dialect, LanguageType::Standard),
            Ok(Direction::TO_STANDARD)
        );
    }
}
