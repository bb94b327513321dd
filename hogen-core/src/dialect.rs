//! Fixed catalog of supported regional dialects.

use serde::Serialize;

/// A regional dialect the service can translate into or out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dialect {
    /// Stable identifier used in requests, e.g. `osaka`.
    pub code: &'static str,
    /// Japanese display name, e.g. `大阪弁`.
    pub name: &'static str,
}

const DIALECTS: &[Dialect] = &[
    Dialect {
        code: "osaka",
        name: "大阪弁",
    },
    Dialect {
        code: "kyoto",
        name: "京都弁",
    },
    Dialect {
        code: "hiroshima",
        name: "広島弁",
    },
    Dialect {
        code: "fukuoka",
        name: "福岡弁",
    },
    Dialect {
        code: "kumamoto",
        name: "熊本弁",
    },
    Dialect {
        code: "kagoshima",
        name: "鹿児島弁",
    },
    Dialect {
        code: "okinawa",
        name: "沖縄弁",
    },
    Dialect {
        code: "nagoya",
        name: "名古屋弁",
    },
    Dialect {
        code: "tohoku",
        name: "東北弁",
    },
    Dialect {
        code: "hokkaido",
        name: "北海道弁",
    },
];

/// Ordered, immutable dialect set. Cheap to copy; entries are `'static`.
#[derive(Debug, Clone, Copy)]
pub struct DialectCatalog {
    entries: &'static [Dialect],
}

impl DialectCatalog {
    /// The catalog served by the application.
    pub const fn standard() -> Self {
        Self { entries: DIALECTS }
    }

    /// Look up a dialect by exact code.
    pub fn get(&self, code: &str) -> Option<&'static Dialect> {
        self.entries.iter().find(|dialect| dialect.code == code)
    }

    /// Whether `code` names a supported dialect.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'static, Dialect> {
        self.entries.iter()
    }

    /// Codes in catalog order, used when reporting an unsupported dialect.
    pub fn codes(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|dialect| dialect.code.to_string())
            .collect()
    }

    /// Number of dialects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DialectCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let catalog = DialectCatalog::standard();
        let unique: HashSet<_> = catalog.iter().map(|d| d.code).collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn lookup_is_exact() {
        let catalog = DialectCatalog::standard();
        assert_eq!(catalog.get("fukuoka").map(|d| d.name), Some("福岡弁"));
        assert!(catalog.get("Fukuoka").is_none());
        assert!(!catalog.contains("tokyo"));
    }

    #[test]
    fn codes_preserve_catalog_order() {
        let codes = DialectCatalog::standard().codes();
        assert_eq!(codes.first().map(String::as_str), Some("osaka"));
        assert_eq!(codes.len(), 10);
    }
}
