//! Translation keys and `$t('…')` reference scanning.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static KEY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$t\(['"](.+?)['"]\)"#).expect("key reference pattern is valid")
});

/// A dot-delimited key such as `user.profile.title`.
///
/// Always has at least one segment and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    raw: String,
    segments: Vec<String>,
}

impl TranslationKey {
    /// Returns `None` for an empty key or one with an empty segment (`a..b`, `.a`).
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Every `$t('key')` / `$t("key")` reference in `source`, in order of appearance.
///
/// Duplicates are kept; the pipeline skips them later because their slot is filled.
pub fn extract_keys(source: &str) -> Vec<String> {
    KEY_REFERENCE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
