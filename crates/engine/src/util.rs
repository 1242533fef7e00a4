//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API. Category and account
//! names are matched through a normalized key so that `"Café "` and `"cafe"`
//! address the same category.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Trim and collapse inner whitespace, keeping the original casing.
///
/// Returns `None` when nothing remains.
pub(crate) fn normalize_display(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalized lookup key: NFKD, combining marks stripped, lowercased,
/// whitespace collapsed.
pub(crate) fn normalize_key(value: &str) -> String {
    let stripped: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
