//! Multi-document YAML splitting

use regex::Regex;
use std::sync::LazyLock;

/// `---` separator, optionally indented and preceded by blank lines.
///
/// Trailing whitespace stops at the line break so that back-to-back
/// separators each find the newline they start with.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s*\n)[ \t]*---[ \t]*").unwrap());

/// Split a YAML stream into its documents.
///
/// Documents are trimmed and empty ones are skipped. The iterator borrows
/// from `text`; call again to re-split.
pub fn split_documents(text: &str) -> impl Iterator<Item = &str> {
    SEPARATOR_REGEX
        .split(text.trim())
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
}
