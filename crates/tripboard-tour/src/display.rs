//! Plain-text rendering of upstream values.
//!
//! The tourism API embeds light HTML in free-text fields (`<br>`, anchors,
//! `&nbsp;`). Terminals and logs want plain text.

use std::sync::LazyLock;

use regex::Regex;

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-lines regex"));

/// Converts an upstream value to plain text.
///
/// Line breaks become `\n`, other tags are dropped, the common entities are
/// decoded, and each line is trimmed.
#[must_use]
pub fn plain_text(value: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(value, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines = decoded
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES_RE
        .replace_all(lines.trim(), "\n\n")
        .into_owned()
}
