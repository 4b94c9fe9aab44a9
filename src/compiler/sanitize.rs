//! Completion output sanitizer.
//!
//! Strips markdown code fences and conversational preamble from a model
//! completion so the remaining text starts at the SQL statement. This is a
//! formatting step only: it performs no validation and does not block
//! destructive statements. Refusing those is the job of the system
//! instruction, and malformed SQL fails at execution.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Leading tokens that mark the first line of a statement.
pub const STATEMENT_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "WITH", "CREATE", "ALTER", "DROP",
];

/// A fence marker, the word glued to it and an optional line break.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([A-Za-z0-9_+\-]*)(?:\r?\n)?").unwrap());

/// Clean a raw completion down to the executable statement.
///
/// 1. Remove fence markers, leaving enclosed content untouched.
/// 2. If a later line starts with a statement keyword, drop everything
///    before that line.
/// 3. Trim surrounding whitespace.
///
/// When no keyword line exists the text is returned trimmed but otherwise
/// unchanged. `sanitize(sanitize(x)) == sanitize(x)` for every `x`.
pub fn sanitize(raw: &str) -> String {
    let unfenced = strip_fences(raw.trim());
    let text = unfenced.trim();

    match statement_offset(text) {
        Some(offset) => text[offset..].trim().to_string(),
        None => text.to_string(),
    }
}

/// Remove every fence marker.
///
/// A word glued to a marker is a language tag and goes with it, along with
/// one line break. A statement keyword in that position is content, so only
/// the backticks go. Removal repeats until no marker remains, since
/// deleting one can join stray backticks on either side into a new one.
pub fn strip_fences(text: &str) -> String {
    let mut out = text.to_string();
    while FENCE.is_match(&out) {
        out = FENCE
            .replace_all(&out, |caps: &Captures<'_>| {
                if is_statement_keyword(&caps[1]) {
                    caps[0][3..].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned();
    }
    out
}

fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(word))
}

/// The statement keyword a line starts with, if any.
///
/// The leading token is the run of ASCII letters after indentation, compared
/// case-insensitively, so `selected` and `WITHOUT` do not count.
pub fn leading_keyword(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let token = &trimmed[..end];

    STATEMENT_KEYWORDS
        .iter()
        .copied()
        .find(|kw| kw.eq_ignore_ascii_case(token))
}

/// Whether sanitized text begins with a statement keyword.
pub fn starts_with_statement(text: &str) -> bool {
    text.lines().next().and_then(leading_keyword).is_some()
}

/// Byte offset of the first keyword line, or `None` if it is the first line
/// or there is none.
fn statement_offset(text: &str) -> Option<usize> {
    let mut offset = 0;
    for (index, line) in text.split('\n').enumerate() {
        if leading_keyword(line).is_some() {
            return (index > 0).then_some(offset);
        }
        offset += line.len() + 1;
    }
    None
}
