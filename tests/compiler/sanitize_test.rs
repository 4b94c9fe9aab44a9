//! Integration tests for the completion sanitizer.

use parley::compiler::sanitize;
use parley::compiler::sanitize::{leading_keyword, starts_with_statement, strip_fences};

/// Completions in the shapes models actually return.
const SAMPLES: &[&str] = &[
    "SELECT 1;",
    "  SELECT 1;  \n",
    "```sql\nSELECT * FROM users;\n```",
    "```\nSELECT * FROM users;\n```",
    "Here you go:\n```sql\nSELECT id\nFROM messages\nWHERE \"userId\" = 7;\n```\nLet me know!",
    "Sure! The query is below.\n\nINSERT INTO votes (\"messageId\", \"userId\", value) VALUES (1, 2, 1);",
    "I can't help with that.",
    "",
    "``` ```",
    "````sql\nSELECT 1;\n````",
    "with recent AS (SELECT 1)\nSELECT * FROM recent;",
    "Explanation first\n  update votes SET value = 1;",
    "```sql SELECT 1```",
    "```SELECT\n* FROM users\n```",
];

#[test]
fn test_idempotent_on_samples() {
    for raw in SAMPLES {
        let once = sanitize(raw);
        assert_eq!(sanitize(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_no_fence_markers_survive() {
    for raw in SAMPLES {
        assert!(
            !sanitize(raw).contains("```"),
            "fence survived in {:?}",
            sanitize(raw)
        );
    }
}

#[test]
fn test_fenced_body_preserved_byte_for_byte() {
    let body = "SELECT m.id,\n       m.title\nFROM messages m\nWHERE m.title = 'a  b';";
    let raw = format!("```sql\n{}\n```", body);
    assert_eq!(sanitize(&raw), body);
}

#[test]
fn test_preamble_and_trailer() {
    let raw = "Here you go:\n```sql\nSELECT id\nFROM messages;\n```\nLet me know!";
    // Prose after the statement is not removed.
    assert_eq!(sanitize(raw), "SELECT id\nFROM messages;\nLet me know!");
}

#[test]
fn test_lowercase_keyword_line_found() {
    assert_eq!(
        sanitize("Explanation first\n  update votes SET value = 1;"),
        "update votes SET value = 1;"
    );
}

#[test]
fn test_no_keyword_returns_trimmed_input() {
    assert_eq!(sanitize("  I can't help with that.\n"), "I can't help with that.");
    assert!(!starts_with_statement(&sanitize("I can't help with that.")));
}

#[test]
fn test_destructive_statements_pass_through() {
    assert_eq!(sanitize("```sql\nDROP TABLE users;\n```"), "DROP TABLE users;");
}

#[test]
fn test_keyword_needs_whole_token() {
    assert_eq!(leading_keyword("selected rows follow"), None);
    assert_eq!(leading_keyword("WITHOUT a doubt"), None);
    assert_eq!(leading_keyword("select(1)"), Some("SELECT"));
    assert_eq!(leading_keyword("\tDelete from votes"), Some("DELETE"));
}

#[test]
fn test_strip_fences_rejoined_markers() {
    assert_eq!(strip_fences("``````"), "");
    assert_eq!(strip_fences("a```\nb"), "ab");
}

#[test]
fn test_inline_tag_removed() {
    assert_eq!(sanitize("```sql SELECT 1```"), "SELECT 1");
}

#[test]
fn test_statement_glued_to_fence_kept_whole() {
    assert_eq!(
        sanitize("```SELECT\n* FROM users\n```"),
        "SELECT\n* FROM users"
    );
    assert_eq!(
        sanitize("```DELETE FROM votes WHERE id = 1```"),
        "DELETE FROM votes WHERE id = 1"
    );
}
