//! Statement classification for compiled SQL.
//!
//! The kind is recorded with every compiled statement and in the SQL log.
//! It is informational: nothing is refused because of it.

use std::fmt;

use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// What a statement does to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// SELECT, VALUES, or a WITH query ending in SELECT.
    Read,
    /// INSERT, UPDATE, DELETE, REPLACE.
    Write,
    /// CREATE, ALTER, DROP, TRUNCATE.
    Schema,
    /// Anything else the tokenizer recognizes (PRAGMA, BEGIN, ...).
    Other,
    /// Empty text or text that does not tokenize as SQL.
    Unknown,
}

impl StatementKind {
    /// Classify a statement from its leading keyword.
    ///
    /// For `WITH`, the first keyword after the common table expressions
    /// decides.
    pub fn classify(sql: &str) -> Self {
        let dialect = SQLiteDialect {};
        let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
            Ok(tokens) => tokens,
            Err(_) => return StatementKind::Unknown,
        };

        let mut depth = 0usize;
        let mut in_with = false;
        for token in &tokens {
            match token {
                Token::Whitespace(_) => continue,
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                Token::Word(word) if depth == 0 => {
                    match Self::from_keyword(word.keyword) {
                        Some(StatementKind::Other) if word.keyword == Keyword::WITH => {
                            in_with = true;
                        }
                        Some(kind) => return kind,
                        None if in_with => {}
                        None => return StatementKind::Other,
                    }
                }
                _ if in_with => {}
                _ => return StatementKind::Unknown,
            }
        }

        if in_with {
            StatementKind::Read
        } else {
            StatementKind::Unknown
        }
    }

    fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::SELECT | Keyword::VALUES => Some(StatementKind::Read),
            Keyword::INSERT | Keyword::UPDATE | Keyword::DELETE | Keyword::REPLACE => {
                Some(StatementKind::Write)
            }
            Keyword::CREATE | Keyword::ALTER | Keyword::DROP | Keyword::TRUNCATE => {
                Some(StatementKind::Schema)
            }
            Keyword::WITH => Some(StatementKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementKind::Read => "read",
            StatementKind::Write => "write",
            StatementKind::Schema => "schema",
            StatementKind::Other => "other",
            StatementKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
