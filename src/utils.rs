use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Gender;
use crate::grammar::Category;

/// Custom error types for the name generator
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("Unknown non-terminal: {0}")]
    UnknownNonTerminal(String),

    #[error("Empty production: {0} has no alternatives")]
    EmptyProduction(String),

    #[error("Derivation depth exceeded while expanding {symbol} (limit {limit})")]
    DerivationDepthExceeded { symbol: String, limit: usize },
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// A non-fatal problem noticed while building or resolving a grammar.
///
/// Each diagnostic is logged when raised and kept on the rule set so callers
/// can inspect what the best-effort grammar had to work around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No gender flag was set; the neutral variant was used instead.
    NoGenderSelected,
    /// The name order could not be recognised; Western was used instead.
    UnknownNameOrder { value: String },
    /// A vocabulary source produced no entries.
    MissingVocabularySource {
        category: Category,
        culture: Option<String>,
        gender: Gender,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoGenderSelected => {
                write!(f, "no gender selected, defaulting to gender neutral")
            }
            Diagnostic::UnknownNameOrder { value } => {
                write!(f, "unimplemented name order {:?}, defaulting to western", value)
            }
            Diagnostic::MissingVocabularySource {
                category,
                culture,
                gender,
            } => write!(
                f,
                "vocabulary source {}/{} ({}) is missing or empty",
                category.as_str(),
                culture.as_deref().unwrap_or("-"),
                gender.as_str()
            ),
        }
    }
}
