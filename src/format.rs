use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").expect("valid word pattern"));

/// Display casing applied to a derived name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// Keep the vocabulary's own casing
    Preserve,
    /// Capitalise every run of letters, lowercasing the rest
    #[default]
    Title,
    Upper,
    Lower,
}

/// Turns a derived token sequence into the displayed name
#[derive(Debug, Clone, Copy, Default)]
pub struct NameFormatter {
    case: NameCase,
}

impl NameFormatter {
    pub fn new(case: NameCase) -> Self {
        NameFormatter { case }
    }

    /// Join the tokens without separators and apply the casing.
    /// Spaces are already explicit tokens in the grammar.
    pub fn format<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let joined: String = tokens.iter().map(|token| token.as_ref()).collect();
        self.apply(&joined)
    }

    pub fn apply(&self, text: &str) -> String {
        match self.case {
            NameCase::Preserve => text.to_string(),
            NameCase::Upper => text.to_uppercase(),
            NameCase::Lower => text.to_lowercase(),
            NameCase::Title => WORD
                .replace_all(text, |caps: &Captures| capitalize(&caps[0]))
                .into_owned(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str(),
    }
}
