//! Name-Forge generates fictional character names from a small grammar.
//!
//! A [`NameConfig`] is compiled into a [`RuleSet`] whose word slots point at
//! vocabulary sources. The rule set is resolved against a
//! [`VocabularyProvider`] into a [`ResolvedGrammar`], which is then randomly
//! derived into a name.
//!
//! # Example
//!
//! ```rust
//! use name_forge::{Category, Gender, MemoryVocabulary, NameBank, NameConfig, NameGenerator, Origin};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let vocabulary = MemoryVocabulary::new()
//!     .with(Category::Positions, None, Gender::Male, &["Captain"])
//!     .with(Category::Forenames, Some("dwarf"), Gender::Male, &["Thrain"])
//!     .with(Category::Adjectives, Some("mountain"), Gender::Neutral, &["Stone"])
//!     .with(Category::Nouns, Some("mountain"), Gender::Neutral, &["heart"])
//!     .with(Category::Postfixes, Some("mountain"), Gender::Neutral, &["the Mountains"]);
//!
//! let config = NameConfig::new(Origin::Mountain, NameBank::Dwarf)
//!     .with_gender(Gender::Male)
//!     .with_title_prefix(true);
//!
//! let generator = NameGenerator::new(&config, &vocabulary);
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! let tokens = generator.generate_tokens(&mut rng).unwrap();
//! assert_eq!(tokens.concat(), "Captain Thrain Stoneheart of the Mountains");
//! ```

pub mod builder;
pub mod config;
pub mod format;
pub mod generator;
pub mod grammar;
pub mod resolver;
pub mod utils;
pub mod vocabulary;

pub use builder::GrammarBuilder;
pub use config::{Gender, NameBank, NameConfig, NameOrder, Origin};
pub use format::{NameCase, NameFormatter};
pub use generator::{generate_name, NameGenerator};
pub use grammar::{
    Alternative, Category, GrammarConfig, ResolvedGrammar, RuleSet, Symbol, VocabularyRef,
};
pub use resolver::TerminalResolver;
pub use utils::{Diagnostic, GrammarError, Result};
pub use vocabulary::{FileVocabulary, MemoryVocabulary, VocabularyProvider};
