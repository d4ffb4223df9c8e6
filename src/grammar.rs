use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Gender;
use crate::utils::{Diagnostic, GrammarError, Result};

/// Kind of vocabulary a reference draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Titles placed before the name
    Positions,
    Forenames,
    Adjectives,
    Nouns,
    /// Places used in the "of <place>" postfix
    Postfixes,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positions => "positions",
            Category::Forenames => "forenames",
            Category::Adjectives => "adjectives",
            Category::Nouns => "nouns",
            Category::Postfixes => "postfixes",
        }
    }
}

/// Pointer to an external list of literal alternatives.
///
/// Every gender variant is looked up separately and the results are pooled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRef {
    pub category: Category,
    pub culture: Option<String>,
    pub genders: Vec<Gender>,
}

impl VocabularyRef {
    pub fn new(category: Category, culture: Option<&str>, genders: Vec<Gender>) -> Self {
        VocabularyRef {
            category,
            culture: culture.map(str::to_string),
            genders,
        }
    }
}

/// Represents a symbol in the grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// A terminal symbol (literal text)
    Terminal(String),
    /// A non-terminal symbol (reference to another rule)
    NonTerminal(String),
    /// A reference resolved against a vocabulary provider before derivation
    Vocabulary(VocabularyRef),
    /// Contributes nothing to the output
    Empty,
}

impl Symbol {
    pub fn terminal(text: &str) -> Self {
        Symbol::Terminal(text.to_string())
    }

    pub fn non_terminal(name: &str) -> Self {
        Symbol::NonTerminal(name.to_string())
    }
}

/// One possible expansion of a non-terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// The non-terminal may expand to nothing
    Empty,
    Sequence(Vec<Symbol>),
}

impl Alternative {
    pub fn sequence(symbols: Vec<Symbol>) -> Self {
        Alternative::Sequence(symbols)
    }

    pub fn single(symbol: Symbol) -> Self {
        Alternative::Sequence(vec![symbol])
    }

    pub fn symbols(&self) -> &[Symbol] {
        match self {
            Alternative::Empty => &[],
            Alternative::Sequence(symbols) => symbols,
        }
    }

    pub fn has_vocabulary(&self) -> bool {
        self.symbols()
            .iter()
            .any(|symbol| matches!(symbol, Symbol::Vocabulary(_)))
    }
}

/// Options bounding derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Maximum non-terminal nesting during expansion
    pub max_recursion_depth: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            max_recursion_depth: 100,
        }
    }
}

/// Rules mapping each non-terminal to its ordered alternatives, as produced by
/// the grammar builder. Alternatives may still hold vocabulary references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    start_symbol: String,
    rules: BTreeMap<String, Vec<Alternative>>,
    #[serde(default)]
    diagnostics: Vec<Diagnostic>,
}

impl RuleSet {
    pub fn new(start_symbol: &str) -> Self {
        RuleSet {
            start_symbol: start_symbol.to_string(),
            rules: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Define a non-terminal, replacing any previous definition
    pub fn define(&mut self, non_terminal: &str, alternatives: Vec<Alternative>) -> &mut Self {
        self.rules.insert(non_terminal.to_string(), alternatives);
        self
    }

    /// Append one alternative to a non-terminal, creating it if needed
    pub fn add_alternative(&mut self, non_terminal: &str, alternative: Alternative) -> &mut Self {
        self.rules
            .entry(non_terminal.to_string())
            .or_default()
            .push(alternative);
        self
    }

    pub fn alternatives(&self, non_terminal: &str) -> Option<&[Alternative]> {
        self.rules.get(non_terminal).map(Vec::as_slice)
    }

    pub fn has_non_terminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rules(&self) -> &BTreeMap<String, Vec<Alternative>> {
        &self.rules
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any alternative still references a vocabulary
    pub fn has_vocabulary(&self) -> bool {
        self.rules
            .values()
            .flatten()
            .any(Alternative::has_vocabulary)
    }

    pub(crate) fn into_parts(self) -> (String, BTreeMap<String, Vec<Alternative>>, Vec<Diagnostic>) {
        (self.start_symbol, self.rules, self.diagnostics)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A grammar holding only literals and non-terminal references, ready for
/// derivation. It is never mutated by derivation and can be shared freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGrammar {
    start_symbol: String,
    rules: BTreeMap<String, Vec<Alternative>>,
    #[serde(default)]
    diagnostics: Vec<Diagnostic>,
    #[serde(default)]
    config: GrammarConfig,
}

impl ResolvedGrammar {
    /// Create a new empty grammar with a specified start symbol
    pub fn new(start_symbol: &str) -> Self {
        ResolvedGrammar {
            start_symbol: start_symbol.to_string(),
            rules: BTreeMap::new(),
            diagnostics: Vec::new(),
            config: GrammarConfig::default(),
        }
    }

    pub(crate) fn from_parts(
        start_symbol: String,
        rules: BTreeMap<String, Vec<Alternative>>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        ResolvedGrammar {
            start_symbol,
            rules,
            diagnostics,
            config: GrammarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }

    /// Define a non-terminal, replacing any previous definition.
    ///
    /// Vocabulary references are rejected; they must go through the resolver.
    pub fn define(&mut self, non_terminal: &str, alternatives: Vec<Alternative>) -> Result<&mut Self> {
        if alternatives.iter().any(Alternative::has_vocabulary) {
            return Err(GrammarError::InvalidGrammar(format!(
                "{} references an unresolved vocabulary",
                non_terminal
            )));
        }
        self.rules.insert(non_terminal.to_string(), alternatives);
        Ok(self)
    }

    pub fn alternatives(&self, non_terminal: &str) -> Option<&[Alternative]> {
        self.rules.get(non_terminal).map(Vec::as_slice)
    }

    pub fn has_non_terminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rules(&self) -> &BTreeMap<String, Vec<Alternative>> {
        &self.rules
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GrammarConfig) {
        self.config = config;
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let grammar: ResolvedGrammar = serde_json::from_str(json)?;
        if let Some(name) = grammar
            .rules
            .iter()
            .find(|(_, alternatives)| alternatives.iter().any(Alternative::has_vocabulary))
            .map(|(name, _)| name)
        {
            return Err(GrammarError::InvalidGrammar(format!(
                "{} references an unresolved vocabulary",
                name
            )));
        }
        Ok(grammar)
    }

    /// Derive a token sequence from the grammar's own start symbol
    pub fn derive<R: Rng>(&self, rng: &mut R) -> Result<Vec<String>> {
        self.derive_from(&self.start_symbol, rng)
    }

    /// Randomly expand `start` into a sequence of terminal tokens.
    ///
    /// Every alternative of a non-terminal is equally likely. Expansion uses an
    /// explicit work stack; nesting beyond `max_recursion_depth` fails.
    pub fn derive_from<R: Rng>(&self, start: &str, rng: &mut R) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        let mut stack: Vec<(&Symbol, usize)> = Vec::new();

        self.choose(start, 0, rng, &mut stack)?;

        while let Some((symbol, depth)) = stack.pop() {
            match symbol {
                Symbol::Terminal(text) => tokens.push(text.clone()),
                Symbol::NonTerminal(name) => self.choose(name, depth, rng, &mut stack)?,
                Symbol::Empty => {}
                Symbol::Vocabulary(reference) => {
                    return Err(GrammarError::InvalidGrammar(format!(
                        "unresolved vocabulary {:?} reached during derivation",
                        reference.category
                    )));
                }
            }
        }

        Ok(tokens)
    }

    /// Pick one alternative of `name` and queue its symbols in order
    fn choose<'a, R: Rng>(
        &'a self,
        name: &str,
        depth: usize,
        rng: &mut R,
        stack: &mut Vec<(&'a Symbol, usize)>,
    ) -> Result<()> {
        if depth >= self.config.max_recursion_depth {
            return Err(GrammarError::DerivationDepthExceeded {
                symbol: name.to_string(),
                limit: self.config.max_recursion_depth,
            });
        }

        let alternatives = self
            .rules
            .get(name)
            .ok_or_else(|| GrammarError::UnknownNonTerminal(name.to_string()))?;
        if alternatives.is_empty() {
            return Err(GrammarError::EmptyProduction(name.to_string()));
        }

        let alternative = &alternatives[rng.gen_range(0..alternatives.len())];
        stack.extend(alternative.symbols().iter().rev().map(|symbol| (symbol, depth + 1)));
        Ok(())
    }
}

impl TryFrom<RuleSet> for ResolvedGrammar {
    type Error = GrammarError;

    /// Accept a rule set that already holds no vocabulary references
    fn try_from(rules: RuleSet) -> Result<Self> {
        if rules.has_vocabulary() {
            return Err(GrammarError::InvalidGrammar(
                "rule set still references vocabularies".to_string(),
            ));
        }
        let (start_symbol, rules, diagnostics) = rules.into_parts();
        Ok(ResolvedGrammar::from_parts(start_symbol, rules, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn literals(words: &[&str]) -> Vec<Alternative> {
        words
            .iter()
            .map(|word| Alternative::single(Symbol::terminal(word)))
            .collect()
    }

    fn greeting() -> ResolvedGrammar {
        let mut grammar = ResolvedGrammar::new("greeting");
        grammar
            .define(
                "greeting",
                vec![Alternative::sequence(vec![
                    Symbol::terminal("Hello"),
                    Symbol::terminal(" "),
                    Symbol::non_terminal("subject"),
                ])],
            )
            .unwrap();
        grammar
            .define("subject", literals(&["world", "Rust", "friend"]))
            .unwrap();
        grammar
    }

    #[test]
    fn test_derive_concatenates_in_order() {
        let grammar = greeting();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let tokens = grammar.derive(&mut rng).unwrap();
            assert_eq!(tokens.len(), 3);
            assert_eq!(tokens[0], "Hello");
            assert_eq!(tokens[1], " ");
            assert!(["world", "Rust", "friend"].contains(&tokens[2].as_str()));
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let grammar = greeting();

        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..10)
                .map(|_| grammar.derive(&mut rng).unwrap().concat())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_empty_alternative_is_equally_likely() {
        let mut grammar = ResolvedGrammar::new("start");
        let mut alternatives = literals(&["a", "b"]);
        alternatives.push(Alternative::Empty);
        grammar.define("start", alternatives).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut empty = 0;
        for _ in 0..3000 {
            if grammar.derive(&mut rng).unwrap().is_empty() {
                empty += 1;
            }
        }
        assert!((800..1200).contains(&empty), "empty chosen {} times", empty);
    }

    #[test]
    fn test_empty_symbol_contributes_nothing() {
        let mut grammar = ResolvedGrammar::new("start");
        grammar
            .define(
                "start",
                vec![Alternative::sequence(vec![
                    Symbol::Empty,
                    Symbol::terminal("x"),
                    Symbol::Empty,
                ])],
            )
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(grammar.derive(&mut rng).unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn test_empty_production_fails() {
        let mut grammar = ResolvedGrammar::new("start");
        grammar
            .define(
                "start",
                vec![Alternative::sequence(vec![
                    Symbol::terminal("of"),
                    Symbol::non_terminal("WHERE"),
                ])],
            )
            .unwrap();
        grammar.define("WHERE", Vec::new()).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = grammar.derive(&mut rng).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyProduction(name) if name == "WHERE"));
    }

    #[test]
    fn test_unknown_non_terminal_fails() {
        let mut grammar = ResolvedGrammar::new("start");
        grammar
            .define("start", vec![Alternative::single(Symbol::non_terminal("missing"))])
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = grammar.derive(&mut rng).unwrap_err();
        assert!(matches!(err, GrammarError::UnknownNonTerminal(name) if name == "missing"));
    }

    #[test]
    fn test_recursion_limit() {
        let mut grammar = ResolvedGrammar::new("recursive").with_config(GrammarConfig {
            max_recursion_depth: 5,
        });
        grammar
            .define(
                "recursive",
                vec![Alternative::sequence(vec![
                    Symbol::non_terminal("recursive"),
                    Symbol::terminal("loop"),
                ])],
            )
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = grammar.derive(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::DerivationDepthExceeded { limit: 5, .. }
        ));
    }

    #[test]
    fn test_define_rejects_vocabulary() {
        let mut grammar = ResolvedGrammar::new("start");
        let reference = VocabularyRef::new(Category::Nouns, Some("air"), vec![Gender::Neutral]);
        let result = grammar.define("start", vec![Alternative::single(Symbol::Vocabulary(reference))]);
        assert!(matches!(result, Err(GrammarError::InvalidGrammar(_))));
    }

    #[test]
    fn test_rule_set_last_definition_wins() {
        let mut rules = RuleSet::new("S");
        rules.define("CORE", literals(&["one"]));
        rules.define("CORE", literals(&["two", "three"]));
        assert_eq!(rules.alternatives("CORE").unwrap(), literals(&["two", "three"]).as_slice());

        rules.add_alternative("CORE", Alternative::Empty);
        assert_eq!(rules.alternatives("CORE").unwrap().len(), 3);
    }

    #[test]
    fn test_try_from_rule_set() {
        let mut rules = RuleSet::new("S");
        rules.define("S", literals(&["only"]));
        let grammar = ResolvedGrammar::try_from(rules.clone()).unwrap();
        assert_eq!(grammar.start_symbol(), "S");

        let reference = VocabularyRef::new(Category::Positions, None, vec![Gender::Male]);
        rules.add_alternative("S", Alternative::single(Symbol::Vocabulary(reference)));
        assert!(ResolvedGrammar::try_from(rules).is_err());
    }

    #[test]
    fn test_json_keeps_quotes_and_pipes() {
        let mut grammar = ResolvedGrammar::new("S");
        grammar
            .define("S", literals(&["O'Brien", "a | b", "\"Red\""]))
            .unwrap();

        let json = grammar.to_json().unwrap();
        let restored = ResolvedGrammar::from_json_str(&json).unwrap();
        assert_eq!(restored, grammar);
    }

    #[test]
    fn test_resolved_json_rejects_vocabulary() {
        let mut rules = RuleSet::new("S");
        let reference = VocabularyRef::new(Category::Forenames, Some("orc"), vec![Gender::Female]);
        rules.define("S", vec![Alternative::single(Symbol::Vocabulary(reference))]);

        let json = rules.to_json().unwrap();
        assert!(RuleSet::from_json_str(&json).unwrap().has_vocabulary());
        assert!(matches!(
            ResolvedGrammar::from_json_str(&json),
            Err(GrammarError::InvalidGrammar(_))
        ));
    }
}
