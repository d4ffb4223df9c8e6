use rand::Rng;
use tracing::debug;

use crate::builder::GrammarBuilder;
use crate::config::NameConfig;
use crate::format::NameFormatter;
use crate::grammar::{GrammarConfig, ResolvedGrammar};
use crate::resolver::TerminalResolver;
use crate::utils::Result;
use crate::vocabulary::VocabularyProvider;

/// Generates names from one configuration.
///
/// The grammar is built and resolved once; every call to `generate` derives
/// from the same immutable grammar, so a generator can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    grammar: ResolvedGrammar,
    formatter: NameFormatter,
}

impl NameGenerator {
    /// Build and resolve the grammar for `config`. All vocabulary reads happen here.
    pub fn new<P: VocabularyProvider + ?Sized>(config: &NameConfig, provider: &P) -> Self {
        let rules = GrammarBuilder::new(config).build();
        let grammar = TerminalResolver::new(provider).resolve(rules);
        NameGenerator::from_grammar(grammar)
    }

    pub fn from_grammar(grammar: ResolvedGrammar) -> Self {
        NameGenerator {
            grammar,
            formatter: NameFormatter::default(),
        }
    }

    pub fn with_grammar_config(mut self, config: GrammarConfig) -> Self {
        self.grammar.set_config(config);
        self
    }

    pub fn with_formatter(mut self, formatter: NameFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn grammar(&self) -> &ResolvedGrammar {
        &self.grammar
    }

    pub fn generate_tokens<R: Rng>(&self, rng: &mut R) -> Result<Vec<String>> {
        self.grammar.derive(rng)
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<String> {
        let tokens = self.generate_tokens(rng)?;
        let name = self.formatter.format(&tokens);
        debug!(tokens = tokens.len(), name = %name, "generated name");
        Ok(name)
    }
}

/// Build, resolve and derive a single name
pub fn generate_name<P, R>(config: &NameConfig, provider: &P, rng: &mut R) -> Result<String>
where
    P: VocabularyProvider + ?Sized,
    R: Rng,
{
    NameGenerator::new(config, provider).generate(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Gender, NameBank, NameOrder, Origin};
    use crate::format::NameCase;
    use crate::grammar::Category;
    use crate::utils::GrammarError;
    use crate::vocabulary::MemoryVocabulary;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn orc_vocabulary() -> MemoryVocabulary {
        MemoryVocabulary::new()
            .with(Category::Forenames, Some("orc"), Gender::Female, &["Garona", "Shaza"])
            .with(Category::Adjectives, Some("desert"), Gender::Neutral, &["sand", "sun"])
            .with(Category::Nouns, Some("desert"), Gender::Neutral, &["fang", "claw"])
            .with(Category::Postfixes, Some("desert"), Gender::Neutral, &["the dunes"])
    }

    #[test]
    fn test_generator_is_reusable() {
        let config = NameConfig::new(Origin::Desert, NameBank::Orc).with_gender(Gender::Female);
        let generator = NameGenerator::new(&config, &orc_vocabulary());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..10 {
            let name = generator.generate(&mut rng).unwrap();
            assert!(name.ends_with(" Of The Dunes"), "unexpected name {}", name);
            assert!(name.starts_with("Garona ") || name.starts_with("Shaza "));
        }
    }

    #[test]
    fn test_generate_name_with_formatter() {
        let config = NameConfig::new(Origin::Desert, NameBank::Orc)
            .with_gender(Gender::Female)
            .with_order(NameOrder::SurnameOnly)
            .with_origin_postfix(false);
        let generator = NameGenerator::new(&config, &orc_vocabulary())
            .with_formatter(NameFormatter::new(NameCase::Upper));
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let name = generator.generate(&mut rng).unwrap();
        assert!(
            ["SANDFANG", "SANDCLAW", "SUNFANG", "SUNCLAW"].contains(&name.as_str()),
            "unexpected name {}",
            name
        );
    }

    #[test]
    fn test_missing_forenames_fail() {
        let config = NameConfig::new(Origin::Desert, NameBank::Orc).with_gender(Gender::Male);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let err = generate_name(&config, &orc_vocabulary(), &mut rng).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyProduction(name) if name == "FORENAME"));
    }
}
