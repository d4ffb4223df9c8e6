use tracing::{debug, warn};

use crate::config::{Gender, NameConfig, NameOrder};
use crate::grammar::{Alternative, Category, RuleSet, Symbol, VocabularyRef};
use crate::utils::Diagnostic;

/// Non-terminal names used by the name grammar
pub mod symbols {
    pub const START: &str = "S";
    pub const PREFIX: &str = "PRE";
    pub const TITLE: &str = "TITLE";
    pub const CORE: &str = "CORE";
    pub const POSTFIX: &str = "POST";
    pub const WHERE: &str = "WHERE";
    pub const FORENAME: &str = "FORENAME";
    pub const SURNAME: &str = "SURNAME";
    pub const ADJECTIVE: &str = "ADJ";
    pub const NOUN: &str = "NOUN";
    pub const SPACE: &str = "SPC";
    pub const OF: &str = "OF";
}

use symbols::*;

/// Assembles the rule set for one name configuration
pub struct GrammarBuilder<'a> {
    config: &'a NameConfig,
    rules: RuleSet,
}

impl<'a> GrammarBuilder<'a> {
    pub fn new(config: &'a NameConfig) -> Self {
        GrammarBuilder {
            config,
            rules: RuleSet::new(START),
        }
    }

    /// Build the rule set. Unusual settings are reported as diagnostics on the
    /// returned rule set rather than failing.
    pub fn build(mut self) -> RuleSet {
        if !self.config.has_gender_selection() {
            self.report(Diagnostic::NoGenderSelected);
        }
        let genders = self.config.gender_variants();

        self.basic_tokens();

        let mut start = Vec::new();
        if self.config.has_title_prefix {
            self.define_prefix(&genders);
            start.push(Symbol::non_terminal(PREFIX));
        }
        start.push(Symbol::non_terminal(CORE));
        if self.config.has_origin_postfix {
            self.define_postfix();
            start.push(Symbol::non_terminal(POSTFIX));
        }
        self.rules.define(START, vec![Alternative::sequence(start)]);

        let order = self.name_order();
        self.define_core(&order, &genders);

        debug!(
            rules = self.rules.rules().len(),
            order = %order,
            origin = self.config.origin.as_str(),
            bank = self.config.name_bank.as_str(),
            "built name grammar"
        );
        self.rules
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.rules.push_diagnostic(diagnostic);
    }

    fn basic_tokens(&mut self) {
        self.rules
            .define(SPACE, vec![Alternative::single(Symbol::terminal(" "))])
            .define(OF, vec![Alternative::single(Symbol::terminal("of"))]);
    }

    /// Add the empty choice to a segment when segments are optional
    fn segment(&self, body: Vec<Symbol>) -> Vec<Alternative> {
        let mut alternatives = vec![Alternative::sequence(body)];
        if self.config.optional_segments {
            alternatives.push(Alternative::Empty);
        }
        alternatives
    }

    fn define_prefix(&mut self, genders: &[Gender]) {
        let prefix = self.segment(vec![Symbol::non_terminal(TITLE), Symbol::non_terminal(SPACE)]);
        let titles = per_gender(Category::Positions, None, genders);
        self.rules.define(PREFIX, prefix).define(TITLE, titles);
    }

    fn define_postfix(&mut self) {
        let postfix = self.segment(vec![
            Symbol::non_terminal(SPACE),
            Symbol::non_terminal(OF),
            Symbol::non_terminal(SPACE),
            Symbol::non_terminal(WHERE),
        ]);
        let origin = self.config.origin.as_str();
        // Exactly one source per origin
        let places = vec![vocabulary(Category::Postfixes, Some(origin))];
        self.rules.define(POSTFIX, postfix).define(WHERE, places);
    }

    /// Resolve the configured order, falling back to Western
    fn name_order(&mut self) -> NameOrder {
        let config = self.config;
        match &config.order {
            NameOrder::Unrecognized(value) => {
                self.report(Diagnostic::UnknownNameOrder {
                    value: value.clone(),
                });
                NameOrder::Western
            }
            order => order.clone(),
        }
    }

    fn define_core(&mut self, order: &NameOrder, genders: &[Gender]) {
        let forename = Symbol::non_terminal(FORENAME);
        let surname = Symbol::non_terminal(SURNAME);
        let space = Symbol::non_terminal(SPACE);

        let (core, uses_forename, uses_surname) = match order {
            NameOrder::Eastern => (vec![surname, space, forename], true, true),
            NameOrder::ForenameOnly => (vec![forename], true, false),
            NameOrder::SurnameOnly => (vec![surname], false, true),
            NameOrder::Western | NameOrder::Unrecognized(_) => {
                (vec![forename, space, surname], true, true)
            }
        };
        self.rules.define(CORE, vec![Alternative::sequence(core)]);

        if uses_forename {
            let bank = self.config.name_bank.as_str();
            let forenames = per_gender(Category::Forenames, Some(bank), genders);
            self.rules.define(FORENAME, forenames);
        }
        if uses_surname {
            self.define_surname();
        }
    }

    /// Surnames are composed from an origin adjective and noun, e.g. Stone + heart
    fn define_surname(&mut self) {
        let origin = self.config.origin.as_str();
        self.rules
            .define(
                SURNAME,
                vec![Alternative::sequence(vec![
                    Symbol::non_terminal(ADJECTIVE),
                    Symbol::non_terminal(NOUN),
                ])],
            )
            .define(ADJECTIVE, vec![vocabulary(Category::Adjectives, Some(origin))])
            .define(NOUN, vec![vocabulary(Category::Nouns, Some(origin))]);
    }
}

/// Build the raw rule set for a configuration
pub fn build(config: &NameConfig) -> RuleSet {
    GrammarBuilder::new(config).build()
}

/// A single neutral vocabulary reference
fn vocabulary(category: Category, culture: Option<&str>) -> Alternative {
    Alternative::single(Symbol::Vocabulary(VocabularyRef::new(
        category,
        culture,
        vec![Gender::Neutral],
    )))
}

/// One vocabulary alternative per gender variant
fn per_gender(category: Category, culture: Option<&str>, genders: &[Gender]) -> Vec<Alternative> {
    genders
        .iter()
        .map(|gender| {
            Alternative::single(Symbol::Vocabulary(VocabularyRef::new(
                category,
                culture,
                vec![*gender],
            )))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NameBank, Origin};
    use pretty_assertions::assert_eq;

    fn sequence_names(alternative: &Alternative) -> Vec<&str> {
        alternative
            .symbols()
            .iter()
            .map(|symbol| match symbol {
                Symbol::NonTerminal(name) => name.as_str(),
                Symbol::Terminal(text) => text.as_str(),
                Symbol::Vocabulary(_) => "<vocabulary>",
                Symbol::Empty => "<empty>",
            })
            .collect()
    }

    fn core_of(rules: &RuleSet) -> Vec<&str> {
        sequence_names(&rules.alternatives(CORE).unwrap()[0])
    }

    #[test]
    fn test_default_grammar_shape() {
        let rules = build(&NameConfig::default());

        assert_eq!(rules.start_symbol(), START);
        assert_eq!(
            sequence_names(&rules.alternatives(START).unwrap()[0]),
            vec![PREFIX, CORE, POSTFIX]
        );
        assert_eq!(
            sequence_names(&rules.alternatives(PREFIX).unwrap()[0]),
            vec![TITLE, SPACE]
        );
        assert_eq!(
            sequence_names(&rules.alternatives(POSTFIX).unwrap()[0]),
            vec![SPACE, OF, SPACE, WHERE]
        );
        assert_eq!(core_of(&rules), vec![FORENAME, SPACE, SURNAME]);
        assert_eq!(
            sequence_names(&rules.alternatives(SURNAME).unwrap()[0]),
            vec![ADJECTIVE, NOUN]
        );
        assert!(rules.diagnostics().is_empty());
    }

    #[test]
    fn test_core_follows_order() {
        let base = NameConfig::new(Origin::Urban, NameBank::American).with_gender(Gender::Female);

        let eastern = build(&base.clone().with_order(NameOrder::Eastern));
        assert_eq!(core_of(&eastern), vec![SURNAME, SPACE, FORENAME]);

        let forename_only = build(&base.clone().with_order(NameOrder::ForenameOnly));
        assert_eq!(core_of(&forename_only), vec![FORENAME]);
        assert!(!forename_only.has_non_terminal(SURNAME));

        let surname_only = build(&base.with_order(NameOrder::SurnameOnly));
        assert_eq!(core_of(&surname_only), vec![SURNAME]);
        assert!(!surname_only.has_non_terminal(FORENAME));
    }

    #[test]
    fn test_unknown_order_falls_back_to_western() {
        let config = NameConfig::default().with_order("upside-down");
        let rules = build(&config);

        assert_eq!(core_of(&rules), vec![FORENAME, SPACE, SURNAME]);
        assert_eq!(
            rules.diagnostics(),
            &[Diagnostic::UnknownNameOrder {
                value: "upside-down".to_string()
            }]
        );
    }

    #[test]
    fn test_forename_has_one_alternative_per_gender() {
        let config = NameConfig::new(Origin::Forest, NameBank::Gaelic)
            .with_gender(Gender::Male)
            .with_gender(Gender::Female);
        let rules = build(&config);

        let forenames = rules.alternatives(FORENAME).unwrap();
        let references: Vec<&VocabularyRef> = forenames
            .iter()
            .map(|alternative| match alternative.symbols() {
                [Symbol::Vocabulary(reference)] => reference,
                other => panic!("Expected a vocabulary reference, got {:?}", other),
            })
            .collect();

        assert_eq!(
            references,
            vec![
                &VocabularyRef::new(Category::Forenames, Some("gaelic"), vec![Gender::Male]),
                &VocabularyRef::new(Category::Forenames, Some("gaelic"), vec![Gender::Female]),
            ]
        );
    }

    #[test]
    fn test_no_gender_uses_neutral() {
        let config = NameConfig::new(Origin::Tundra, NameBank::Germanic).with_title_prefix(true);
        let rules = build(&config);

        assert_eq!(rules.diagnostics(), &[Diagnostic::NoGenderSelected]);
        assert_eq!(
            rules.alternatives(TITLE).unwrap(),
            &[vocabulary(Category::Positions, None)]
        );
    }

    #[test]
    fn test_optional_segments_add_empty_choice() {
        let config = NameConfig::default().with_optional_segments(true);
        let rules = build(&config);

        assert_eq!(rules.alternatives(PREFIX).unwrap().len(), 2);
        assert_eq!(rules.alternatives(PREFIX).unwrap()[1], Alternative::Empty);
        assert_eq!(rules.alternatives(POSTFIX).unwrap()[1], Alternative::Empty);
        assert_eq!(rules.alternatives(TITLE).unwrap().len(), 1);
    }

    #[test]
    fn test_segments_can_be_disabled() {
        let config = NameConfig::default()
            .with_title_prefix(false)
            .with_origin_postfix(false);
        let rules = build(&config);

        assert_eq!(
            sequence_names(&rules.alternatives(START).unwrap()[0]),
            vec![CORE]
        );
        assert!(!rules.has_non_terminal(PREFIX));
        assert!(!rules.has_non_terminal(WHERE));
    }

    #[test]
    fn test_where_uses_origin_postfix() {
        let config = NameConfig::new(Origin::Desert, NameBank::Orc).with_gender(Gender::Male);
        let rules = build(&config);
        assert_eq!(
            rules.alternatives(WHERE).unwrap(),
            &[vocabulary(Category::Postfixes, Some("desert"))]
        );
        assert_eq!(
            rules.alternatives(ADJECTIVE).unwrap(),
            &[vocabulary(Category::Adjectives, Some("desert"))]
        );
    }
}
