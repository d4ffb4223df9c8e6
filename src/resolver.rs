use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::grammar::{Alternative, ResolvedGrammar, RuleSet, Symbol, VocabularyRef};
use crate::utils::Diagnostic;
use crate::vocabulary::VocabularyProvider;

/// Replaces vocabulary references with literal alternatives drawn from a provider
pub struct TerminalResolver<'p, P: VocabularyProvider + ?Sized> {
    provider: &'p P,
}

impl<'p, P: VocabularyProvider + ?Sized> TerminalResolver<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        TerminalResolver { provider }
    }

    /// Resolve every vocabulary reference in `rules`.
    ///
    /// An alternative made of a single reference is replaced by one literal
    /// alternative per pooled entry. A reference inside a longer sequence is
    /// moved into a synthetic non-terminal named `<owner>/<n>` holding the
    /// pooled entries; `n` skips any name already defined, so existing rules
    /// are never replaced. Missing sources contribute nothing and are reported as
    /// diagnostics; a non-terminal left without alternatives only fails once
    /// derivation reaches it.
    pub fn resolve(&self, rules: RuleSet) -> ResolvedGrammar {
        let (start_symbol, rules, mut diagnostics) = rules.into_parts();
        let mut taken: BTreeSet<String> = rules.keys().cloned().collect();
        let mut resolved = BTreeMap::new();
        let mut hoisted = Vec::new();

        for (name, alternatives) in rules {
            let mut literals = Vec::with_capacity(alternatives.len());

            for alternative in alternatives {
                if !alternative.has_vocabulary() {
                    literals.push(alternative);
                    continue;
                }

                let Alternative::Sequence(symbols) = alternative else {
                    continue;
                };
                if let [Symbol::Vocabulary(reference)] = symbols.as_slice() {
                    literals.extend(self.pool(reference, &mut diagnostics));
                    continue;
                }

                let mut sequence = Vec::with_capacity(symbols.len());
                for symbol in symbols {
                    match symbol {
                        Symbol::Vocabulary(reference) => {
                            let synthetic = synthetic_name(&name, &mut taken);
                            hoisted.push((synthetic.clone(), self.pool(&reference, &mut diagnostics)));
                            sequence.push(Symbol::NonTerminal(synthetic));
                        }
                        other => sequence.push(other),
                    }
                }
                literals.push(Alternative::Sequence(sequence));
            }

            resolved.insert(name, literals);
        }
        resolved.extend(hoisted);

        debug!(
            rules = resolved.len(),
            alternatives = resolved.values().map(Vec::len).sum::<usize>(),
            "resolved name grammar"
        );
        ResolvedGrammar::from_parts(start_symbol, resolved, diagnostics)
    }

    /// Pool the entries of every gender variant, in order, without deduplication
    fn pool(&self, reference: &VocabularyRef, diagnostics: &mut Vec<Diagnostic>) -> Vec<Alternative> {
        let mut pooled = Vec::new();

        for gender in &reference.genders {
            let entries = self
                .provider
                .list(reference.category, reference.culture.as_deref(), *gender);

            if entries.is_empty() {
                let diagnostic = Diagnostic::MissingVocabularySource {
                    category: reference.category,
                    culture: reference.culture.clone(),
                    gender: *gender,
                };
                warn!("{}", diagnostic);
                if !diagnostics.contains(&diagnostic) {
                    diagnostics.push(diagnostic);
                }
            }

            pooled.extend(
                entries
                    .into_iter()
                    .map(|entry| Alternative::single(Symbol::Terminal(entry))),
            );
        }

        pooled
    }
}

/// First free `<owner>/<n>` name, reserved in `taken`
fn synthetic_name(owner: &str, taken: &mut BTreeSet<String>) -> String {
    let mut index = 0;
    loop {
        let candidate = format!("{}/{}", owner, index);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        index += 1;
    }
}

/// Resolve a rule set against a vocabulary provider
pub fn resolve<P: VocabularyProvider + ?Sized>(rules: RuleSet, provider: &P) -> ResolvedGrammar {
    TerminalResolver::new(provider).resolve(rules)
}
