use std::collections::HashSet;

use cranelift_entity::EntitySet;

use crate::{
    collate,
    grammar::{Element, Grammar, RcString, RuleBody},
    pattern::escape_regex,
};

/// Keyword literals of a grammar, split by whether they contain a letter.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Keywords {
    /// Reserved words, e.g. `if`.
    pub keywords: Vec<String>,
    /// Punctuation and operators, e.g. `+` or `,`.
    pub symbols: Vec<String>,
}

impl Keywords {
    pub fn new(grammar: &Grammar) -> Keywords {
        let (mut keywords, mut symbols): (Vec<String>, Vec<String>) =
            collect_keywords(grammar)
                .into_iter()
                .map(|literal| literal.to_string())
                .partition(|literal| is_word(literal));

        collate::sort(&mut keywords);
        collate::sort(&mut symbols);

        Keywords { keywords, symbols }
    }

    /// Alternation of all escaped symbols. Longer symbols come first so that `==` is not matched
    /// as two `=`.
    pub fn symbols_pattern(&self) -> String {
        if self.symbols.is_empty() {
            // an empty alternation would match the empty string
            return "[^\\s\\S]".to_owned();
        }

        let mut symbols = self.symbols.iter().collect::<Vec<_>>();
        symbols.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| collate::compare(a, b))
        });

        let escaped = symbols
            .into_iter()
            .map(|symbol| escape_regex(symbol))
            .collect::<Vec<_>>();
        escaped.join("|")
    }
}

pub fn is_word(literal: &str) -> bool {
    literal.chars().any(char::is_alphabetic)
}

/// Distinct keyword literals of all parser rules reachable from the entry rules.
pub fn collect_keywords(grammar: &Grammar) -> HashSet<RcString> {
    let mut keywords = HashSet::new();
    let mut visited = EntitySet::new();
    let mut stack = grammar.entry_rules();

    while let Some(handle) = stack.pop() {
        if visited.contains(handle) {
            continue;
        }
        visited.insert(handle);
        let Some(RuleBody::Parser(element)) = grammar.get_rule(handle).map(|rule| &rule.body)
        else {
            continue;
        };

        element.visit(&mut |element| match element {
            Element::Keyword(literal) => {
                keywords.insert(literal.clone());
            }
            Element::RuleCall(Some(called)) => stack.push(*called),
            _ => {}
        });
    }

    keywords
}
