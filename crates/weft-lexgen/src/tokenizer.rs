//! Declarative tokenizer description in the shape consumed by Monarch-style highlighters.

use serde::{ser::SerializeMap, Serialize, Serializer};

pub const MAIN_STATE: &str = "initial";
pub const WHITESPACE_STATE: &str = "whitespace";
pub const COMMENT_STATE: &str = "comment";

pub const KEYWORDS_ATTRIBUTE: &str = "@keywords";
pub const OPERATORS_ATTRIBUTE: &str = "@operators";
pub const SYMBOLS_ATTRIBUTE: &str = "@symbols";
pub const DEFAULT_CASE: &str = "@default";
pub const POP: &str = "@pop";

pub const KEYWORD_TOKEN: &str = "keyword";
pub const OPERATOR_TOKEN: &str = "operator";
pub const WHITE_TOKEN: &str = "white";
pub const COMMENT_TOKEN: &str = "comment";
pub const STRING_TOKEN: &str = "string";
pub const PLAIN_TOKEN: &str = "";

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct TokenizerDescription {
    pub keywords: Vec<String>,
    pub operators: Vec<String>,
    pub symbols: String,
    #[serde(serialize_with = "serialize_states")]
    pub tokenizer: Vec<State>,
}

impl TokenizerDescription {
    pub fn state(&self, name: &str) -> Option<&State> {
        self.tokenizer.iter().find(|state| state.name == name)
    }
    /// Whether `text` is listed under a `@keywords` or `@operators` attribute.
    pub fn is_member(&self, attribute: &str, text: &str) -> bool {
        let list = match attribute {
            KEYWORDS_ATTRIBUTE => &self.keywords,
            OPERATORS_ATTRIBUTE => &self.operators,
            _ => return false,
        };
        list.iter().any(|item| item == text)
    }
}

fn serialize_states<S: Serializer>(states: &[State], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(states.len()))?;
    for state in states {
        map.serialize_entry(&state.name, &state.rules)?;
    }
    map.end()
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    pub name: String,
    pub rules: Vec<TokenizerRule>,
}

impl State {
    pub fn new(name: impl Into<String>) -> State {
        State {
            name: name.into(),
            rules: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(untagged)]
pub enum TokenizerRule {
    Match { regex: String, action: Action },
    Include { include: String },
}

impl TokenizerRule {
    pub fn new(regex: impl Into<String>, action: Action) -> TokenizerRule {
        TokenizerRule::Match {
            regex: regex.into(),
            action,
        }
    }
    pub fn include(state: &str) -> TokenizerRule {
        TokenizerRule::Include {
            include: format!("@{state}"),
        }
    }
    pub fn regex(&self) -> Option<&str> {
        match self {
            TokenizerRule::Match { regex, .. } => Some(regex),
            TokenizerRule::Include { .. } => None,
        }
    }
    pub fn action(&self) -> Option<&Action> {
        match self {
            TokenizerRule::Match { action, .. } => Some(action),
            TokenizerRule::Include { .. } => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    Token {
        token: String,
        next: Option<String>,
    },
    /// Guard-to-action pairs, tried in order.
    Cases(Vec<(String, Action)>),
}

impl Action {
    pub fn token(token: &str) -> Action {
        Action::Token {
            token: token.to_owned(),
            next: None,
        }
    }
    pub fn next(token: &str, next: &str) -> Action {
        Action::Token {
            token: token.to_owned(),
            next: Some(next.to_owned()),
        }
    }
    /// Classifies the match with `token` if it is one of `attribute`, otherwise with `fallback`.
    pub fn member_or(attribute: &str, token: &str, fallback: &str) -> Action {
        Action::Cases(vec![
            (attribute.to_owned(), Action::token(token)),
            (DEFAULT_CASE.to_owned(), Action::token(fallback)),
        ])
    }

    /// The token class this action assigns when `text` is matched and `is_member` answers
    /// whether `text` belongs to a named attribute list.
    pub fn classify<'a>(
        &'a self,
        text: &str,
        is_member: &dyn Fn(&str, &str) -> bool,
    ) -> Option<&'a str> {
        match self {
            Action::Token { token, .. } => Some(token.as_str()),
            Action::Cases(cases) => cases.iter().find_map(|(guard, action)| {
                let applies = guard == DEFAULT_CASE || is_member(guard, text);
                match applies {
                    true => action.classify(text, is_member),
                    false => None,
                }
            }),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Action::Token { token, next } => {
                let len = 1 + usize::from(next.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("token", token)?;
                if let Some(next) = next {
                    map.serialize_entry("next", next)?;
                }
                map.end()
            }
            Action::Cases(cases) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("cases", &CasesMap(cases))?;
                map.end()
            }
        }
    }
}

struct CasesMap<'a>(&'a [(String, Action)]);

impl Serialize for CasesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (guard, action) in self.0 {
            map.serialize_entry(guard, action)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_monarch_shape() {
        let mut initial = State::new(MAIN_STATE);
        initial.rules.push(TokenizerRule::new(
            "[a-z]+",
            Action::member_or(KEYWORDS_ATTRIBUTE, KEYWORD_TOKEN, "ID"),
        ));
        initial
            .rules
            .push(TokenizerRule::include(WHITESPACE_STATE));

        let mut whitespace = State::new(WHITESPACE_STATE);
        whitespace
            .rules
            .push(TokenizerRule::new("\\/\\*", Action::next(COMMENT_TOKEN, "@comment")));

        let description = TokenizerDescription {
            keywords: vec!["def".into()],
            operators: vec!["+".into()],
            symbols: "\\+".into(),
            tokenizer: vec![initial, whitespace],
        };

        assert_eq!(
            serde_json::to_value(&description).unwrap(),
            json!({
                "keywords": ["def"],
                "operators": ["+"],
                "symbols": "\\+",
                "tokenizer": {
                    "initial": [
                        { "regex": "[a-z]+", "action": { "cases": {
                            "@keywords": { "token": "keyword" },
                            "@default": { "token": "ID" }
                        } } },
                        { "include": "@whitespace" }
                    ],
                    "whitespace": [
                        { "regex": "\\/\\*", "action": { "token": "comment", "next": "@comment" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn classify_cases_in_order() {
        let action = Action::member_or(KEYWORDS_ATTRIBUTE, KEYWORD_TOKEN, "ID");
        let is_member = |attribute: &str, text: &str| attribute == KEYWORDS_ATTRIBUTE && text == "def";

        assert_eq!(action.classify("def", &is_member), Some(KEYWORD_TOKEN));
        assert_eq!(action.classify("foo", &is_member), Some("ID"));
    }
}
