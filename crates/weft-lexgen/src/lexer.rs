use crate::{
    grammar::{Grammar, Rule},
    keywords::Keywords,
    model::TerminalDefinition,
    pattern::{escape_class, escape_regex, terminal_parts, TerminalParts, TerminalPattern},
    tokenizer::{
        Action, State, TokenizerDescription, TokenizerRule, COMMENT_STATE, COMMENT_TOKEN,
        KEYWORDS_ATTRIBUTE, KEYWORD_TOKEN, MAIN_STATE, OPERATORS_ATTRIBUTE, OPERATOR_TOKEN,
        PLAIN_TOKEN, POP, STRING_TOKEN, SYMBOLS_ATTRIBUTE, WHITESPACE_STATE, WHITE_TOKEN,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TerminalClass {
    Whitespace,
    Comment,
    Token,
}

/// Decides where a terminal goes, `None` if it cannot be used as a token class at all.
pub fn classify_terminal(rule: &Rule, pattern: &TerminalPattern) -> Option<TerminalClass> {
    let hidden = rule.attributes.hidden;
    let space = pattern.matches_space();

    if hidden && !space {
        Some(TerminalClass::Comment)
    } else if !hidden && pattern.matches_blank() {
        None
    } else if space {
        Some(TerminalClass::Whitespace)
    } else {
        Some(TerminalClass::Token)
    }
}

/// Token class of a main state terminal, the declared type is unreliable for strings.
pub fn token_class(rule: &Rule) -> &str {
    if rule.name.eq_ignore_ascii_case(STRING_TOKEN) {
        STRING_TOKEN
    } else {
        rule.type_name.as_deref().unwrap_or(&rule.name)
    }
}

fn token_rule(rule: &Rule, pattern: &TerminalPattern, keywords: &Keywords) -> TokenizerRule {
    let class = token_class(rule);
    let occludes = keywords
        .keywords
        .iter()
        .any(|keyword| pattern.is_full_match(keyword));

    let action = match occludes {
        true => Action::member_or(KEYWORDS_ATTRIBUTE, KEYWORD_TOKEN, class),
        false => Action::token(class),
    };
    TokenizerRule::new(pattern.source(), action)
}

/// Rules of the state entered after a comment's start delimiter.
fn comment_state(name: String, parts: &TerminalParts) -> State {
    let delimiters = escape_class(&format!("{}{}", parts.start, parts.end));

    let mut state = State::new(name);
    state.rules.extend([
        TokenizerRule::new(format!("[^{delimiters}]+"), Action::token(COMMENT_TOKEN)),
        TokenizerRule::new(escape_regex(&parts.end), Action::next(COMMENT_TOKEN, POP)),
        TokenizerRule::new(format!("[{delimiters}]"), Action::token(COMMENT_TOKEN)),
    ]);
    state
}

impl Grammar {
    pub fn create_tokenizer(&self) -> TokenizerDescription {
        let keywords = Keywords::new(self);

        let mut initial = State::new(MAIN_STATE);
        let mut whitespace = State::new(WHITESPACE_STATE);
        let mut comments = Vec::new();

        for (_, rule, definition) in self.terminal_rules() {
            let TerminalDefinition::Regex { pattern } = definition else {
                log::debug!("Skipping terminal {}, not a regular expression", rule.name);
                continue;
            };
            if rule.attributes.fragment {
                log::debug!("Skipping fragment terminal {}", rule.name);
                continue;
            }
            let pattern = match TerminalPattern::new(pattern) {
                Ok(ok) => ok,
                Err(e) => {
                    log::debug!("Skipping terminal {}, unsupported pattern: {e}", rule.name);
                    continue;
                }
            };

            match classify_terminal(rule, &pattern) {
                Some(TerminalClass::Whitespace) => {
                    let action = Action::token(WHITE_TOKEN);
                    whitespace
                        .rules
                        .push(TokenizerRule::new(pattern.source(), action));
                }
                Some(TerminalClass::Comment) => {
                    let parts = terminal_parts(pattern.source());
                    if parts.is_delimited() {
                        let name = match comments.len() {
                            0 => COMMENT_STATE.to_owned(),
                            n => format!("{COMMENT_STATE}_{}", n + 1),
                        };
                        let action = Action::next(COMMENT_TOKEN, &format!("@{name}"));
                        whitespace
                            .rules
                            .push(TokenizerRule::new(escape_regex(&parts.start), action));
                        comments.push(comment_state(name, &parts));
                    } else {
                        let action = Action::token(COMMENT_TOKEN);
                        whitespace
                            .rules
                            .push(TokenizerRule::new(pattern.source(), action));
                    }
                }
                Some(TerminalClass::Token) => {
                    initial.rules.push(token_rule(rule, &pattern, &keywords));
                }
                None => log::debug!("Skipping terminal {}, it matches blank text", rule.name),
            }
        }

        initial.rules.push(TokenizerRule::include(WHITESPACE_STATE));
        initial.rules.push(TokenizerRule::new(
            SYMBOLS_ATTRIBUTE,
            Action::member_or(OPERATORS_ATTRIBUTE, OPERATOR_TOKEN, PLAIN_TOKEN),
        ));

        let symbols = keywords.symbols_pattern();
        let Keywords {
            keywords,
            symbols: operators,
        } = keywords;

        let mut tokenizer = vec![initial, whitespace];
        tokenizer.extend(comments);

        TokenizerDescription {
            keywords,
            operators,
            symbols,
            tokenizer,
        }
    }
}
