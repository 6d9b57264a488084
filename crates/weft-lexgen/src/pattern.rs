//! Helpers for the regular expressions carried by terminal rules.
//!
//! Terminal patterns are written for the editor's regex engine, the `regex` crate is only used to
//! answer questions about them (does it match a blank, does it match a keyword).

use regex::Regex;

/// A terminal pattern compiled for unanchored search and for whole-input matching.
#[derive(Clone, Debug)]
pub struct TerminalPattern {
    source: String,
    search: Regex,
    full: Regex,
}

impl TerminalPattern {
    pub fn new(source: &str) -> Result<TerminalPattern, regex::Error> {
        Ok(TerminalPattern {
            source: source.to_owned(),
            search: Regex::new(source)?,
            full: Regex::new(&format!("^(?:{source})$"))?,
        })
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    /// Matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.search.is_match(text)
    }
    /// Matches all of `text`.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.full.is_match(text)
    }
    pub fn matches_blank(&self) -> bool {
        self.is_match("")
    }
    pub fn matches_space(&self) -> bool {
        self.is_full_match(" ")
    }
}

fn is_metacharacter(c: char) -> bool {
    matches!(
        c,
        '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '/'
    )
}

pub fn escape_regex_into(buf: &mut dyn std::fmt::Write, literal: &str) -> std::fmt::Result {
    for c in literal.chars() {
        if is_metacharacter(c) {
            buf.write_char('\\')?;
        }
        buf.write_char(c)?;
    }
    Ok(())
}

/// Escapes every regex metacharacter in `literal`.
pub fn escape_regex(literal: &str) -> String {
    let mut buf = String::with_capacity(literal.len());
    _ = escape_regex_into(&mut buf, literal);
    buf
}

/// Builds a character class body from the distinct characters of `chars`, in first-seen order.
pub fn escape_class(chars: &str) -> String {
    let mut seen = Vec::new();
    let mut buf = String::new();
    for c in chars.chars() {
        if seen.contains(&c) {
            continue;
        }
        seen.push(c);
        if !c.is_alphanumeric() && c != '_' {
            buf.push('\\');
        }
        buf.push(c);
    }
    buf
}

/// The literal text a pattern starts and ends with.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TerminalParts {
    pub start: String,
    pub end: String,
}

impl TerminalParts {
    /// Distinct, non-empty start and end delimiters with something in between.
    pub fn is_delimited(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty() && self.start != self.end
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Atom {
    Literal(char),
    Other,
}

#[derive(Clone)]
struct Scanner<'a> {
    inner: std::str::Chars<'a>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Scanner<'a> {
        Self {
            inner: src.chars(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.inner.clone().next()
    }

    fn next(&mut self) -> Option<char> {
        self.inner.next()
    }

    fn char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.next();
            true
        } else {
            false
        }
    }

    fn skip_class(&mut self) {
        // a leading ']' is a literal member of the class
        self.char('^');
        self.char(']');
        while let Some(c) = self.next() {
            match c {
                '\\' => {
                    self.next();
                }
                ']' => return,
                _ => {}
            }
        }
    }

    fn skip_counted(&mut self) {
        while let Some(c) = self.next() {
            if c == '}' {
                return;
            }
        }
    }
}

/// Splits `pattern` into the literal prefix and suffix around its first and last non-literal
/// atom. Patterns with a top-level alternation have no parts.
pub fn terminal_parts(pattern: &str) -> TerminalParts {
    let mut atoms = Vec::new();
    let mut depth = 0u32;
    let mut s = Scanner::new(pattern);

    // a quantifier turns the atom it applies to into a non-literal
    let quantify = |atoms: &mut Vec<Atom>, s: &mut Scanner| {
        if let Some(last) = atoms.last_mut() {
            *last = Atom::Other;
        }
        // lazy or possessive suffix
        if !s.char('?') {
            s.char('+');
        }
    };

    while let Some(c) = s.next() {
        match c {
            '\\' => match s.next() {
                Some('n') => atoms.push(Atom::Literal('\n')),
                Some('t') => atoms.push(Atom::Literal('\t')),
                Some('r') => atoms.push(Atom::Literal('\r')),
                Some(c) if !c.is_alphanumeric() => atoms.push(Atom::Literal(c)),
                _ => atoms.push(Atom::Other),
            },
            '[' => {
                s.skip_class();
                atoms.push(Atom::Other);
            }
            '(' => {
                depth += 1;
                atoms.push(Atom::Other);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                atoms.push(Atom::Other);
            }
            '|' if depth == 0 => return TerminalParts::default(),
            '*' | '+' | '?' => quantify(&mut atoms, &mut s),
            '{' => {
                s.skip_counted();
                quantify(&mut atoms, &mut s);
            }
            '.' | '^' | '$' | '|' => atoms.push(Atom::Other),
            c => atoms.push(Atom::Literal(c)),
        }
    }

    let literal = |atom: &Atom| match *atom {
        Atom::Literal(c) => Some(c),
        Atom::Other => None,
    };

    let start = atoms.iter().map_while(literal).collect::<String>();
    if start.chars().count() == atoms.len() {
        return TerminalParts {
            start,
            end: String::new(),
        };
    }

    let mut end = atoms.iter().rev().map_while(literal).collect::<Vec<_>>();
    end.reverse();

    TerminalParts {
        start,
        end: end.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_every_metacharacter() {
        assert_eq!(escape_regex("+"), "\\+");
        assert_eq!(escape_regex("a.b"), "a\\.b");
        assert_eq!(escape_regex("(*)"), "\\(\\*\\)");
        assert_eq!(escape_regex("/"), "\\/");
        assert_eq!(escape_regex(","), ",");

        for literal in ["+", "*", "?", "(", ")", "[", "]", "{", "}", "|", "^", "$", ".", "\\"] {
            let regex = Regex::new(&format!("^{}$", escape_regex(literal))).unwrap();
            assert!(regex.is_match(literal), "{literal}");
        }
    }

    #[test]
    fn class_of_distinct_characters() {
        assert_eq!(escape_class("/**/"), "\\/\\*");
        assert_eq!(escape_class("(**)"), "\\(\\*\\)");
    }

    #[test]
    fn multiline_comment_parts() {
        let parts = terminal_parts(r"\/\*[\s\S]*?\*\/");
        assert_eq!(parts.start, "/*");
        assert_eq!(parts.end, "*/");
        assert!(parts.is_delimited());
    }

    #[test]
    fn single_line_comment_parts() {
        let parts = terminal_parts(r"\/\/[^\n\r]*");
        assert_eq!(parts.start, "//");
        assert_eq!(parts.end, "");
        assert!(!parts.is_delimited());
    }

    #[test]
    fn quantified_literals_are_not_parts() {
        let parts = terminal_parts(r"ab+c.*d");
        assert_eq!(parts.start, "a");
        assert_eq!(parts.end, "d");

        let parts = terminal_parts(r"#{1,2}[^#]*#");
        assert_eq!(parts.start, "");
        assert_eq!(parts.end, "#");
    }

    #[test]
    fn alternation_has_no_parts() {
        assert_eq!(terminal_parts(r"\/\*.*\*\/|--.*"), TerminalParts::default());
        // nested alternation is fine
        let parts = terminal_parts(r"<!--(a|b)*-->");
        assert_eq!(parts.start, "<!--");
        assert_eq!(parts.end, "-->");
    }

    #[test]
    fn literal_pattern_is_all_start() {
        let parts = terminal_parts("abc");
        assert_eq!(parts.start, "abc");
        assert_eq!(parts.end, "");
    }

    #[test]
    fn blank_and_space_matching() {
        let ws = TerminalPattern::new(r"\s+").unwrap();
        assert!(ws.matches_space());
        assert!(!ws.matches_blank());

        let optional = TerminalPattern::new(r"[a-z]*").unwrap();
        assert!(optional.matches_blank());
        assert!(!optional.matches_space());

        let id = TerminalPattern::new(r"[a-z]+").unwrap();
        assert!(id.is_full_match("def"));
        assert!(!id.is_full_match("de f"));
        assert!(id.is_match("de f"));
    }
}
