//! Ordering for keyword and operator lists.
//!
//! Editors present these lists sorted the way the root locale collates them, where punctuation
//! sorts before symbols, symbols before digits and digits before letters, with letter case only
//! breaking ties. That is not code point order: `,` sorts before `+`.

use std::cmp::Ordering;

/// ASCII punctuation and symbols in root collation order, whitespace and letters excluded.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

const WHITESPACE_WEIGHT: u32 = 0;
const PUNCTUATION_BASE: u32 = 16;
const DIGIT_BASE: u32 = 64;
const LETTER_BASE: u32 = 80;
const OTHER_BASE: u32 = 128;

fn primary(c: char) -> u32 {
    if c.is_whitespace() {
        return WHITESPACE_WEIGHT;
    }
    if let Some(index) = PUNCTUATION.find(c) {
        return PUNCTUATION_BASE + index as u32;
    }
    if let Some(digit) = c.to_digit(10) {
        return DIGIT_BASE + digit;
    }
    if c.is_ascii_alphabetic() {
        return LETTER_BASE + (c.to_ascii_lowercase() as u32 - 'a' as u32);
    }
    OTHER_BASE + c as u32
}

/// Lowercase before uppercase.
fn tertiary(c: char) -> u32 {
    u32::from(c.is_uppercase())
}

pub fn compare(a: &str, b: &str) -> Ordering {
    let primaries = |s: &str| s.chars().map(primary).collect::<Vec<_>>();
    let tertiaries = |s: &str| s.chars().map(tertiary).collect::<Vec<_>>();

    primaries(a)
        .cmp(&primaries(b))
        .then_with(|| tertiaries(a).cmp(&tertiaries(b)))
        .then_with(|| a.cmp(b))
}

pub fn sort(items: &mut [String]) {
    items.sort_by(|a, b| compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut items = items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        sort(&mut items);
        items
    }

    #[test]
    fn punctuation_before_symbols() {
        assert_eq!(sorted(&["+", ","]), [",", "+"]);
        assert_eq!(sorted(&["=", "(", ")", ";"]), [";", "(", ")", "="]);
    }

    #[test]
    fn case_only_breaks_ties() {
        assert_eq!(sorted(&["b", "B", "a", "Ab"]), ["a", "Ab", "b", "B"]);
    }

    #[test]
    fn prefixes_first() {
        assert_eq!(sorted(&["==", "=", "=>"]), ["=", "==", "=>"]);
        assert_eq!(sorted(&["ifx", "if", "i"]), ["i", "if", "ifx"]);
    }
}
