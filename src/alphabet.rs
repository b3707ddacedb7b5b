use std::collections::HashMap;

use crate::error::{Error, Result};

pub const ENGLISH_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// An ordered set of distinct symbols. The position of a symbol is its value
/// mod `len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    positions: HashMap<char, usize>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(Error::InvalidAlphabet(format!(
                "need at least 2 symbols, got {}",
                symbols.len()
            )));
        }

        let mut positions = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if positions.insert(c, i).is_some() {
                return Err(Error::InvalidAlphabet(format!("duplicate symbol {:?}", c)));
            }
        }

        Ok(Self { symbols, positions })
    }

    pub fn english() -> Self {
        Self {
            symbols: ENGLISH_LOWERCASE.chars().collect(),
            positions: ENGLISH_LOWERCASE.chars().enumerate().map(|(i, c)| (c, i)).collect(),
        }
    }

    /// The modulus every cipher over this alphabet works in.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn modulus(&self) -> i64 {
        self.symbols.len() as i64
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.positions.contains_key(&c)
    }

    pub fn index_of(&self, c: char) -> Option<usize> {
        self.positions.get(&c).copied()
    }

    /// Upper-case ASCII folds to lower case when the lower-case form is part of
    /// the alphabet. Everything else is returned unchanged.
    pub fn fold(&self, c: char) -> char {
        if c.is_ascii_uppercase() && !self.contains(c) {
            let lower = c.to_ascii_lowercase();
            if self.contains(lower) {
                return lower;
            }
        }
        c
    }

    /// Case folds the whole text, leaving symbols outside the alphabet as they are.
    pub fn normalize(&self, text: &str) -> String {
        text.chars().map(|c| self.fold(c)).collect()
    }

    /// Folds the text and keeps only alphabet positions, dropping everything else.
    pub fn positions_of(&self, text: &str) -> Vec<usize> {
        text.chars().filter_map(|c| self.index_of(self.fold(c))).collect()
    }

    /// Smallest and largest symbol, used as the default frequency counting range.
    pub fn symbol_range(&self) -> (char, char) {
        let min = self.symbols.iter().copied().min().unwrap_or('\0');
        let max = self.symbols.iter().copied().max().unwrap_or('\0');
        (min, max)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("")]
    #[case::single("a")]
    fn rejects_alphabets_shorter_than_two(#[case] symbols: &str) {
        assert!(matches!(Alphabet::new(symbols), Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        assert!(matches!(Alphabet::new("abca"), Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn english_matches_explicit_construction() {
        assert_eq!(Alphabet::english(), Alphabet::new(ENGLISH_LOWERCASE).unwrap());
        assert_eq!(Alphabet::english().modulus(), 26);
    }

    #[rstest]
    #[case('A', 'a')]
    #[case('z', 'z')]
    #[case('!', '!')]
    #[case('7', '7')]
    fn folds_uppercase_only_into_the_alphabet(#[case] input: char, #[case] expected: char) {
        assert_eq!(Alphabet::english().fold(input), expected);
    }

    #[test]
    fn keeps_uppercase_when_alphabet_has_it() {
        let alphabet = Alphabet::new("ABCabc").unwrap();
        assert_eq!(alphabet.fold('A'), 'A');
        assert_eq!(alphabet.index_of('A'), Some(0));
    }

    #[test]
    fn positions_drop_foreign_symbols() {
        let alphabet = Alphabet::english();
        assert_eq!(alphabet.positions_of("Ab, c!"), vec![0, 1, 2]);
        assert_eq!(alphabet.normalize("Hello, World"), "hello, world");
    }
}
