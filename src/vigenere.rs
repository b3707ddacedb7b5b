//! Vigenere key recovery: autocorrelation to guess the key length, then one
//! frequency fit per key position.

use log::{debug, warn};
use serde::Serialize;

use crate::alphabet::Alphabet;
use crate::frequency::relative_frequencies;
use crate::language::Language;

/// Symbols of ciphertext considered. More text barely improves the estimate.
pub const SAMPLE_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyLengthCandidate {
    pub length: usize,
    /// Positions `i` where `c[i] == c[i + length]`.
    pub matches: usize,
}

/// Alphabet positions of the first [`SAMPLE_LIMIT`] alphabet symbols, case folded.
pub fn prepare_ciphertext(text: &str, alphabet: &Alphabet) -> Vec<usize> {
    text.chars()
        .filter_map(|c| alphabet.index_of(alphabet.fold(c)))
        .take(SAMPLE_LIMIT)
        .collect()
}

fn coincidences(ciphertext: &[usize], offset: usize) -> usize {
    ciphertext
        .iter()
        .zip(ciphertext.iter().skip(offset))
        .filter(|(l, r)| l == r)
        .count()
}

/// Every length in `1..=max_length` tied for the most self-coincidences.
/// Lengths past the end of the ciphertext cannot coincide and are not tried.
///
/// Empty when nothing coincides at any offset.
pub fn key_lengths(ciphertext: &[usize], max_length: usize) -> Vec<KeyLengthCandidate> {
    let mut best = Vec::new();
    let mut best_matches = 0;

    for length in 1..=max_length.min(ciphertext.len()) {
        let matches = coincidences(ciphertext, length);
        debug!("Key length {:>3}: {} coincidences", length, matches);

        if matches > best_matches {
            best_matches = matches;
            best.clear();
        }
        if matches == best_matches && matches > 0 {
            best.push(KeyLengthCandidate { length, matches });
        }
    }

    best
}

pub fn estimate_key_lengths(text: &str, max_length: usize, alphabet: &Alphabet) -> Vec<KeyLengthCandidate> {
    key_lengths(&prepare_ciphertext(text, alphabet), max_length)
}

/// The shift recovered for one key position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnShift {
    Confident { shift: usize, score: f64 },
    /// No shift fits better than nothing, e.g. the column is empty.
    Undetermined,
}

impl ColumnShift {
    pub fn shift(&self) -> Option<usize> {
        match self {
            Self::Confident { shift, .. } => Some(*shift),
            Self::Undetermined => None,
        }
    }
}

/// Slides the reference frequencies over the column's frequencies and keeps the
/// shift with the largest dot product.
pub fn best_shift(column: &[usize], reference: &[f64]) -> ColumnShift {
    let n = reference.len();
    let observed = relative_frequencies(column, n);

    let mut best = ColumnShift::Undetermined;
    let mut best_score = 0.0;
    for shift in 0..n {
        let score: f64 = observed
            .iter()
            .enumerate()
            .map(|(j, w)| reference[(n - shift + j) % n] * w)
            .sum();

        if score > best_score {
            best_score = score;
            best = ColumnShift::Confident { shift, score };
        }
    }
    best
}

/// Symbols at `column`, `column + key_length`, ...
pub fn column(ciphertext: &[usize], column: usize, key_length: usize) -> Vec<usize> {
    ciphertext.iter().skip(column).step_by(key_length).copied().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveredKey {
    pub length: usize,
    pub columns: Vec<ColumnShift>,
}

impl RecoveredKey {
    /// The key, only if every position was determined.
    pub fn key(&self, alphabet: &Alphabet) -> Option<String> {
        self.columns
            .iter()
            .map(|c| c.shift().and_then(|s| alphabet.symbol(s)))
            .collect()
    }

    /// The key with `placeholder` standing in for undetermined positions.
    pub fn render(&self, alphabet: &Alphabet, placeholder: char) -> String {
        self.columns
            .iter()
            .map(|c| c.shift().and_then(|s| alphabet.symbol(s)).unwrap_or(placeholder))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.columns.iter().all(|c| c.shift().is_some())
    }
}

pub fn recover_key(ciphertext: &[usize], key_length: usize, language: &Language) -> RecoveredKey {
    let columns = if key_length == 0 {
        Vec::new()
    } else {
        (0..key_length)
            .map(|c| best_shift(&column(ciphertext, c, key_length), language.reference_frequencies()))
            .collect()
    };

    let recovered = RecoveredKey {
        length: key_length,
        columns,
    };
    if !recovered.is_complete() {
        warn!(
            "Could not determine every position of the length {} key",
            key_length
        );
    }
    recovered
}

/// Recovers the key for a known key length; `None` if a position stays undetermined.
pub fn crack_columns(text: &str, key_length: usize, language: &Language) -> Option<String> {
    let ciphertext = prepare_ciphertext(text, language.alphabet());
    if key_length == 0 {
        return None;
    }
    recover_key(&ciphertext, key_length, language).key(language.alphabet())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VigenereCandidate {
    pub length: usize,
    pub matches: usize,
    pub key: RecoveredKey,
}

/// Estimates the key length and recovers one key per best length.
pub fn crack(text: &str, max_length: usize, language: &Language) -> Vec<VigenereCandidate> {
    let ciphertext = prepare_ciphertext(text, language.alphabet());
    debug!("Cracking {} ciphertext symbols", ciphertext.len());

    key_lengths(&ciphertext, max_length)
        .into_iter()
        .map(|candidate| VigenereCandidate {
            length: candidate.length,
            matches: candidate.matches,
            key: recover_key(&ciphertext, candidate.length, language),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{Transform, VigenereCipher};
    use rstest::rstest;

    const ENGLISH: &str = include_str!("../tests/data/english.txt");

    fn encrypt(key: &str, text: &str) -> String {
        let alphabet = Alphabet::english();
        VigenereCipher::new(key, &alphabet).unwrap().encrypt(text)
    }

    #[test]
    fn sample_is_filtered_folded_and_capped() {
        let alphabet = Alphabet::english();
        assert_eq!(prepare_ciphertext("A b-C!", &alphabet), vec![0, 1, 2]);
        assert_eq!(prepare_ciphertext(ENGLISH, &alphabet).len(), SAMPLE_LIMIT);
    }

    #[test]
    fn counts_coincidences_at_offset() {
        // abcabc: every symbol repeats 3 later
        let text = [0, 1, 2, 0, 1, 2];
        assert_eq!(coincidences(&text, 3), 3);
        assert_eq!(coincidences(&text, 1), 0);
        assert_eq!(coincidences(&text, 10), 0);
    }

    #[test]
    fn reports_every_tied_length() {
        let text = [0, 0, 0, 0];
        let lengths: Vec<usize> = key_lengths(&text, 2).iter().map(|c| c.length).collect();
        assert_eq!(lengths, vec![1]);

        // offset 4 lines up as well, but over fewer positions
        let text = [0, 1, 0, 1, 0, 1, 0, 1];
        let found = key_lengths(&text, 4);
        assert_eq!(found, vec![KeyLengthCandidate { length: 2, matches: 6 }]);

        let text = [0, 0, 1, 0, 0];
        assert_eq!(
            key_lengths(&text, 3),
            vec![
                KeyLengthCandidate { length: 1, matches: 2 },
                KeyLengthCandidate { length: 3, matches: 2 },
            ]
        );
    }

    #[test]
    fn huge_max_length_stops_at_the_ciphertext() {
        let text = [0, 1, 0];
        assert_eq!(
            key_lengths(&text, usize::MAX),
            vec![KeyLengthCandidate { length: 2, matches: 1 }]
        );
    }

    #[rstest]
    #[case::empty(&[], 5)]
    #[case::single(&[4], 5)]
    #[case::no_repeats(&[0, 1, 2, 3], 3)]
    #[case::zero_max(&[0, 0, 0], 0)]
    fn degenerate_input_gives_no_lengths(#[case] text: &[usize], #[case] max_length: usize) {
        assert!(key_lengths(text, max_length).is_empty());
    }

    #[test]
    fn estimates_length_five() {
        let alphabet = Alphabet::english();
        let found = estimate_key_lengths(&encrypt("crypt", ENGLISH), 12, &alphabet);
        assert!(!found.is_empty());
        assert!(found.iter().all(|c| c.length % 5 == 0 || 5 % c.length == 0));
    }

    #[test]
    fn best_shift_of_an_empty_column_is_undetermined() {
        let language = Language::english();
        assert_eq!(best_shift(&[], language.reference_frequencies()), ColumnShift::Undetermined);
    }

    #[test]
    fn best_shift_recovers_single_letter_shift() {
        let language = Language::english();
        let alphabet = language.alphabet();
        // every letter of the sample moved along by 7 ('h')
        let column: Vec<usize> = alphabet
            .positions_of(ENGLISH)
            .into_iter()
            .map(|p| (p + 7) % 26)
            .collect();
        assert_eq!(best_shift(&column, language.reference_frequencies()).shift(), Some(7));
    }

    #[test]
    fn splits_columns() {
        let text = [0, 1, 2, 3, 4, 5, 6];
        assert_eq!(column(&text, 0, 3), vec![0, 3, 6]);
        assert_eq!(column(&text, 2, 3), vec![2, 5]);
        assert!(column(&text, 7, 8).is_empty());
    }

    #[rstest]
    #[case("crypt")]
    #[case("lemon")]
    #[case("secret")]
    fn cracks_columns_with_the_right_length(#[case] key: &str) {
        let language = Language::english();
        let cipher = encrypt(key, ENGLISH);
        assert_eq!(crack_columns(&cipher, key.len(), &language).as_deref(), Some(key));
    }

    #[test]
    fn key_longer_than_text_is_incomplete() {
        let language = Language::english();
        let ciphertext = prepare_ciphertext("abc", language.alphabet());
        let recovered = recover_key(&ciphertext, 5, &language);

        assert!(!recovered.is_complete());
        assert_eq!(recovered.key(language.alphabet()), None);
        assert_eq!(recovered.columns[3], ColumnShift::Undetermined);
        assert_eq!(recovered.render(language.alphabet(), '?').chars().skip(3).collect::<String>(), "??");
        assert_eq!(crack_columns("abc", 0, &language), None);
    }

    #[test]
    fn cracks_end_to_end() {
        let language = Language::english();
        let found = crack(&encrypt("crypt", ENGLISH), 12, &language);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].length, 5);
        assert_eq!(found[0].key.key(language.alphabet()).as_deref(), Some("crypt"));
    }

    #[test]
    fn cracking_without_ciphertext_finds_nothing() {
        let language = Language::english();
        assert!(crack("", 10, &language).is_empty());
        assert!(crack("1234", 10, &language).is_empty());
    }
}
