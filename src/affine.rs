//! Attacks on the affine cipher.
//!
//! Candidates are checked against caller supplied [`KnownPair`]s: the first
//! occurrence of each known plain symbol in the decryption must line up with
//! the known cipher symbol. A single mismatch discards the key, two matches
//! are taken as proof that the key is right and end the search. This is a
//! heuristic tuned for finding the key quickly, not a proof of correctness.

use std::collections::HashSet;
use std::str::FromStr;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::cipher::{AffineCipher, AffineKey, Transform};
use crate::error::Error;
use crate::frequency::FrequencyCounter;
use crate::language::Language;
use crate::modular::{gcd, solve_linear_congruence, units};

/// Matches after which a key is treated as certain.
pub const CERTAIN_MATCHES: usize = 2;

/// A plain symbol the caller believes encrypts to `cipher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KnownPair {
    pub plain: char,
    pub cipher: char,
}

impl KnownPair {
    pub fn new(plain: char, cipher: char) -> Self {
        Self { plain, cipher }
    }
}

impl FromStr for KnownPair {
    type Err = Error;

    /// Accepts `"ex"` or `"e:x"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().collect();
        match symbols.as_slice() {
            [plain, cipher] | [plain, ':', cipher] => Ok(Self::new(*plain, *cipher)),
            _ => Err(Error::InvalidKnownPair(s.to_string())),
        }
    }
}

/// Which search produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BruteForce,
    KnownPairs,
    FrequencyWithKnowns,
    FrequencyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Contradicted,
    Consistent(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffineCandidate {
    #[serde(flatten)]
    pub key: AffineKey,
    pub plaintext: String,
    /// `None` when the key came straight from the known pairs and was not scored.
    pub matches: Option<usize>,
    pub stage: Stage,
}

impl AffineCandidate {
    pub fn a(&self) -> i64 {
        self.key.a()
    }

    pub fn b(&self) -> i64 {
        self.key.b()
    }

    pub fn is_certain(&self) -> bool {
        self.matches.is_some_and(|m| m >= CERTAIN_MATCHES)
    }
}

/// Checks the known pairs against a decryption of `ciphertext`. Both slices are
/// case folded and line up symbol for symbol.
pub fn score_known_pairs(plaintext: &[char], ciphertext: &[char], known: &[KnownPair]) -> Score {
    let mut matches = 0;
    for pair in known {
        let Some(i) = plaintext.iter().position(|&c| c == pair.plain) else {
            continue;
        };
        if ciphertext.get(i) != Some(&pair.cipher) {
            return Score::Contradicted;
        }
        matches += 1;
        if matches == CERTAIN_MATCHES {
            break;
        }
    }
    Score::Consistent(matches)
}

/// Solves `a·x1 + b ≡ y1`, `a·x2 + b ≡ y2 (mod n)` for a usable key.
///
/// Returns `None` unless exactly one solution has `a` coprime with `n`. When
/// `x2 - x1` is invertible there is only one solution to begin with.
pub fn linsolve(p1: (i64, i64), p2: (i64, i64), n: i64) -> Option<AffineKey> {
    let ((x1, y1), (x2, y2)) = (p1, p2);
    let mut usable = solve_linear_congruence(x2 - x1, y2 - y1, n)
        .into_iter()
        .filter(|&a| gcd(a, n) == 1);

    let a = usable.next()?;
    if usable.next().is_some() {
        return None;
    }
    AffineKey::new(a, y1 - x1 * a, n).ok()
}

/// Every unordered pair of `items`, in index order.
fn pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, &first)| items[i + 1..].iter().map(move |&second| (first, second)))
}

/// Keeps every candidate up to and including the first certain one.
fn collect_until_certain(candidates: impl Iterator<Item = AffineCandidate>) -> Vec<AffineCandidate> {
    let mut found = Vec::new();
    for candidate in candidates {
        let certain = candidate.is_certain();
        found.push(candidate);
        if certain {
            break;
        }
    }
    found
}

pub struct AffineSolver<'a> {
    language: &'a Language,
}

impl<'a> AffineSolver<'a> {
    pub fn new(language: &'a Language) -> Self {
        Self { language }
    }

    fn modulus(&self) -> i64 {
        self.language.alphabet().modulus()
    }

    fn fold_pairs(&self, known: &[KnownPair]) -> Vec<KnownPair> {
        let alphabet = self.language.alphabet();
        known
            .iter()
            .map(|p| KnownPair::new(alphabet.fold(p.plain), alphabet.fold(p.cipher)))
            .collect()
    }

    fn decrypt(&self, key: AffineKey, ciphertext: &[char]) -> Option<String> {
        let text: String = ciphertext.iter().collect();
        let cipher = AffineCipher::new(key, self.language.alphabet()).ok()?;
        Some(cipher.decrypt(&text))
    }

    /// Decrypts and scores, dropping contradicted keys.
    fn evaluate(
        &self,
        ciphertext: &[char],
        key: AffineKey,
        known: &[KnownPair],
        stage: Stage,
    ) -> Option<AffineCandidate> {
        let plaintext = self.decrypt(key, ciphertext)?;
        let symbols: Vec<char> = plaintext.chars().collect();

        match score_known_pairs(&symbols, ciphertext, known) {
            Score::Contradicted => {
                trace!("a = {}, b = {} contradicts a known pair", key.a(), key.b());
                None
            }
            Score::Consistent(matches) => {
                trace!("a = {}, b = {} matches {} known pairs", key.a(), key.b(), matches);
                Some(AffineCandidate {
                    key,
                    plaintext,
                    matches: Some(matches),
                    stage,
                })
            }
        }
    }

    /// Tries every valid key, emitting each one the known pairs do not
    /// contradict. Stops right after the first certain key.
    pub fn crack_all(&self, ciphertext: &str, known: &[KnownPair]) -> Vec<AffineCandidate> {
        let n = self.modulus();
        let alphabet = self.language.alphabet();
        let line: Vec<char> = alphabet.normalize(ciphertext).chars().collect();
        if !line.iter().any(|&c| alphabet.contains(c)) {
            debug!("No alphabet symbols in the ciphertext, nothing to brute force");
            return Vec::new();
        }
        let known = self.fold_pairs(known);

        let keys = units(n)
            .flat_map(move |a| (0..n).map(move |b| (a, b)))
            .filter_map(|(a, b)| AffineKey::new(a, b, n).ok());

        let found = collect_until_certain(
            keys.filter_map(|key| self.evaluate(&line, key, &known, Stage::BruteForce)),
        );
        debug!("Brute force kept {} candidates", found.len());
        found
    }

    /// Solves for the key from pairs of plain/cipher positions instead of
    /// trying them all.
    ///
    /// Pairs of known pairs are tried first and the first solution is returned
    /// as is. Failing that, the symbols of `ciphertext` and `frequency_context`
    /// are ranked by frequency and matched with the language's expected order,
    /// first in combination with each known pair and then on their own. Those
    /// keys are scored like [`Self::crack_all`]. No key is tried twice.
    pub fn crack_linear(
        &self,
        ciphertext: &str,
        frequency_context: &str,
        known: &[KnownPair],
    ) -> Vec<AffineCandidate> {
        let n = self.modulus();
        let alphabet = self.language.alphabet();
        let line: Vec<char> = alphabet.normalize(ciphertext).chars().collect();
        let known = self.fold_pairs(known);

        let positions: Vec<(i64, i64)> = known
            .iter()
            .filter_map(|p| match (alphabet.index_of(p.plain), alphabet.index_of(p.cipher)) {
                (Some(x), Some(y)) => Some((x as i64, y as i64)),
                _ => {
                    warn!("Ignoring known pair {:?} -> {:?} outside the alphabet", p.plain, p.cipher);
                    None
                }
            })
            .collect();

        let mut tried = HashSet::new();

        let from_known = pairs(&positions)
            .filter_map(|(p1, p2)| linsolve(p1, p2, n))
            .find(|key| tried.insert(*key));
        if let Some(key) = from_known {
            debug!("Known pairs solve to a = {}, b = {}", key.a(), key.b());
            return self
                .decrypt(key, &line)
                .map(|plaintext| AffineCandidate {
                    key,
                    plaintext,
                    matches: None,
                    stage: Stage::KnownPairs,
                })
                .into_iter()
                .collect();
        }

        let mut counter = FrequencyCounter::for_alphabet(alphabet, true);
        counter.count_text(ciphertext);
        counter.count_text(frequency_context);
        let assumed: Vec<(i64, i64)> = self
            .language
            .frequency_order()
            .iter()
            .zip(counter.ranked_positions(alphabet))
            .map(|(&plain, cipher)| (plain as i64, cipher as i64))
            .collect();
        debug!("Known pairs are not enough, assuming {} frequency pairs", assumed.len());

        let with_known = assumed.iter().flat_map(|&guess| {
            positions
                .iter()
                .filter(move |&&(x, y)| guess.0 != x && guess.1 != y)
                .map(move |&pair| (Stage::FrequencyWithKnowns, pair, guess))
        });
        let frequency_only = pairs(&assumed).map(|(first, second)| (Stage::FrequencyOnly, first, second));

        let candidates = with_known
            .chain(frequency_only)
            .filter_map(|(stage, p1, p2)| linsolve(p1, p2, n).map(|key| (stage, key)))
            .filter(|(_, key)| tried.insert(*key))
            .filter_map(|(stage, key)| self.evaluate(&line, key, &known, stage));

        let found = collect_until_certain(candidates);
        debug!("Linear solver kept {} candidates", found.len());
        found
    }
}
