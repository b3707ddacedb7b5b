//! Affine and Vigenere transforms over an arbitrary alphabet.
//! Symbols outside the alphabet are copied through; upper-case ASCII is folded first.

use serde::Serialize;

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use crate::modular::{gcd, inverse_mod, modulo};

pub trait Transform {
    fn encrypt(&self, text: &str) -> String;
    fn decrypt(&self, text: &str) -> String;
}

/// `c = a·m + b (mod n)`. Only constructible with `gcd(a, n) = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AffineKey {
    a: i64,
    b: i64,
}

impl AffineKey {
    pub fn new(a: i64, b: i64, n: i64) -> Result<Self> {
        let a = modulo(a, n);
        if gcd(a, n) != 1 {
            return Err(Error::InvalidKey { a, n });
        }
        Ok(Self { a, b: modulo(b, n) })
    }

    pub fn a(&self) -> i64 {
        self.a
    }

    pub fn b(&self) -> i64 {
        self.b
    }
}

pub struct AffineCipher<'a> {
    key: AffineKey,
    a_inv: i64,
    alphabet: &'a Alphabet,
}

impl<'a> AffineCipher<'a> {
    pub fn new(key: AffineKey, alphabet: &'a Alphabet) -> Result<Self> {
        let n = alphabet.modulus();
        // the key may have been built for another modulus
        let a_inv = inverse_mod(key.a, n).ok_or(Error::InvalidKey { a: key.a, n })?;
        Ok(Self { key, a_inv, alphabet })
    }

    pub fn key(&self) -> AffineKey {
        self.key
    }

    fn map(&self, text: &str, f: impl Fn(i64) -> i64) -> String {
        let n = self.alphabet.modulus();
        text.chars()
            .map(|c| {
                let c = self.alphabet.fold(c);
                match self.alphabet.index_of(c) {
                    Some(m) => self.alphabet.symbols()[modulo(f(m as i64), n) as usize],
                    None => c,
                }
            })
            .collect()
    }
}

impl Transform for AffineCipher<'_> {
    fn encrypt(&self, text: &str) -> String {
        self.map(text, |m| self.key.a * m + self.key.b)
    }

    fn decrypt(&self, text: &str) -> String {
        self.map(text, |c| self.a_inv * (c - self.key.b))
    }
}

/// Repeating-key shift cipher. The key position only advances on alphabet symbols.
pub struct VigenereCipher<'a> {
    shifts: Vec<usize>,
    alphabet: &'a Alphabet,
}

impl<'a> VigenereCipher<'a> {
    pub fn new(key: &str, alphabet: &'a Alphabet) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidVigenereKey("key is empty".to_string()));
        }

        let shifts = key
            .chars()
            .map(|c| {
                let c = alphabet.fold(c);
                alphabet.index_of(c).ok_or_else(|| {
                    Error::InvalidVigenereKey(format!("{:?} is not in the alphabet", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { shifts, alphabet })
    }

    pub fn key(&self) -> String {
        self.shifts.iter().map(|&s| self.alphabet.symbols()[s]).collect()
    }

    fn map(&self, text: &str, forward: bool) -> String {
        let n = self.alphabet.len();
        let mut pos = 0;
        text.chars()
            .map(|c| {
                let c = self.alphabet.fold(c);
                match self.alphabet.index_of(c) {
                    Some(m) => {
                        let shift = self.shifts[pos % self.shifts.len()];
                        pos += 1;
                        let out = if forward { (m + shift) % n } else { (m + n - shift) % n };
                        self.alphabet.symbols()[out]
                    }
                    None => c,
                }
            })
            .collect()
    }
}

impl Transform for VigenereCipher<'_> {
    fn encrypt(&self, text: &str) -> String {
        self.map(text, true)
    }

    fn decrypt(&self, text: &str) -> String {
        self.map(text, false)
    }
}
