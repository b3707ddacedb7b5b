//! Ciphertext-only and known-plaintext attacks on the affine and Vigenere
//! ciphers.
//!
//! Every attack takes its alphabet and letter statistics from a [`Language`],
//! keeps no state between calls and never fails: finding nothing is reported
//! as an empty result.

pub mod affine;
pub mod alphabet;
pub mod cipher;
pub mod error;
pub mod frequency;
pub mod language;
pub mod modular;
pub mod vigenere;

pub use affine::{AffineCandidate, AffineSolver, KnownPair};
pub use alphabet::Alphabet;
pub use cipher::{AffineCipher, AffineKey, Transform, VigenereCipher};
pub use error::{Error, Result};
pub use language::Language;
