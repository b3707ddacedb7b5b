use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building ciphers, alphabets and language profiles.
///
/// Cracking never fails: a contradicted candidate is dropped and degenerate
/// input simply produces no candidates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// `a` must be coprime with the alphabet size or the transform has no inverse.
    #[error("invalid affine key: a = {a} is not coprime with {n}")]
    InvalidKey { a: i64, n: i64 },

    #[error("invalid vigenere key: {0}")]
    InvalidVigenereKey(String),

    #[error("invalid known pair {0:?}, expected two symbols such as \"e:x\"")]
    InvalidKnownPair(String),

    #[error("symbol {0:?} is not in the alphabet")]
    SymbolNotInAlphabet(char),

    #[error("invalid language profile: {0}")]
    InvalidLanguage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
