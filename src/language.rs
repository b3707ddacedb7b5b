use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

/// Relative letter frequencies of English text, `a` through `z`.
pub const ENGLISH_FREQUENCIES: [f64; 26] = [
    0.082, 0.015, 0.028, 0.043, 0.127, 0.022, 0.020, 0.061, 0.070, 0.002, 0.008, 0.040, 0.024,
    0.067, 0.075, 0.019, 0.001, 0.060, 0.063, 0.091, 0.028, 0.010, 0.023, 0.001, 0.020, 0.001,
];

/// English letters from most to least frequent.
pub const ENGLISH_FREQUENCY_ORDER: &str = "etaoinsrhdlucmfywgpbvkxqjz";

/// On-disk form of a [`Language`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguageConfig {
    pub alphabet: String,
    pub frequencies: Vec<f64>,
    pub frequency_order: String,
}

/// Statistics of the plaintext language every attack scores against.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    alphabet: Alphabet,
    reference_frequencies: Vec<f64>,
    frequency_order: Vec<usize>,
}

impl Language {
    pub fn english() -> Self {
        let alphabet = Alphabet::english();
        let frequency_order = alphabet.positions_of(ENGLISH_FREQUENCY_ORDER);
        Self {
            alphabet,
            reference_frequencies: ENGLISH_FREQUENCIES.to_vec(),
            frequency_order,
        }
    }

    pub fn from_config(config: &LanguageConfig) -> Result<Self> {
        let alphabet = Alphabet::new(&config.alphabet)?;

        if config.frequencies.len() != alphabet.len() {
            return Err(Error::InvalidLanguage(format!(
                "{} frequencies for an alphabet of {} symbols",
                config.frequencies.len(),
                alphabet.len()
            )));
        }
        if let Some(f) = config.frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(Error::InvalidLanguage(format!("frequency {} is out of range", f)));
        }

        let mut frequency_order = Vec::with_capacity(alphabet.len());
        for c in config.frequency_order.chars() {
            let index = alphabet.index_of(c).ok_or(Error::SymbolNotInAlphabet(c))?;
            if frequency_order.contains(&index) {
                return Err(Error::InvalidLanguage(format!(
                    "{:?} appears twice in the frequency order",
                    c
                )));
            }
            frequency_order.push(index);
        }

        Ok(Self {
            alphabet,
            reference_frequencies: config.frequencies.clone(),
            frequency_order,
        })
    }

    pub fn to_config(&self) -> LanguageConfig {
        LanguageConfig {
            alphabet: self.alphabet.symbols().iter().collect(),
            frequencies: self.reference_frequencies.clone(),
            frequency_order: self
                .frequency_order
                .iter()
                .map(|&i| self.alphabet.symbols()[i])
                .collect(),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Indexed by alphabet position.
    pub fn reference_frequencies(&self) -> &[f64] {
        &self.reference_frequencies
    }

    /// Alphabet positions, most frequent plaintext symbol first.
    pub fn frequency_order(&self) -> &[usize] {
        &self.frequency_order
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: LanguageConfig = serde_json::from_str(&content)?;
        Self::from_config(&config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.to_config())?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Loads the profile saved at [`default_language_path`], or English when none exists.
    pub fn load_default() -> Result<Self> {
        match default_language_path() {
            Some(path) if path.exists() => {
                debug!("Loading language profile from {}", path.display());
                Self::load(&path)
            }
            _ => {
                debug!("No language profile found, using English");
                Ok(Self::english())
            }
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

/// `~/.cipherbreak/language.json`, if a home directory can be found.
pub fn default_language_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".cipherbreak");
    path.push("language.json");
    Some(path)
}
