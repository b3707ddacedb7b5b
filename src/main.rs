use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cipherbreak::affine::{AffineSolver, KnownPair};
use cipherbreak::frequency::FrequencyCounter;
use cipherbreak::language::default_language_path;
use cipherbreak::{vigenere, AffineCipher, AffineKey, Language, Transform, VigenereCipher};

mod report;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Language profile to use instead of ~/.cipherbreak/language.json
    #[arg(short, long, global = true)]
    language: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Affine cipher, c = a*m + b
    Affine {
        #[command(subcommand)]
        action: AffineAction,
    },
    /// Vigenere cipher with a repeating key
    Vigenere {
        #[command(subcommand)]
        action: VigenereAction,
    },
    /// Count how often every character occurs in the given files
    Frequency {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Manage the language profile
    Language {
        #[command(subcommand)]
        action: LanguageAction,
    },
}

#[derive(Subcommand, Debug)]
enum AffineAction {
    Encrypt {
        #[arg(short, allow_negative_numbers = true)]
        a: i64,
        #[arg(short, allow_negative_numbers = true)]
        b: i64,
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
    Decrypt {
        #[arg(short, allow_negative_numbers = true)]
        a: i64,
        #[arg(short, allow_negative_numbers = true)]
        b: i64,
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
    /// Try every key on the first line of input
    CrackAll {
        #[command(flatten)]
        crack: AffineCrack,
    },
    /// Solve for the key from known pairs and letter frequencies
    CrackLinear {
        #[command(flatten)]
        crack: AffineCrack,
    },
}

#[derive(ClapArgs, Debug)]
struct AffineCrack {
    /// Plain symbol known to encrypt to a cipher symbol, as "m:c". Repeatable
    #[arg(short = 'k', long = "known")]
    known: Vec<KnownPair>,

    #[arg(long)]
    json: bool,

    #[command(flatten)]
    input: Input,

    #[command(flatten)]
    output: Output,
}

#[derive(Subcommand, Debug)]
enum VigenereAction {
    Encrypt {
        #[arg(short, long)]
        key: String,
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
    Decrypt {
        #[arg(short, long)]
        key: String,
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
    /// Guess the key length and recover a key for each best guess
    Crack {
        /// Longest key length to test
        #[arg(short, long)]
        max_length: usize,
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
}

#[derive(Subcommand, Debug)]
enum LanguageAction {
    /// Write the English profile so it can be edited
    Init {
        /// Where to write it, defaults to ~/.cipherbreak/language.json
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Print the profile in use
    Show,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// Text to process
    #[arg(short = 't', long)]
    text: Option<String>,

    /// File to read the text from
    #[arg(short = 'i', long = "input")]
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Unable to open input file {}", path.display())),
            (None, None) => bail!("Choose exactly one input, --text or --input"),
        }
    }
}

#[derive(ClapArgs, Debug)]
struct Output {
    /// File to write to instead of the terminal
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Output {
    fn write(&self, content: &str) -> Result<()> {
        match &self.output {
            Some(path) => fs::write(path, content)
                .with_context(|| format!("Unable to open output file {}", path.display())),
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                Ok(())
            }
        }
    }
}

fn load_language(path: Option<&Path>) -> Result<Language> {
    match path {
        Some(path) => Language::load(path)
            .with_context(|| format!("Failed to load language profile {}", path.display())),
        None => Language::load_default().context("Failed to load the default language profile"),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}

/// The first line is the ciphertext, the rest only feeds the frequency count.
fn split_first_line(text: &str) -> (&str, &str) {
    match text.split_once('\n') {
        Some((line, rest)) => (line.trim_end_matches('\r'), rest),
        None => (text, ""),
    }
}

fn run_affine(action: AffineAction, language: &Language) -> Result<()> {
    let n = language.alphabet().modulus();
    match action {
        AffineAction::Encrypt { a, b, input, output } => {
            let key = AffineKey::new(a, b, n).context("Invalid key")?;
            let cipher = AffineCipher::new(key, language.alphabet())?;
            output.write(&cipher.encrypt(&input.read()?))
        }
        AffineAction::Decrypt { a, b, input, output } => {
            let key = AffineKey::new(a, b, n).context("Invalid key")?;
            let cipher = AffineCipher::new(key, language.alphabet())?;
            output.write(&cipher.decrypt(&input.read()?))
        }
        AffineAction::CrackAll { crack } => {
            let text = crack.input.read()?;
            let (line, _) = split_first_line(&text);
            let found = AffineSolver::new(language).crack_all(line, &crack.known);
            debug!("{} candidate keys", found.len());
            let rendered = if crack.json { to_json(&found)? } else { report::affine_table(line, &found) };
            crack.output.write(&rendered)
        }
        AffineAction::CrackLinear { crack } => {
            let text = crack.input.read()?;
            let (line, rest) = split_first_line(&text);
            let found = AffineSolver::new(language).crack_linear(line, rest, &crack.known);
            debug!("{} candidate keys", found.len());
            let rendered = if crack.json { to_json(&found)? } else { report::affine_table(line, &found) };
            crack.output.write(&rendered)
        }
    }
}

fn run_vigenere(action: VigenereAction, language: &Language) -> Result<()> {
    match action {
        VigenereAction::Encrypt { key, input, output } => {
            let cipher = VigenereCipher::new(&key, language.alphabet()).context("Invalid key")?;
            output.write(&cipher.encrypt(&input.read()?))
        }
        VigenereAction::Decrypt { key, input, output } => {
            let cipher = VigenereCipher::new(&key, language.alphabet()).context("Invalid key")?;
            output.write(&cipher.decrypt(&input.read()?))
        }
        VigenereAction::Crack { max_length, json, input, output } => {
            if max_length == 0 {
                bail!("Specify a maximum key length of at least 1");
            }
            let found = vigenere::crack(&input.read()?, max_length, language);
            let rendered = if json {
                to_json(&found)?
            } else {
                report::vigenere_keys(&found, language.alphabet())
            };
            output.write(&rendered)
        }
    }
}

fn run_frequency(files: &[PathBuf]) -> Result<()> {
    let mut counter = FrequencyCounter::new(true);
    let mut processed = 0;

    for path in files {
        match fs::File::open(path) {
            Ok(file) => {
                println!("Processing {}...", path.display());
                counter
                    .count_reader(io::BufReader::new(file))
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                processed += 1;
            }
            Err(e) => {
                warn!("Unable to process {}: {}", path.display(), e);
                eprintln!("Unable to process {}", path.display());
            }
        }
    }

    if processed == 0 {
        bail!("None of the input files could be read");
    }

    println!();
    print!("{}", report::frequency_table(&counter.report()));
    Ok(())
}

fn run_language(action: LanguageAction, language_path: Option<&Path>) -> Result<()> {
    match action {
        LanguageAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => default_language_path().context("Could not find home directory")?,
            };
            if path.exists() && !force {
                bail!("{} already exists, pass --force to overwrite it", path.display());
            }
            Language::english()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote English profile to {}", path.display());
            Ok(())
        }
        LanguageAction::Show => {
            let language = load_language(language_path)?;
            println!("{}", to_json(&language.to_config())?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let language_path = args.language.as_deref();

    match args.command {
        Command::Affine { action } => run_affine(action, &load_language(language_path)?),
        Command::Vigenere { action } => run_vigenere(action, &load_language(language_path)?),
        Command::Frequency { files } => run_frequency(&files),
        Command::Language { action } => run_language(action, language_path),
    }
}
