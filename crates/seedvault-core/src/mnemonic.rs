//! Recovery phrase validation.
//!
//! A [`SeedPhrase`] is a 12, 18 or 24 word mnemonic whose every word is in a
//! [`WordSet`]. Checksums are not verified: the set membership test is the
//! whole contract, so phrases from lists other than BIP39 English work too.

use std::collections::BTreeSet;
use std::fmt;
use std::io::BufRead;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SeedVaultError};

/// Word counts a recovery phrase may have.
pub const VALID_WORD_COUNTS: [usize; 3] = [12, 18, 24];

/// A set of valid mnemonic words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: BTreeSet<String>,
}

impl WordSet {
    /// The embedded BIP39 English list (2048 words).
    pub fn english() -> Self {
        let words = bip39::Language::English
            .wordlist()
            .get_words_by_prefix("")
            .iter()
            .map(|word| word.to_string())
            .collect();
        Self { words }
    }

    /// Build a set from arbitrary words. Words are trimmed and lower-cased;
    /// blank entries are skipped.
    pub fn from_words<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        if words.is_empty() {
            return Err(SeedVaultError::Validation(
                "Word list is empty".to_string(),
            ));
        }
        Ok(Self { words })
    }

    /// Read a newline-separated word list.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Self::from_words(lines)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Up to `limit` words starting with `prefix`, in sorted order.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.words
            .range(prefix.clone()..)
            .take_while(|word| word.starts_with(&prefix))
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}

impl Default for WordSet {
    fn default() -> Self {
        Self::english()
    }
}

/// A validated, normalized recovery phrase.
///
/// The text is zeroed on drop and never shown by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SeedPhrase {
    phrase: String,
}

impl SeedPhrase {
    /// Parse and validate user input against `words`.
    ///
    /// Input is split on any whitespace and lower-cased. Errors name the
    /// 1-based positions of unknown words but never the words themselves.
    pub fn parse(input: &str, words: &WordSet) -> Result<Self> {
        let lowered = zeroize::Zeroizing::new(input.to_lowercase());
        let parts: Vec<&str> = lowered.split_whitespace().collect();

        if parts.is_empty() {
            return Err(SeedVaultError::Validation(
                "Seed phrase cannot be empty".to_string(),
            ));
        }

        if !VALID_WORD_COUNTS.contains(&parts.len()) {
            return Err(SeedVaultError::Validation(format!(
                "Seed phrase must have 12, 18 or 24 words (got {})",
                parts.len()
            )));
        }

        let unknown: Vec<String> = parts
            .iter()
            .enumerate()
            .filter(|(_, word)| !words.contains(word))
            .map(|(index, _)| (index + 1).to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(SeedVaultError::Validation(format!(
                "Unknown word at position(s) {}",
                unknown.join(", ")
            )));
        }

        Ok(Self {
            phrase: parts.join(" "),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedPhrase")
            .field("words", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}
