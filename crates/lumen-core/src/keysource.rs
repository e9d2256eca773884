//! Key sources: BIP-39 mnemonics (plus optional passphrase) held in memory
//!
//! Key sources are never written to storage. They live in the
//! [`KeySourceStore`] until power-off and are identified on screen by a
//! short fingerprint so the mnemonic itself is never displayed after entry.

use std::fmt;

use bip39::{Language, Mnemonic};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::SUPPORTED_WORD_COUNTS;

/// A loaded mnemonic + passphrase pair
pub struct KeySource {
    mnemonic: Mnemonic,
    passphrase: Zeroizing<String>,
    seed: Zeroizing<[u8; 64]>,
    fingerprint: String,
}

impl KeySource {
    /// Build a key source from an already validated mnemonic
    pub fn new(mnemonic: Mnemonic, passphrase: impl Into<String>) -> Self {
        let passphrase = Zeroizing::new(passphrase.into());
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase.as_str()));
        let fingerprint = hex::encode(&Sha256::digest(&seed[..])[..4]);

        Self {
            mnemonic,
            passphrase,
            seed,
            fingerprint,
        }
    }

    /// Parse an English mnemonic phrase
    pub fn from_phrase(phrase: &str, passphrase: impl Into<String>) -> Result<Self> {
        let normalized = normalize_phrase(phrase);
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        if !SUPPORTED_WORD_COUNTS.contains(&mnemonic.word_count()) {
            return Err(Error::UnsupportedWordCount(mnemonic.word_count()));
        }
        Ok(Self::new(mnemonic, passphrase))
    }

    /// Short identifier shown in menus (first 4 bytes of SHA-256 of the seed)
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// BIP-39 seed derived from mnemonic and passphrase
    pub fn seed(&self) -> &[u8; 64] {
        &self.seed
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn has_passphrase(&self) -> bool {
        !self.passphrase.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySource")
            .field("fingerprint", &self.fingerprint)
            .field("word_count", &self.word_count())
            .field("has_passphrase", &self.has_passphrase())
            .finish_non_exhaustive()
    }
}

/// Key sources loaded since power-on
#[derive(Debug, Default)]
pub struct KeySourceStore {
    sources: Vec<KeySource>,
}

impl KeySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key source, returning its index
    ///
    /// Loading the same mnemonic and passphrase twice returns the index of the
    /// existing entry.
    pub fn add(&mut self, source: KeySource) -> usize {
        if let Some(index) = self.index_of(source.fingerprint()) {
            tracing::debug!(fingerprint = source.fingerprint(), "key source already loaded");
            return index;
        }
        tracing::info!(fingerprint = source.fingerprint(), "key source loaded");
        self.sources.push(source);
        self.sources.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&KeySource> {
        self.sources
            .get(index)
            .ok_or(Error::KeySourceNotFound(index))
    }

    pub fn index_of(&self, fingerprint: &str) -> Option<usize> {
        self.sources
            .iter()
            .position(|source| source.fingerprint() == fingerprint)
    }

    pub fn fingerprints(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|source| source.fingerprint().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeySource> {
        self.sources.iter()
    }
}

/// Mnemonic being entered word by word
#[derive(Clone, PartialEq, Eq)]
pub struct PendingMnemonic {
    words: Vec<Option<String>>,
    passphrase: Option<String>,
}

impl PendingMnemonic {
    pub fn new(word_count: usize) -> Result<Self> {
        if !SUPPORTED_WORD_COUNTS.contains(&word_count) {
            return Err(Error::UnsupportedWordCount(word_count));
        }
        Ok(Self {
            words: vec![None; word_count],
            passphrase: None,
        })
    }

    /// Start from a complete word list, e.g. decoded from a SeedQR
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut pending = Self::new(words.len())?;
        for (index, word) in words.iter().enumerate() {
            if !pending.set_word(index, word.as_ref())? {
                return Err(Error::InvalidMnemonic(format!(
                    "unknown word at position {}",
                    index + 1
                )));
            }
        }
        Ok(pending)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Store a word, returning `false` if it is not in the English wordlist
    pub fn set_word(&mut self, index: usize, word: &str) -> Result<bool> {
        let slot = self.words.get_mut(index).ok_or_else(|| {
            Error::InvalidMnemonic(format!("word index {} out of range", index))
        })?;
        match lookup_word(word) {
            Some(canonical) => {
                if let Some(old) = slot.as_mut() {
                    old.zeroize();
                }
                *slot = Some(canonical.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).and_then(|w| w.as_deref())
    }

    pub fn is_complete(&self) -> bool {
        self.words.iter().all(Option::is_some)
    }

    pub fn set_passphrase(&mut self, passphrase: impl Into<String>) {
        if let Some(old) = self.passphrase.as_mut() {
            old.zeroize();
        }
        self.passphrase = Some(passphrase.into());
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref()
    }

    /// Validate the checksum and build the key source
    pub fn to_key_source(&self) -> Result<KeySource> {
        if !self.is_complete() {
            return Err(Error::InvalidMnemonic("mnemonic is incomplete".to_string()));
        }
        let phrase = Zeroizing::new(
            self.words
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        );
        KeySource::from_phrase(&phrase, self.passphrase.clone().unwrap_or_default())
    }
}

impl fmt::Debug for PendingMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingMnemonic")
            .field("word_count", &self.words.len())
            .field("entered", &self.words.iter().filter(|w| w.is_some()).count())
            .field("has_passphrase", &self.passphrase.is_some())
            .finish()
    }
}

impl Drop for PendingMnemonic {
    fn drop(&mut self) {
        for word in self.words.iter_mut().flatten() {
            word.zeroize();
        }
        if let Some(passphrase) = self.passphrase.as_mut() {
            passphrase.zeroize();
        }
    }
}

/// Find a word in the English BIP-39 wordlist (case-insensitive)
pub fn lookup_word(word: &str) -> Option<&'static str> {
    let word = word.trim().to_ascii_lowercase();
    Language::English
        .word_list()
        .iter()
        .copied()
        .find(|candidate| *candidate == word)
}

/// Decode a standard SeedQR: four decimal digits per wordlist index
pub fn decode_seed_qr(digits: &str) -> Result<Vec<String>> {
    let digits = digits.trim();
    if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.len() % 4 != 0 {
        return Err(Error::InvalidMnemonic("malformed SeedQR".to_string()));
    }
    let word_count = digits.len() / 4;
    if !SUPPORTED_WORD_COUNTS.contains(&word_count) {
        return Err(Error::UnsupportedWordCount(word_count));
    }

    let wordlist = Language::English.word_list();
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let index: usize = std::str::from_utf8(chunk)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::InvalidMnemonic("malformed SeedQR".to_string()))?;
            wordlist
                .get(index)
                .map(|word| word.to_string())
                .ok_or_else(|| Error::InvalidMnemonic(format!("word index {} out of range", index)))
        })
        .collect()
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
