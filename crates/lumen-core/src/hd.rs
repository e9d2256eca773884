//! Derivation-path parsing and SLIP-10 Ed25519 key derivation
//!
//! Stellar accounts live at `m/44'/148'/N'` with every component hardened,
//! as described in SEP-0005. Ed25519 only supports hardened derivation, so
//! this module implements the hardened-only subset of SLIP-10.

use std::fmt;
use std::sync::OnceLock;

use hmac::{Hmac, Mac};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::STELLAR_COIN_TYPE;

/// Hardened derivation offset (2^31)
pub const HARDENED: u32 = 0x8000_0000;

/// SLIP-10 master key HMAC key for the ed25519 curve
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

type HmacSha512 = Hmac<Sha512>;

fn account_path_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"m/44'/([0-9]+)'/([0-9]+)'").expect("derivation path pattern is valid")
    })
}

/// Extract the account index `N` from a path of the form `m/44'/<coin>'/N'`
///
/// The pattern is searched for anywhere in the input. The coin-type segment
/// must be numeric but its value is not checked against [`STELLAR_COIN_TYPE`].
pub fn parse_account_index(derivation_path: &str) -> Result<u32> {
    let captures = account_path_regex()
        .captures(derivation_path)
        .ok_or_else(|| Error::InvalidDerivationPath(derivation_path.to_string()))?;

    if let Some(coin) = captures.get(1) {
        if coin.as_str().parse::<u32>().ok() != Some(STELLAR_COIN_TYPE) {
            tracing::debug!(
                coin_type = coin.as_str(),
                "derivation path uses a non-Stellar coin type"
            );
        }
    }

    captures
        .get(2)
        .and_then(|account| account.as_str().parse::<u32>().ok())
        .filter(|account| account & HARDENED == 0)
        .ok_or_else(|| Error::InvalidDerivationPath(derivation_path.to_string()))
}

/// Stellar account path `m/44'/148'/account'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StellarPath {
    pub account: u32,
}

impl StellarPath {
    pub fn new(account: u32) -> Self {
        Self { account }
    }

    /// Parse a requested path, keeping only the account index
    pub fn parse(derivation_path: &str) -> Result<Self> {
        parse_account_index(derivation_path).map(Self::new)
    }

    /// Hardened path components
    pub fn components(&self) -> [u32; 3] {
        [
            44 | HARDENED,
            STELLAR_COIN_TYPE | HARDENED,
            self.account | HARDENED,
        ]
    }

    /// Get path as a string (e.g., "m/44'/148'/0'")
    pub fn to_string_path(&self) -> String {
        format!("m/44'/{}'/{}'", STELLAR_COIN_TYPE, self.account)
    }
}

impl fmt::Display for StellarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_path())
    }
}

/// Derive an Ed25519 private key from a BIP-39 seed along a hardened path
pub fn derive_ed25519_key(seed: &[u8], path: &[u32]) -> Result<Zeroizing<[u8; 32]>> {
    let (mut key, mut chain_code) = split_hmac(ED25519_SEED_KEY, &[seed])?;

    for &component in path {
        let index = component | HARDENED;
        let (child_key, child_chain) = split_hmac(
            &chain_code[..],
            &[&[0u8][..], &key[..], &index.to_be_bytes()[..]],
        )?;
        key = child_key;
        chain_code = child_chain;
    }

    Ok(key)
}

fn split_hmac(key: &[u8], parts: &[&[u8]]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| Error::HdDerivation(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = mac.finalize().into_bytes();

    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    output.as_mut_slice().zeroize();

    Ok((left, right))
}
