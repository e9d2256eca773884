//! Key derivation and signing collaborator
//!
//! The flow engine only talks to the [`Signer`] trait; it never touches a
//! private key. [`Ed25519Signer`] is the Stellar implementation: BIP-39 seed,
//! SLIP-10 derivation along `m/44'/148'/N'`, Ed25519 signature.

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::hd::{derive_ed25519_key, StellarPath};
use crate::keysource::KeySource;
use crate::strkey;
use crate::types::Signature;

/// Derives account keys from a key source and signs with them
pub trait Signer {
    /// Public address of the account at `account_index`
    fn derive_address(&self, source: &KeySource, account_index: u32) -> Result<String>;

    /// Derive the account key and sign `message`
    fn derive_and_sign(
        &self,
        source: &KeySource,
        account_index: u32,
        message: &[u8],
    ) -> Result<Signature>;
}

/// Stellar Ed25519 signer
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Ed25519Signer {
    pub fn new() -> Self {
        Self
    }

    fn signing_key(&self, source: &KeySource, account_index: u32) -> Result<SigningKey> {
        let path = StellarPath::new(account_index);
        let secret = derive_ed25519_key(source.seed(), &path.components())?;
        Ok(SigningKey::from_bytes(&secret))
    }

    /// Raw Ed25519 verifying key of the account
    pub fn verifying_key(&self, source: &KeySource, account_index: u32) -> Result<VerifyingKey> {
        Ok(self.signing_key(source, account_index)?.verifying_key())
    }
}

impl Signer for Ed25519Signer {
    #[instrument(skip(self, source), fields(fingerprint = source.fingerprint()))]
    fn derive_address(&self, source: &KeySource, account_index: u32) -> Result<String> {
        let verifying_key = self.verifying_key(source, account_index)?;
        let address = strkey::encode_account_id(verifying_key.as_bytes());
        debug!(%address, "derived account address");
        Ok(address)
    }

    #[instrument(skip(self, source, message), fields(fingerprint = source.fingerprint(), len = message.len()))]
    fn derive_and_sign(
        &self,
        source: &KeySource,
        account_index: u32,
        message: &[u8],
    ) -> Result<Signature> {
        if message.is_empty() {
            return Err(Error::Crypto("refusing to sign an empty message".to_string()));
        }
        let signing_key = self.signing_key(source, account_index)?;
        let signature = signing_key.sign(message);
        debug!("message signed");
        Ok(Signature::new(signature.to_bytes()))
    }
}
