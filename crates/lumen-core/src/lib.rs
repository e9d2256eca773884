//! Lumen Core - Shared types, derivation paths and signing primitives
//!
//! This crate provides the foundational types used by the Lumen air-gapped
//! hash signer: key sources loaded from BIP-39 mnemonics, the derivation-path
//! parser, scan payloads, device settings and the [`Signer`] collaborator
//! that turns a confirmed request into an Ed25519 signature.

pub mod error;
pub mod hd;
pub mod keysource;
pub mod request;
pub mod settings;
pub mod signer;
pub mod strkey;
pub mod types;

pub use error::{Error, Result};
pub use hd::{parse_account_index, StellarPath};
pub use keysource::{KeySource, KeySourceStore, PendingMnemonic};
pub use request::{ScanPayload, SignHashRequest};
pub use settings::{PassphrasePolicy, QrDensity, Settings};
pub use signer::{Ed25519Signer, Signer};
pub use types::{MessageHash, Signature};

/// SLIP-44 coin type registered for Stellar
pub const STELLAR_COIN_TYPE: u32 = 148;

/// Word counts accepted for a key source mnemonic
pub const SUPPORTED_WORD_COUNTS: [usize; 2] = [12, 24];
