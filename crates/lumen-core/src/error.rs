//! Error types for the Lumen core library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Could not parse address index from derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Unsupported word count: {0}")]
    UnsupportedWordCount(usize),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Unrecognized scan payload: {0}")]
    UnrecognizedPayload(String),

    #[error("HD derivation error: {0}")]
    HdDerivation(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Key source not found at index {0}")]
    KeySourceNotFound(usize),
}
