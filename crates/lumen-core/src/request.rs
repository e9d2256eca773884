//! Requests and payloads that enter the device through the camera
//!
//! Two payload families are recognised:
//! - hash-signing requests: `sign-hash?path=<derivation path>&hash=<hex>`
//! - key sources: a standard SeedQR (48 or 96 digits) or 12/24 plain words

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keysource::{decode_seed_qr, PendingMnemonic};
use crate::types::MessageHash;

/// URI scheme prefix for hash-signing requests
pub const SIGN_HASH_PREFIX: &str = "sign-hash?";

/// Pending hash-signing operation
///
/// The derivation path is kept as received. It is only parsed once a key
/// source has been chosen, so a malformed path aborts the flow at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignHashRequest {
    pub derivation_path: String,
    pub hash: MessageHash,
}

impl SignHashRequest {
    pub fn new(derivation_path: impl Into<String>, hash: MessageHash) -> Self {
        Self {
            derivation_path: derivation_path.into(),
            hash,
        }
    }

    /// Parse the query part of a `sign-hash?` URI
    pub fn from_uri(uri: &str) -> Result<Self> {
        let query = uri
            .trim()
            .strip_prefix(SIGN_HASH_PREFIX)
            .ok_or_else(|| Error::UnrecognizedPayload("not a sign-hash request".to_string()))?;

        let mut path = None;
        let mut hash = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("path", value)) => path = Some(value.to_string()),
                Some(("hash", value)) => hash = Some(MessageHash::from_hex(value)?),
                _ => {
                    return Err(Error::UnrecognizedPayload(format!(
                        "unexpected sign-hash field: {}",
                        pair
                    )))
                }
            }
        }

        match (path, hash) {
            (Some(path), Some(hash)) => Ok(Self::new(path, hash)),
            _ => Err(Error::UnrecognizedPayload(
                "sign-hash request needs both path and hash".to_string(),
            )),
        }
    }

    pub fn to_uri(&self) -> String {
        format!(
            "{}path={}&hash={}",
            SIGN_HASH_PREFIX,
            self.derivation_path,
            self.hash.to_hex()
        )
    }
}

/// A decoded camera payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPayload {
    SignHash(SignHashRequest),
    KeySource(PendingMnemonic),
}

impl ScanPayload {
    pub fn parse(payload: &str) -> Result<Self> {
        let payload = payload.trim();

        if payload.starts_with(SIGN_HASH_PREFIX) {
            return SignHashRequest::from_uri(payload).map(ScanPayload::SignHash);
        }

        if !payload.is_empty() && payload.bytes().all(|b| b.is_ascii_digit()) {
            let words = decode_seed_qr(payload)?;
            return PendingMnemonic::from_words(&words).map(ScanPayload::KeySource);
        }

        let words: Vec<&str> = payload.split_whitespace().collect();
        if crate::SUPPORTED_WORD_COUNTS.contains(&words.len()) {
            return PendingMnemonic::from_words(&words).map(ScanPayload::KeySource);
        }

        Err(Error::UnrecognizedPayload(format!(
            "{} characters of unknown format",
            payload.len()
        )))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanPayload::SignHash(_) => "sign-hash",
            ScanPayload::KeySource(_) => "key-source",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "aa11bb22cc33dd44ee55ff6600770088aa11bb22cc33dd44ee55ff6600770088";

    #[test]
    fn test_sign_hash_uri_parsing() {
        let uri = format!("sign-hash?path=m/44'/148'/3'&hash={}", HASH);
        let request = SignHashRequest::from_uri(&uri).unwrap();
        assert_eq!(request.derivation_path, "m/44'/148'/3'");
        assert_eq!(request.hash.to_hex(), HASH);
        assert_eq!(request.to_uri(), uri);
    }

    #[test]
    fn test_sign_hash_keeps_unparsable_path() {
        let uri = format!("sign-hash?path=garbage&hash={}", HASH);
        let request = SignHashRequest::from_uri(&uri).unwrap();
        assert_eq!(request.derivation_path, "garbage");
    }

    #[test]
    fn test_sign_hash_requires_both_fields() {
        assert!(SignHashRequest::from_uri("sign-hash?path=m/44'/148'/0'").is_err());
        assert!(SignHashRequest::from_uri(&format!("sign-hash?hash={}", HASH)).is_err());
        assert!(SignHashRequest::from_uri("sign-hash?path=m&hash=xyz").is_err());
        assert!(SignHashRequest::from_uri("sign-hash?path=m&hash=aa&extra=1").is_err());
    }

    #[test]
    fn test_scan_payload_kinds() {
        let uri = format!("sign-hash?path=m/44'/148'/0'&hash={}", HASH);
        assert_eq!(ScanPayload::parse(&uri).unwrap().kind(), "sign-hash");

        let words = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert_eq!(ScanPayload::parse(words).unwrap().kind(), "key-source");

        let seed_qr = format!("{}{}", "0000".repeat(11), "0003");
        match ScanPayload::parse(&seed_qr).unwrap() {
            ScanPayload::KeySource(pending) => {
                assert!(pending.is_complete());
                assert_eq!(pending.word(11), Some("about"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_scan_payload_rejects_unknown() {
        assert!(matches!(
            ScanPayload::parse("hello world"),
            Err(Error::UnrecognizedPayload(_))
        ));
        assert!(ScanPayload::parse("").is_err());
        assert!(ScanPayload::parse("123").is_err());
    }
}
