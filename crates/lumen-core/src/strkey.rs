//! Stellar StrKey encoding for account addresses
//!
//! A StrKey is `base32(version_byte || payload || crc16_xmodem_le)` without
//! padding. Only the account-id form (`G...`) is displayed by the device.

use data_encoding::BASE32_NOPAD;

/// Version byte for an Ed25519 public key (renders as `G`)
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// Encode an Ed25519 public key as a Stellar account address
pub fn encode_account_id(public_key: &[u8; 32]) -> String {
    let mut data = Vec::with_capacity(35);
    data.push(VERSION_ACCOUNT_ID);
    data.extend_from_slice(public_key);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}

/// CRC-16/XMODEM (poly 0x1021, init 0)
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
