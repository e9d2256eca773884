//! Property-based tests for lumen-core using proptest
//!
//! These tests verify invariants that should hold for all valid inputs.

use proptest::prelude::*;
use lumen_core::{
    hd::HARDENED,
    parse_account_index,
    request::SignHashRequest,
    strkey::encode_account_id,
    MessageHash, StellarPath,
};

// ============================================
// Arbitrary Implementations
// ============================================

fn arb_account() -> impl Strategy<Value = u32> {
    0u32..HARDENED
}

fn arb_message_hash() -> impl Strategy<Value = MessageHash> {
    prop::collection::vec(any::<u8>(), 1..=64)
        .prop_map(|bytes| MessageHash::new(bytes).expect("non-empty"))
}

// ============================================
// Derivation path properties
// ============================================

proptest! {
    #[test]
    fn stellar_path_string_parses_back(account in arb_account()) {
        let path = StellarPath::new(account);
        prop_assert_eq!(parse_account_index(&path.to_string_path()).unwrap(), account);
    }

    #[test]
    fn account_is_found_inside_surrounding_text(
        account in arb_account(),
        prefix in "[a-z =]{0,16}",
        suffix in "(/[0-9]{1,3})?",
    ) {
        let input = format!("{}m/44'/148'/{}'{}", prefix, account, suffix);
        prop_assert_eq!(parse_account_index(&input).unwrap(), account);
    }

    #[test]
    fn coin_type_does_not_change_account(account in arb_account(), coin in 0u32..100_000) {
        let input = format!("m/44'/{}'/{}'", coin, account);
        prop_assert_eq!(parse_account_index(&input).unwrap(), account);
    }

    #[test]
    fn hardened_range_accounts_are_rejected(account in HARDENED..=u32::MAX) {
        let input = format!("m/44'/148'/{}'", account);
        prop_assert!(parse_account_index(&input).is_err());
    }

    #[test]
    fn parser_never_panics(input in ".*") {
        let _ = parse_account_index(&input);
    }

    #[test]
    fn path_components_are_hardened(account in arb_account()) {
        for component in StellarPath::new(account).components() {
            prop_assert!(component & HARDENED != 0);
        }
    }
}

// ============================================
// Encoding properties
// ============================================

proptest! {
    #[test]
    fn account_address_shape(key in any::<[u8; 32]>()) {
        let address = encode_account_id(&key);
        prop_assert_eq!(address.len(), 56);
        prop_assert!(address.starts_with('G'));
        prop_assert!(address.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b)));
    }

    #[test]
    fn distinct_keys_give_distinct_addresses(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        prop_assume!(a != b);
        prop_assert_ne!(encode_account_id(&a), encode_account_id(&b));
    }

    #[test]
    fn message_hash_hex_roundtrip(hash in arb_message_hash()) {
        let parsed = MessageHash::from_hex(&hash.to_hex()).unwrap();
        prop_assert_eq!(parsed, hash);
    }

    #[test]
    fn sign_hash_uri_preserves_request(account in arb_account(), hash in arb_message_hash()) {
        let request = SignHashRequest::new(StellarPath::new(account).to_string_path(), hash);
        let parsed = SignHashRequest::from_uri(&request.to_uri()).unwrap();
        prop_assert_eq!(parsed, request);
    }
}
