#![no_main]

use libfuzzer_sys::fuzz_target;
use lumen_core::{hd::HARDENED, parse_account_index, StellarPath};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(account) = parse_account_index(input) {
        // Accounts are always in the non-hardened range
        assert!(account < HARDENED);

        // Round-trip through the canonical form
        let path = StellarPath::new(account);
        assert_eq!(parse_account_index(&path.to_string_path()).unwrap(), account);
        assert!(path.components().iter().all(|c| c & HARDENED != 0));
    }
});
