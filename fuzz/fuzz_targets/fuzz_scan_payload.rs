#![no_main]

use libfuzzer_sys::fuzz_target;
use lumen_core::{ScanPayload, SignHashRequest};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    match ScanPayload::parse(input) {
        Ok(ScanPayload::SignHash(request)) => {
            assert!(!request.hash.as_bytes().is_empty());
            let reparsed = SignHashRequest::from_uri(&request.to_uri()).unwrap();
            assert_eq!(reparsed, request);
        }
        Ok(ScanPayload::KeySource(pending)) => {
            assert!(pending.is_complete());
            // Checksum may still be wrong; it must fail cleanly
            let _ = pending.to_key_source();
        }
        Err(_) => {}
    }
});
