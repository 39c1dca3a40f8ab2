#![no_main]

use libfuzzer_sys::fuzz_target;
use tsspv_core::Share;

fuzz_target!(|data: &[u8]| {
    if data.len() >= Share::ENCODED_SIZE {
        let mut bytes = [0u8; Share::ENCODED_SIZE];
        bytes.copy_from_slice(&data[..Share::ENCODED_SIZE]);

        // Only canonical encodings decode, so they re-encode byte for byte
        if let Ok(share) = Share::from_bytes(&bytes) {
            assert_eq!(share.to_bytes(), bytes);
        }
    }
});
