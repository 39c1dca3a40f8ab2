#![no_main]

use libfuzzer_sys::fuzz_target;
use tsspv_core::Transcript;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing hostile JSON should not panic
    if let Ok(transcript) = Transcript::from_json(text) {
        let json = transcript.to_json().unwrap();
        let again = Transcript::from_json(&json).unwrap();
        assert_eq!(transcript, again);

        if let Some(first) = transcript.get(0) {
            let _ = transcript.has_uniform_commitment(&first.cm);
        }
    }
});
