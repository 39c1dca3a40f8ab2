#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tsspv_core::{Dealer, DealerOutput, Rbox, ReconstructionOracle, Share, ThresholdConfig};

fn instance() -> &'static DealerOutput {
    static OUT: OnceLock<DealerOutput> = OnceLock::new();
    OUT.get_or_init(|| {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        Dealer::setup(&ThresholdConfig::new(6, 4, 1), &mut rng).unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    let out = instance();
    let rbox = Rbox::new(4, vec![], &out.transcript, &out.params);

    // Arbitrary decodable shares are almost never attested, and anything the
    // oracle does answer must be the dealt secret
    let shares: Vec<Share> = data
        .chunks_exact(Share::ENCODED_SIZE)
        .filter_map(|chunk| {
            let mut bytes = [0u8; Share::ENCODED_SIZE];
            bytes.copy_from_slice(chunk);
            Share::from_bytes(&bytes).ok()
        })
        .collect();

    if let Some(point) = rbox.query(&shares) {
        assert_eq!(point, out.tracing_key.secret_point());
    }
});
