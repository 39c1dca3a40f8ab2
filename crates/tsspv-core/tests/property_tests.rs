//! Property-based tests for tsspv-core using proptest
//!
//! These tests verify invariants that should hold for every protocol
//! instance, whichever shares or identifiers are picked.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tsspv_core::{
    group, reconstruct,
    reconstruct::lagrange_at_zero,
    trace, verify_distribution, verify_share, verify_trace, Dealer, DealerOutput, Rbox,
    ReconstructionOracle, Scalar, Share, ThresholdConfig,
};

const PLAYERS: usize = 8;
const THRESHOLD: usize = 5;
const COLLUSION: usize = 2;

fn config() -> ThresholdConfig {
    ThresholdConfig::new(PLAYERS, THRESHOLD, COLLUSION)
}

fn deal(seed: u64) -> DealerOutput {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    Dealer::setup(&config(), &mut rng).unwrap()
}

fn pick(shares: &[Share], indices: &[usize]) -> Vec<Share> {
    indices.iter().map(|&i| shares[i]).collect()
}

fn lagrange_naive(xs: &[Scalar]) -> Vec<Scalar> {
    xs.iter()
        .enumerate()
        .map(|(j, xj)| {
            let mut acc = Scalar::ONE;
            for (m, xm) in xs.iter().enumerate() {
                if m != j {
                    acc *= xm * group::invert(&(xm - xj)).unwrap();
                }
            }
            acc
        })
        .collect()
}

// ============================================
// Arbitrary Implementations
// ============================================

fn arb_quorum() -> impl Strategy<Value = Vec<usize>> {
    proptest::sample::subsequence((0..PLAYERS).collect::<Vec<_>>(), THRESHOLD)
        .prop_shuffle()
}

fn arb_sub_quorum() -> impl Strategy<Value = Vec<usize>> {
    proptest::sample::subsequence((0..PLAYERS).collect::<Vec<_>>(), 0..THRESHOLD)
}

fn arb_leaked() -> impl Strategy<Value = Vec<usize>> {
    proptest::sample::subsequence((0..PLAYERS).collect::<Vec<_>>(), COLLUSION)
}

fn arb_distinct_xs() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::btree_set(1u64..u64::MAX, 1..12)
        .prop_map(|set| set.into_iter().collect())
}

// ============================================
// Property Tests
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_quorum_reconstructs_secret(seed in any::<u64>(), quorum in arb_quorum()) {
        let out = deal(seed);
        let shares = pick(&out.shares, &quorum);
        let point = reconstruct(THRESHOLD, &shares).unwrap();
        prop_assert_eq!(point, out.tracing_key.secret_point());
    }

    #[test]
    fn sub_quorum_never_answers(seed in any::<u64>(), subset in arb_sub_quorum()) {
        let out = deal(seed);
        let rbox = Rbox::new(THRESHOLD, vec![], &out.transcript, &out.params);
        prop_assert!(rbox.query(&pick(&out.shares, &subset)).is_none());
    }

    #[test]
    fn batched_inversion_matches_naive(xs in arb_distinct_xs()) {
        let xs: Vec<Scalar> = xs.into_iter().map(Scalar::from).collect();
        prop_assert_eq!(lagrange_at_zero(&xs).unwrap(), lagrange_naive(&xs));
    }

    #[test]
    fn share_checks_are_idempotent(seed in any::<u64>(), index in 0..PLAYERS) {
        let out = deal(seed);
        let cm = out.transcript.records()[0].cm;
        let share = out.shares[index];
        let first = verify_share(&out.params, &out.transcript, &share);
        prop_assert!(first);
        prop_assert_eq!(first, verify_share(&out.params, &out.transcript, &share));
        prop_assert!(verify_distribution(&out.params, &out.transcript, &cm));
        prop_assert!(verify_distribution(&out.params, &out.transcript, &cm));
    }

    #[test]
    fn trace_finds_leaked_and_verifies(seed in any::<u64>(), leaked in arb_leaked()) {
        let out = deal(seed);
        let rbox = Rbox::new(
            THRESHOLD,
            pick(&out.shares, &leaked),
            &out.transcript,
            &out.params,
        );
        let result = trace(&out.tracing_key, &out.transcript, &out.params, &config(), &rbox).unwrap();
        prop_assert_eq!(&result.indices, &leaked);
        prop_assert!(verify_trace(
            &out.verification_key(),
            &result,
            &out.transcript,
            &out.params,
            &config(),
            &rbox,
        ));
    }

    #[test]
    fn flipped_disclosure_rejected(
        seed in any::<u64>(),
        leaked in arb_leaked(),
        which in 0..COLLUSION,
        bit in 0..(Share::ENCODED_SIZE * 8),
    ) {
        let out = deal(seed);
        let rbox = Rbox::new(
            THRESHOLD,
            pick(&out.shares, &leaked),
            &out.transcript,
            &out.params,
        );
        let mut result = trace(&out.tracing_key, &out.transcript, &out.params, &config(), &rbox).unwrap();

        let mut bytes = result.proof.shares[which].to_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        // a flip that does not even decode cannot be disclosed at all
        if let Ok(flipped) = Share::from_bytes(&bytes) {
            result.proof.shares[which] = flipped;
            prop_assert!(!verify_trace(
                &out.verification_key(),
                &result,
                &out.transcript,
                &out.params,
                &config(),
                &rbox,
            ));
        }
    }
}
