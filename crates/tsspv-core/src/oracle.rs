//! Reconstruction oracle ("Rbox")
//!
//! The only sanctioned way for the tracer to attempt a reconstruction.
//! Every input is checked with ShS before anything is interpolated, so a
//! probe carrying an invalid share can never succeed.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::group::Point;
use crate::params::PublicParams;
use crate::reconstruct;
use crate::transcript::{Share, Transcript};
use crate::verify::verify_share;

/// Black-box reconstruction capability
pub trait ReconstructionOracle {
    /// Attempt a reconstruction with `extra` shares on top of whatever the
    /// oracle already holds. `None` means no result.
    fn query(&self, extra: &[Share]) -> Option<Point>;
}

/// Query counters; purely informational
#[derive(Debug, Default)]
pub struct OracleStats {
    answered: AtomicU64,
    rejected: AtomicU64,
    insufficient: AtomicU64,
}

impl OracleStats {
    /// Queries that produced a point
    pub fn answered(&self) -> u64 {
        self.answered.load(Ordering::Relaxed)
    }

    /// Queries refused because a share failed ShS
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Queries refused for lack of distinct shares
    pub fn insufficient(&self) -> u64 {
        self.insufficient.load(Ordering::Relaxed)
    }

    /// All queries seen
    pub fn total(&self) -> u64 {
        self.answered() + self.rejected() + self.insufficient()
    }
}

/// Oracle holding a set of embedded (leaked) shares
#[derive(Debug)]
pub struct Rbox<'a> {
    threshold: usize,
    embedded: Vec<Share>,
    transcript: &'a Transcript,
    params: &'a PublicParams,
    stats: OracleStats,
}

impl<'a> Rbox<'a> {
    /// Create an oracle with the given embedded shares
    pub fn new(
        threshold: usize,
        embedded: Vec<Share>,
        transcript: &'a Transcript,
        params: &'a PublicParams,
    ) -> Self {
        Self {
            threshold,
            embedded,
            transcript,
            params,
            stats: OracleStats::default(),
        }
    }

    /// Reconstruction threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Embedded shares
    pub fn embedded(&self) -> &[Share] {
        &self.embedded
    }

    /// Query counters
    pub fn stats(&self) -> &OracleStats {
        &self.stats
    }
}

impl ReconstructionOracle for Rbox<'_> {
    fn query(&self, extra: &[Share]) -> Option<Point> {
        let mut seen = HashSet::new();
        let mut distinct = Vec::with_capacity(self.threshold);

        for share in self.embedded.iter().chain(extra.iter()) {
            if !verify_share(self.params, self.transcript, share) {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                debug!("Oracle query rejected: share not attested by transcript");
                return None;
            }
            // first occurrence of an identifier wins
            if seen.insert(share.x.to_bytes()) {
                distinct.push(*share);
            }
        }

        if distinct.len() < self.threshold {
            self.stats.insufficient.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match reconstruct::reconstruct(self.threshold, &distinct) {
            Ok(point) => {
                self.stats.answered.fetch_add(1, Ordering::Relaxed);
                Some(point)
            }
            Err(e) => {
                debug!("Oracle reconstruction failed: {}", e);
                self.stats.insufficient.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;
    use crate::dealer::{Dealer, DealerOutput};
    use crate::group;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(seed: u64) -> DealerOutput {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Dealer::setup(&ThresholdConfig::new(8, 5, 2), &mut rng).unwrap()
    }

    #[test]
    fn test_threshold_query_answers() {
        let out = setup(61);
        let rbox = Rbox::new(5, vec![], &out.transcript, &out.params);
        let secret = out.tracing_key.secret_point();
        assert_eq!(rbox.query(&out.shares[..5]), Some(secret));
        assert_eq!(rbox.query(&out.shares[2..7]), Some(secret));
        assert_eq!(rbox.stats().answered(), 2);
    }

    #[test]
    fn test_sub_threshold_query_empty() {
        let out = setup(62);
        let rbox = Rbox::new(5, vec![], &out.transcript, &out.params);
        assert_eq!(rbox.query(&out.shares[..4]), None);
        assert_eq!(rbox.query(&[]), None);
        assert_eq!(rbox.stats().insufficient(), 2);
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let out = setup(63);
        let rbox = Rbox::new(5, vec![], &out.transcript, &out.params);
        let mut shares = out.shares[..4].to_vec();
        shares.push(out.shares[0]);
        assert_eq!(rbox.query(&shares), None);
    }

    #[test]
    fn test_embedded_shares_combine_with_extra() {
        let out = setup(64);
        let rbox = Rbox::new(5, out.shares[..2].to_vec(), &out.transcript, &out.params);
        assert_eq!(
            rbox.query(&out.shares[5..8]),
            Some(out.tracing_key.secret_point())
        );
        // an embedded share resubmitted adds nothing
        assert_eq!(rbox.query(&out.shares[1..4]), None);
    }

    #[test]
    fn test_invalid_share_poisons_query() {
        let out = setup(65);
        let rbox = Rbox::new(5, vec![], &out.transcript, &out.params);
        let mut shares = out.shares[..6].to_vec();
        shares[5].y += group::generator();
        assert_eq!(rbox.query(&shares), None);
        assert_eq!(rbox.stats().rejected(), 1);
        assert_eq!(rbox.stats().total(), 1);
    }

    #[test]
    fn test_dummy_shares_admitted() {
        let out = setup(66);
        let rbox = Rbox::new(5, vec![], &out.transcript, &out.params);
        let dummies = &out.tracing_key.dummy_shares()[..5];
        assert_eq!(rbox.query(dummies), Some(out.tracing_key.secret_point()));
    }
}
