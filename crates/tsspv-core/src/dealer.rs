//! Dealer setup: commitment, masked shares, dummy shares, proofs and escrow

use std::collections::HashSet;

use rand::{CryptoRng, RngCore};
use tracing::{debug, info, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::audit::{self, AuditKeyPair};
use crate::config::ThresholdConfig;
use crate::error::{Result, TsspvError};
use crate::group::{self, Point, Scalar};
use crate::params::PublicParams;
use crate::proof::DleqProof;
use crate::trace::{TracingKey, VerificationKey};
use crate::transcript::{Share, ShareRecord, Transcript};

/// Dealer secret `(r, s)`; the shared secret is `B^s`
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DealerSecret {
    pub(crate) r: Scalar,
    pub(crate) s: Scalar,
}

impl DealerSecret {
    /// Sample a fresh secret
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            r: group::random_nonzero_scalar(rng),
            s: group::random_nonzero_scalar(rng),
        }
    }

    /// The reconstructable secret `S = B^s`
    pub fn secret_point(&self) -> Point {
        group::mul_base(&self.s)
    }

    /// `cm = H1^r · H2^s`
    pub fn commitment(&self, params: &PublicParams) -> Point {
        params.commit(&self.r, &self.s)
    }

    /// `h^r · B^s`
    pub fn mask(&self, params: &PublicParams, h: &Point) -> Point {
        params.mask(h, &self.r, &self.s)
    }

    /// Prove that `rho = h^r · B^s` uses the committed secret
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        params: &PublicParams,
        h: &Point,
        rho: &Point,
        cm: &Point,
        rng: &mut R,
    ) -> DleqProof {
        DleqProof::prove(params, h, rho, cm, &self.r, &self.s, rng)
    }
}

impl core::fmt::Debug for DealerSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DealerSecret")
            .field("r", &"[REDACTED]")
            .field("s", &"[REDACTED]")
            .finish()
    }
}

/// Everything a dealer produces for one protocol instance
#[derive(Debug)]
pub struct DealerOutput {
    /// Instance parameters
    pub config: ThresholdConfig,
    /// Public parameters, including the sampled basis
    pub params: PublicParams,
    /// Public transcript
    pub transcript: Transcript,
    /// Shares handed to the players, in player order
    pub shares: Vec<Share>,
    /// Private tracing key
    pub tracing_key: TracingKey,
    /// Dealer's audit key for the escrowed dummy evaluations
    pub audit_key: AuditKeyPair,
}

impl DealerOutput {
    /// Key handed to TrVer
    pub fn verification_key(&self) -> VerificationKey {
        self.tracing_key.clone()
    }

    /// Check that record `index` escrows its own dummy evaluation
    pub fn audit_dummy(&self, index: usize) -> Result<bool> {
        let record = self.transcript.get(index).ok_or_else(|| {
            TsspvError::InvalidParameters(format!("no transcript record {}", index))
        })?;
        Ok(self.audit_key.decrypt(&record.audit) == record.fz)
    }
}

/// The dealer
pub struct Dealer;

impl Dealer {
    /// Run setup for `config`
    #[instrument(skip(rng), fields(n = config.players, k = config.threshold, f = config.collusion))]
    pub fn setup<R: RngCore + CryptoRng>(
        config: &ThresholdConfig,
        rng: &mut R,
    ) -> Result<DealerOutput> {
        config.validate()?;
        let params = PublicParams::generate(config.degree(), rng)?;
        let secret = DealerSecret::generate(rng);
        Self::deal(config, params, secret, rng)
    }

    /// Deal with caller-provided parameters and secret
    pub fn deal<R: RngCore + CryptoRng>(
        config: &ThresholdConfig,
        params: PublicParams,
        secret: DealerSecret,
        rng: &mut R,
    ) -> Result<DealerOutput> {
        config.validate()?;
        if params.degree() != config.degree() {
            return Err(TsspvError::InvalidParameters(format!(
                "basis has {} points, threshold {} needs {}",
                params.degree(),
                config.threshold,
                config.degree()
            )));
        }

        let n = config.players;
        let xs: Vec<Scalar> = (1..=n as u64).map(group::scalar_from_index).collect();
        let zs = sample_dummy_identifiers(&xs, n, rng);

        let cm = secret.commitment(&params);
        let audit_key = AuditKeyPair::generate(rng);

        let mut records = Vec::with_capacity(n);
        let mut shares = Vec::with_capacity(n);
        let mut dummies = Vec::with_capacity(n);

        for (x, z) in xs.iter().zip(zs.iter()) {
            let fx = params.evaluate(x);
            let px = secret.mask(&params, &fx);
            let proof_x = secret.prove(&params, &fx, &px, &cm, rng);

            let fz = params.evaluate(z);
            let pz = secret.mask(&params, &fz);
            let proof_z = secret.prove(&params, &fz, &pz, &cm, rng);
            let audit = audit::encrypt(audit_key.public_key(), &fz, rng);

            records.push(ShareRecord {
                fx,
                fz,
                px,
                pz,
                proof_x,
                proof_z,
                audit,
                cm,
            });
            shares.push(Share::new(*x, px));
            dummies.push(Share::new(*z, pz));
        }
        debug!("Generated {} share records", records.len());

        let tracing_key = TracingKey::new(secret, dummies, shares.clone());
        info!(players = n, "Dealer setup complete");

        Ok(DealerOutput {
            config: *config,
            params,
            transcript: Transcript::from_records(records),
            shares,
            tracing_key,
            audit_key,
        })
    }
}

/// Non-zero dummy identifiers, distinct from each other and from every
/// player identifier.
fn sample_dummy_identifiers<R: RngCore + CryptoRng>(
    xs: &[Scalar],
    count: usize,
    rng: &mut R,
) -> Vec<Scalar> {
    let mut used: HashSet<[u8; 32]> = xs.iter().map(|x| x.to_bytes()).collect();
    let mut zs = Vec::with_capacity(count);
    while zs.len() < count {
        let z = group::random_nonzero_scalar(rng);
        if used.insert(z.to_bytes()) {
            zs.push(z);
        }
    }
    zs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_setup_shapes() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let config = ThresholdConfig::new(8, 5, 2);
        let out = Dealer::setup(&config, &mut rng).unwrap();

        assert_eq!(out.params.degree(), 4);
        assert_eq!(out.transcript.len(), 8);
        assert_eq!(out.shares.len(), 8);
        assert_eq!(out.tracing_key.dummy_shares().len(), 8);
        assert_eq!(out.shares[0].x, Scalar::ONE);
    }

    #[test]
    fn test_records_share_commitment() {
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let out = Dealer::setup(&ThresholdConfig::new(6, 4, 1), &mut rng).unwrap();
        let cm = out.transcript.records()[0].cm;
        assert!(out.transcript.has_uniform_commitment(&cm));
        assert_eq!(out.tracing_key.commitment(&out.params), cm);
    }

    #[test]
    fn test_records_match_shares() {
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let out = Dealer::setup(&ThresholdConfig::new(5, 3, 1), &mut rng).unwrap();
        for (record, share) in out.transcript.records().iter().zip(&out.shares) {
            assert_eq!(record.px, share.y);
            assert_eq!(record.fx, out.params.evaluate(&share.x));
        }
        for (record, dummy) in out.transcript.records().iter().zip(out.tracing_key.dummy_shares()) {
            assert_eq!(record.pz, dummy.y);
            assert_eq!(record.fz, out.params.evaluate(&dummy.x));
        }
    }

    #[test]
    fn test_audit_opens_every_dummy() {
        let mut rng = ChaCha20Rng::seed_from_u64(34);
        let out = Dealer::setup(&ThresholdConfig::new(4, 3, 1), &mut rng).unwrap();
        for i in 0..4 {
            assert!(out.audit_dummy(i).unwrap());
        }
        assert!(out.audit_dummy(4).is_err());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(35);
        assert!(Dealer::setup(&ThresholdConfig::new(8, 1, 0), &mut rng).is_err());
        assert!(Dealer::setup(&ThresholdConfig::new(4, 5, 1), &mut rng).is_err());
        assert!(Dealer::setup(&ThresholdConfig::new(8, 5, 4), &mut rng).is_err());
    }

    #[test]
    fn test_basis_size_mismatch_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(36);
        let params = PublicParams::generate(2, &mut rng).unwrap();
        let secret = DealerSecret::generate(&mut rng);
        let result = Dealer::deal(&ThresholdConfig::new(8, 5, 2), params, secret, &mut rng);
        assert!(matches!(result, Err(TsspvError::InvalidParameters(_))));
    }

    #[test]
    fn test_dummy_identifiers_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(37);
        let xs: Vec<Scalar> = (1..=16u64).map(group::scalar_from_index).collect();
        let zs = sample_dummy_identifiers(&xs, 16, &mut rng);
        let all: HashSet<[u8; 32]> = xs.iter().chain(zs.iter()).map(|s| s.to_bytes()).collect();
        assert_eq!(all.len(), 32);
        assert!(zs.iter().all(|z| *z != Scalar::ZERO));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let mut rng = ChaCha20Rng::seed_from_u64(38);
        let secret = DealerSecret::generate(&mut rng);
        assert!(!format!("{:?}", secret).contains("Scalar"));
    }
}
