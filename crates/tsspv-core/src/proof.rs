//! Non-interactive proof that a masked share and the dealer commitment use
//! the same `(r, s)`
//!
//! Chaum-Pedersen style AND-composition of two Schnorr proofs, made
//! non-interactive with Fiat-Shamir:
//!
//! ```text
//! cm = H1^r · H2^s        ρ = h^r · B^s
//! ```

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::group::{self, Point, Scalar};
use crate::params::PublicParams;

/// Proof `π = (c, z_r, z_s)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DleqProof {
    /// Challenge
    pub c: Scalar,
    /// Response for `r`
    pub z_r: Scalar,
    /// Response for `s`
    pub z_s: Scalar,
}

impl DleqProof {
    /// Prove knowledge of `(r, s)` opening both `cm` and `rho = h^r · B^s`
    pub fn prove<R: RngCore + CryptoRng>(
        params: &PublicParams,
        h: &Point,
        rho: &Point,
        cm: &Point,
        r: &Scalar,
        s: &Scalar,
        rng: &mut R,
    ) -> Self {
        let k_r = group::random_scalar(rng);
        let k_s = group::random_scalar(rng);

        let a_cm = params.commit(&k_r, &k_s);
        let a_rho = params.mask(h, &k_r, &k_s);

        let c = group::challenge(&[cm, rho, &a_cm, &a_rho]);
        Self {
            c,
            z_r: k_r - c * r,
            z_s: k_s - c * s,
        }
    }

    /// Verify the proof against `(h, rho, cm)`
    pub fn verify(&self, params: &PublicParams, h: &Point, rho: &Point, cm: &Point) -> bool {
        let m_cm = cm * self.c + params.commit(&self.z_r, &self.z_s);
        let m_rho = rho * self.c + params.mask(h, &self.z_r, &self.z_s);
        group::challenge(&[cm, rho, &m_cm, &m_rho]) == self.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct Fixture {
        params: PublicParams,
        h: Point,
        rho: Point,
        cm: Point,
        r: Scalar,
        s: Scalar,
    }

    fn fixture(rng: &mut ChaCha20Rng) -> Fixture {
        let params = PublicParams::generate(3, rng).unwrap();
        let r = group::random_scalar(rng);
        let s = group::random_scalar(rng);
        let h = params.evaluate(&Scalar::from(4u64));
        let rho = params.mask(&h, &r, &s);
        let cm = params.commit(&r, &s);
        Fixture {
            params,
            h,
            rho,
            cm,
            r,
            s,
        }
    }

    #[test]
    fn test_valid_proof_accepted() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let f = fixture(&mut rng);
        let proof = DleqProof::prove(&f.params, &f.h, &f.rho, &f.cm, &f.r, &f.s, &mut rng);
        assert!(proof.verify(&f.params, &f.h, &f.rho, &f.cm));
    }

    #[test]
    fn test_wrong_commitment_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let f = fixture(&mut rng);
        let proof = DleqProof::prove(&f.params, &f.h, &f.rho, &f.cm, &f.r, &f.s, &mut rng);
        let other_cm = f.cm + f.params.b;
        assert!(!proof.verify(&f.params, &f.h, &f.rho, &other_cm));
    }

    #[test]
    fn test_tampered_rho_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let f = fixture(&mut rng);
        let proof = DleqProof::prove(&f.params, &f.h, &f.rho, &f.cm, &f.r, &f.s, &mut rng);
        let tampered = f.rho + f.params.b;
        assert!(!proof.verify(&f.params, &f.h, &tampered, &f.cm));
    }

    #[test]
    fn test_proof_with_wrong_secret_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(14);
        let f = fixture(&mut rng);
        let wrong_s = f.s + Scalar::ONE;
        let proof = DleqProof::prove(&f.params, &f.h, &f.rho, &f.cm, &f.r, &wrong_s, &mut rng);
        assert!(!proof.verify(&f.params, &f.h, &f.rho, &f.cm));
    }

    #[test]
    fn test_tampered_response_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(15);
        let f = fixture(&mut rng);
        let mut proof = DleqProof::prove(&f.params, &f.h, &f.rho, &f.cm, &f.r, &f.s, &mut rng);
        proof.z_r += Scalar::ONE;
        assert!(!proof.verify(&f.params, &f.h, &f.rho, &f.cm));
    }
}
