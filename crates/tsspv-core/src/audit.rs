//! ElGamal escrow of dummy-share evaluations for dealer-side audit

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::group::{self, Point, Scalar};

/// Audit ciphertext `(k·B, m + k·pk)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCiphertext {
    pub c1: Point,
    pub c2: Point,
}

/// Dealer's audit key pair
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuditKeyPair {
    secret: Scalar,
    #[zeroize(skip)]
    public: Point,
}

impl AuditKeyPair {
    /// Generate a fresh key pair
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = group::random_nonzero_scalar(rng);
        Self {
            secret,
            public: group::mul_base(&secret),
        }
    }

    /// Public encryption key
    pub fn public_key(&self) -> &Point {
        &self.public
    }

    /// Recover `m = c2 - sk·c1`
    pub fn decrypt(&self, ct: &AuditCiphertext) -> Point {
        ct.c2 - ct.c1 * self.secret
    }
}

impl core::fmt::Debug for AuditKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditKeyPair")
            .field("secret", &"[REDACTED]")
            .field("public", &hex::encode(group::encode_point(&self.public)))
            .finish()
    }
}

/// Encrypt a point under `pk`
pub fn encrypt<R: RngCore + CryptoRng>(pk: &Point, m: &Point, rng: &mut R) -> AuditCiphertext {
    let k = group::random_scalar(rng);
    AuditCiphertext {
        c1: group::mul_base(&k),
        c2: m + pk * k,
    }
}
