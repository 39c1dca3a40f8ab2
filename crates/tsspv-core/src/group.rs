//! Group and field primitives over Ristretto255
//!
//! Every point and scalar in the protocol lives here: the generator `B`,
//! the identity, random scalars, 32-byte encodings and the Fiat-Shamir
//! challenge hash.

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT, ristretto::CompressedRistretto, traits::Identity,
};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::{Result, TsspvError};

pub use curve25519_dalek::ristretto::RistrettoPoint as Point;
pub use curve25519_dalek::scalar::Scalar;

/// Size of an encoded point in bytes
pub const POINT_SIZE: usize = 32;

/// Size of an encoded scalar in bytes
pub const SCALAR_SIZE: usize = 32;

/// The group generator `B`
pub fn generator() -> Point {
    RISTRETTO_BASEPOINT_POINT
}

/// The group identity
pub fn identity() -> Point {
    Point::identity()
}

/// `B^s`
pub fn mul_base(s: &Scalar) -> Point {
    Point::mul_base(s)
}

/// Sample a uniformly random scalar
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Sample a uniformly random non-zero scalar
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Scalar::random(rng);
        if s != Scalar::ZERO {
            return s;
        }
    }
}

/// Scalar for a small public identifier (player index)
pub fn scalar_from_index(index: u64) -> Scalar {
    Scalar::from(index)
}

/// Invert a scalar, rejecting zero
pub fn invert(s: &Scalar) -> Result<Scalar> {
    if *s == Scalar::ZERO {
        return Err(TsspvError::InvalidParameters(
            "cannot invert zero: duplicate evaluation point".to_string(),
        ));
    }
    Ok(s.invert())
}

/// Compressed 32-byte encoding of a point
pub fn encode_point(p: &Point) -> [u8; POINT_SIZE] {
    p.compress().to_bytes()
}

/// Decode a compressed point
pub fn decode_point(bytes: &[u8; POINT_SIZE]) -> Result<Point> {
    CompressedRistretto(*bytes)
        .decompress()
        .ok_or_else(|| TsspvError::Decoding(format!("invalid point {}", hex::encode(bytes))))
}

/// Decode a canonical scalar
pub fn decode_scalar(bytes: &[u8; SCALAR_SIZE]) -> Result<Scalar> {
    Option::from(Scalar::from_canonical_bytes(*bytes))
        .ok_or_else(|| TsspvError::Decoding(format!("non-canonical scalar {}", hex::encode(bytes))))
}

/// Fiat-Shamir challenge: SHA-256 over the concatenated point encodings,
/// reduced modulo the group order.
pub fn challenge(points: &[&Point]) -> Scalar {
    let mut hasher = Sha256::new();
    for p in points {
        hasher.update(p.compress().as_bytes());
    }
    let digest: [u8; 32] = hasher.finalize().into();
    Scalar::from_bytes_mod_order(digest)
}
