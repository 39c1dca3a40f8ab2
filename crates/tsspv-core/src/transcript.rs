//! Shares, share records and the dealer's public transcript

use serde::{Deserialize, Serialize};

use crate::audit::AuditCiphertext;
use crate::error::Result;
use crate::group::{self, Point, Scalar, POINT_SIZE, SCALAR_SIZE};
use crate::proof::DleqProof;

/// A share `(x, ρ(x))` a player presents for reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Public identifier
    pub x: Scalar,
    /// Masked evaluation `hp(x)^r · B^s`
    pub y: Point,
}

impl Share {
    /// Size of the wire encoding `x ‖ y`
    pub const ENCODED_SIZE: usize = SCALAR_SIZE + POINT_SIZE;

    /// Create a new share
    pub fn new(x: Scalar, y: Point) -> Self {
        Self { x, y }
    }

    /// Encode as `x ‖ y` (64 bytes)
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_SIZE] {
        let mut bytes = [0u8; Self::ENCODED_SIZE];
        bytes[..SCALAR_SIZE].copy_from_slice(self.x.as_bytes());
        bytes[SCALAR_SIZE..].copy_from_slice(&group::encode_point(&self.y));
        bytes
    }

    /// Decode from `x ‖ y`
    pub fn from_bytes(bytes: &[u8; Self::ENCODED_SIZE]) -> Result<Self> {
        let mut x = [0u8; SCALAR_SIZE];
        let mut y = [0u8; POINT_SIZE];
        x.copy_from_slice(&bytes[..SCALAR_SIZE]);
        y.copy_from_slice(&bytes[SCALAR_SIZE..]);
        Ok(Self {
            x: group::decode_scalar(&x)?,
            y: group::decode_point(&y)?,
        })
    }
}

/// Per-player entry of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// `hp(x_i)`
    pub fx: Point,
    /// `hp(z_i)` for the dealer-private dummy identifier `z_i`
    pub fz: Point,
    /// `fx^r · B^s`
    pub px: Point,
    /// `fz^r · B^s`
    pub pz: Point,
    /// Proof for `(fx, px)`
    pub proof_x: DleqProof,
    /// Proof for `(fz, pz)`
    pub proof_z: DleqProof,
    /// Escrow of `fz` under the dealer's audit key
    pub audit: AuditCiphertext,
    /// Dealer commitment, identical in every record
    pub cm: Point,
}

impl ShareRecord {
    /// Whether `(f, y)` is this record's real or dummy entry
    pub fn attests(&self, f: &Point, y: &Point) -> bool {
        (self.fx == *f && self.px == *y) || (self.fz == *f && self.pz == *y)
    }
}

/// The dealer's public transcript: one record per player, in player order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    records: Vec<ShareRecord>,
}

impl Transcript {
    /// Wrap an ordered list of records
    pub fn from_records(records: Vec<ShareRecord>) -> Self {
        Self { records }
    }

    /// All records
    pub fn records(&self) -> &[ShareRecord] {
        &self.records
    }

    /// Record for player `index` (0-based)
    pub fn get(&self, index: usize) -> Option<&ShareRecord> {
        self.records.get(index)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the transcript has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every record carries `cm`
    pub fn has_uniform_commitment(&self, cm: &Point) -> bool {
        self.records.iter().all(|record| record.cm == *cm)
    }

    /// Consume into the underlying records
    pub fn into_records(self) -> Vec<ShareRecord> {
        self.records
    }

    /// Serialize as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsspvError;

    #[test]
    fn test_share_bytes_roundtrip() {
        let share = Share::new(Scalar::from(9u64), group::mul_base(&Scalar::from(77u64)));
        assert_eq!(Share::from_bytes(&share.to_bytes()).unwrap(), share);
    }

    #[test]
    fn test_share_rejects_bad_point() {
        let mut bytes = [0u8; Share::ENCODED_SIZE];
        bytes[SCALAR_SIZE..].copy_from_slice(&[0xff; POINT_SIZE]);
        assert!(matches!(
            Share::from_bytes(&bytes),
            Err(TsspvError::Decoding(_))
        ));
    }
}
