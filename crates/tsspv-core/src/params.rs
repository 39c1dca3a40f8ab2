//! Public parameters and the public evaluation function `hp`

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TsspvError};
use crate::group::{self, Point, Scalar};

/// Fixed bases and the per-instance basis points defining `hp`
///
/// Immutable once an instance starts; passed by reference to every
/// component that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams {
    /// Basis points `g_1..g_t`, `t = k - 1`
    pub basis: Vec<Point>,
    /// Group generator
    pub b: Point,
    /// Pedersen base `B^2`
    pub h1: Point,
    /// Pedersen base `B^3`
    pub h2: Point,
}

impl PublicParams {
    /// Sample `degree` random basis points, each `B` raised to a fresh scalar
    pub fn generate<R: RngCore + CryptoRng>(degree: usize, rng: &mut R) -> Result<Self> {
        if degree == 0 {
            return Err(TsspvError::InvalidParameters(
                "evaluation function needs at least one basis point".to_string(),
            ));
        }
        let basis = (0..degree)
            .map(|_| group::mul_base(&group::random_scalar(rng)))
            .collect();
        Ok(Self::with_basis(basis))
    }

    /// Build parameters around an existing basis
    pub fn with_basis(basis: Vec<Point>) -> Self {
        let b = group::generator();
        Self {
            basis,
            b,
            h1: group::mul_base(&Scalar::from(2u64)),
            h2: group::mul_base(&Scalar::from(3u64)),
        }
    }

    /// Degree of the evaluation function
    pub fn degree(&self) -> usize {
        self.basis.len()
    }

    /// `hp(x) = Σ_{j=1..t} g_j · x^j`, evaluated with Horner's rule.
    ///
    /// There is no constant term, so `hp(0)` is the identity.
    pub fn evaluate(&self, x: &Scalar) -> Point {
        self.basis
            .iter()
            .rev()
            .fold(group::identity(), |acc, g| (acc + g) * x)
    }

    /// Pedersen commitment `cm = H1^r · H2^s`
    pub fn commit(&self, r: &Scalar, s: &Scalar) -> Point {
        self.h1 * r + self.h2 * s
    }

    /// Masked share `ρ = h^r · B^s`
    pub fn mask(&self, h: &Point, r: &Scalar, s: &Scalar) -> Point {
        h * r + group::mul_base(s)
    }
}
