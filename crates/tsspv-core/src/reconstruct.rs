//! Lagrange interpolation in the exponent
//!
//! Shares lie on `ρ(x) = hp(x)^r · B^s`, a degree `k - 1` polynomial with
//! point coefficients whose value at zero is `B^s`. Interpolating at zero
//! with the coefficients
//!
//! ```text
//! λ_j = Π_{m≠j} x_m / Π_{m≠j} (x_m - x_j)
//! ```
//!
//! recovers the secret. All `k` denominators are inverted together with
//! Montgomery's trick: one field inversion plus `O(k)` multiplications.

use tracing::debug;

use crate::error::{Result, TsspvError};
use crate::group::{self, Point, Scalar};
use crate::transcript::Share;

/// Invert every value with a single field inversion.
///
/// Fails with `InvalidParameters` if any value is zero. The prefix/suffix
/// pass is sequential.
pub fn batch_invert(values: &[Scalar]) -> Result<Vec<Scalar>> {
    let mut partials = Vec::with_capacity(values.len() + 1);
    partials.push(Scalar::ONE);
    for v in values {
        let last = partials[partials.len() - 1];
        partials.push(last * v);
    }

    let mut inv = group::invert(&partials[values.len()])?;
    let mut out = vec![Scalar::ZERO; values.len()];
    for i in (0..values.len()).rev() {
        out[i] = partials[i] * inv;
        inv *= values[i];
    }
    Ok(out)
}

/// Lagrange coefficients for evaluation at zero over distinct `xs`
pub fn lagrange_at_zero(xs: &[Scalar]) -> Result<Vec<Scalar>> {
    let (numerators, denominators): (Vec<Scalar>, Vec<Scalar>) = xs
        .iter()
        .enumerate()
        .map(|(j, xj)| {
            xs.iter()
                .enumerate()
                .filter(|(m, _)| *m != j)
                .fold((Scalar::ONE, Scalar::ONE), |(num, den), (_, xm)| {
                    (num * xm, den * (xm - xj))
                })
        })
        .unzip();

    let inverses = batch_invert(&denominators)?;
    Ok(numerators
        .iter()
        .zip(inverses.iter())
        .map(|(num, inv)| num * inv)
        .collect())
}

/// Interpolate the first `threshold` shares at zero
pub fn reconstruct(threshold: usize, shares: &[Share]) -> Result<Point> {
    if threshold == 0 || shares.len() < threshold {
        return Err(TsspvError::InsufficientShares {
            needed: threshold.max(1),
            got: shares.len(),
        });
    }
    let quorum = &shares[..threshold];
    let xs: Vec<Scalar> = quorum.iter().map(|share| share.x).collect();
    let lambdas = lagrange_at_zero(&xs)?;

    let acc = quorum
        .iter()
        .zip(lambdas.iter())
        .fold(group::identity(), |acc, (share, lambda)| acc + share.y * lambda);
    debug!(threshold, "Reconstructed secret point");
    Ok(acc)
}
