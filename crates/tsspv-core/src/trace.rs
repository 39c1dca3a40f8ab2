//! Black-box traitor tracing (Trace) and its public re-check (TrVer)
//!
//! With at most `f` leaked shares embedded in an oracle, the tracer pads
//! every probe with a fixed filler of `k - f - 1` dummy shares and adds one
//! published share at a time. A probe reconstructs the secret exactly when
//! the added share is new to the oracle; shares the oracle already holds
//! collapse under deduplication and leave the probe one short. Those are the
//! shares reported as implicated.
//!
//! The filler comes from the dummy-share pool persisted in the tracing key,
//! so Trace and TrVer always see the same filler.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::ThresholdConfig;
use crate::dealer::DealerSecret;
use crate::error::{Result, TsspvError};
use crate::group::Point;
use crate::oracle::ReconstructionOracle;
use crate::params::PublicParams;
use crate::transcript::{Share, Transcript};
use crate::verify::verify_share;

/// Dealer-held key for tracing
#[derive(Clone)]
pub struct TracingKey {
    secret: DealerSecret,
    dummy_shares: Vec<Share>,
    published_shares: Vec<Share>,
}

/// Key for TrVer. Tracing and its verification are both dealer-side audit
/// operations, so the two keys carry the same material.
pub type VerificationKey = TracingKey;

impl TracingKey {
    /// Assemble a tracing key
    pub fn new(secret: DealerSecret, dummy_shares: Vec<Share>, published_shares: Vec<Share>) -> Self {
        Self {
            secret,
            dummy_shares,
            published_shares,
        }
    }

    /// `S = B^s`
    pub fn secret_point(&self) -> Point {
        self.secret.secret_point()
    }

    /// Commitment the transcript must carry
    pub fn commitment(&self, params: &PublicParams) -> Point {
        self.secret.commitment(params)
    }

    /// Dummy-share pool, one entry per player
    pub fn dummy_shares(&self) -> &[Share] {
        &self.dummy_shares
    }

    /// Shares handed to the players
    pub fn published_shares(&self) -> &[Share] {
        &self.published_shares
    }

    /// Deterministic filler of `k - f - 1` dummy shares: the first pool
    /// entries whose identifier is distinct from every published identifier
    /// and from each other.
    pub fn filler(&self, config: &ThresholdConfig) -> Result<Vec<Share>> {
        config.validate()?;
        let needed = config.filler_size();

        let mut banned: HashSet<[u8; 32]> = self
            .published_shares
            .iter()
            .map(|share| share.x.to_bytes())
            .collect();
        let filler: Vec<Share> = self
            .dummy_shares
            .iter()
            .filter(|share| banned.insert(share.x.to_bytes()))
            .take(needed)
            .copied()
            .collect();

        if filler.len() < needed {
            return Err(TsspvError::InvalidParameters(format!(
                "dummy pool yields {} usable shares, filler needs {}",
                filler.len(),
                needed
            )));
        }
        Ok(filler)
    }

    /// Re-derive every published and dummy share from `(r, s)`
    pub fn check_consistency(&self, params: &PublicParams) -> Result<()> {
        for (kind, shares) in [
            ("published", &self.published_shares),
            ("dummy", &self.dummy_shares),
        ] {
            for (i, share) in shares.iter().enumerate() {
                let h = params.evaluate(&share.x);
                if share.y != self.secret.mask(params, &h) {
                    return Err(TsspvError::InconsistentTranscript(format!(
                        "{} share {} does not match the dealer secret",
                        kind, i
                    )));
                }
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for TracingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TracingKey")
            .field("secret", &self.secret)
            .field("dummy_shares", &self.dummy_shares.len())
            .field("published_shares", &self.published_shares.len())
            .finish()
    }
}

/// Shares disclosed as evidence for a trace
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceProof {
    pub shares: Vec<Share>,
}

/// Result of a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceOutput {
    /// Implicated player indices (0-based, ascending)
    pub indices: Vec<usize>,
    /// Published shares for `indices`, in the same order
    pub proof: TraceProof,
}

/// Trace: find the published shares the oracle already holds
#[instrument(skip_all, fields(k = config.threshold, f = config.collusion))]
pub fn trace<O: ReconstructionOracle + ?Sized>(
    key: &TracingKey,
    transcript: &Transcript,
    params: &PublicParams,
    config: &ThresholdConfig,
    oracle: &O,
) -> Result<TraceOutput> {
    if !transcript.has_uniform_commitment(&key.commitment(params)) {
        return Err(TsspvError::InconsistentTranscript(
            "transcript commitment does not match the tracing key".to_string(),
        ));
    }

    let filler = key.filler(config)?;
    let secret = key.secret_point();

    let mut indices = Vec::new();
    for (idx, share) in key.published_shares.iter().enumerate() {
        let mut probe = filler.clone();
        probe.push(*share);
        if oracle.query(&probe) != Some(secret) {
            indices.push(idx);
        }
    }

    let shares = indices.iter().map(|&i| key.published_shares[i]).collect();
    info!(implicated = indices.len(), "Trace complete");
    Ok(TraceOutput {
        indices,
        proof: TraceProof { shares },
    })
}

/// TrVer: accept a trace result only if every check passes
pub fn verify_trace<O: ReconstructionOracle + ?Sized>(
    key: &VerificationKey,
    output: &TraceOutput,
    transcript: &Transcript,
    params: &PublicParams,
    config: &ThresholdConfig,
    oracle: &O,
) -> bool {
    match check_trace(key, output, transcript, params, config, oracle) {
        Ok(()) => true,
        Err(e) => {
            debug!("Trace rejected: {}", e);
            false
        }
    }
}

/// TrVer with the reason for a rejection
#[instrument(skip_all, fields(implicated = output.indices.len()))]
pub fn check_trace<O: ReconstructionOracle + ?Sized>(
    key: &VerificationKey,
    output: &TraceOutput,
    transcript: &Transcript,
    params: &PublicParams,
    config: &ThresholdConfig,
    oracle: &O,
) -> Result<()> {
    let cm = key.commitment(params);
    if !transcript.has_uniform_commitment(&cm) {
        return Err(TsspvError::InconsistentTranscript(
            "commitment is not uniform across records".to_string(),
        ));
    }

    let published = key.published_shares();
    if let Some(share) = output.proof.shares.iter().find(|s| !published.contains(*s)) {
        return Err(TsspvError::InconsistentTranscript(format!(
            "disclosed share {} is not a published share",
            hex::encode(share.to_bytes())
        )));
    }
    if output.proof.shares.len() != output.indices.len() {
        return Err(TsspvError::InconsistentTranscript(format!(
            "{} indices but {} disclosed shares",
            output.indices.len(),
            output.proof.shares.len()
        )));
    }
    if output.indices.windows(2).any(|w| w[0] >= w[1]) {
        return Err(TsspvError::InconsistentTranscript(
            "indices are not strictly ascending".to_string(),
        ));
    }

    key.check_consistency(params)?;

    let filler = key.filler(config)?;
    let secret = key.secret_point();

    for (&idx, disclosed) in output.indices.iter().zip(output.proof.shares.iter()) {
        let share = published.get(idx).ok_or_else(|| {
            TsspvError::InconsistentTranscript(format!("index {} out of range", idx))
        })?;
        if share != disclosed {
            return Err(TsspvError::InconsistentTranscript(format!(
                "disclosed share does not belong to index {}",
                idx
            )));
        }
        if !verify_share(params, transcript, share) {
            return Err(TsspvError::InconsistentTranscript(format!(
                "share {} is not attested by the transcript",
                idx
            )));
        }

        let mut probe = filler.clone();
        probe.push(*share);
        if oracle.query(&probe) == Some(secret) {
            return Err(TsspvError::InconsistentTranscript(format!(
                "share {} reconstructs with the filler and is not implicated",
                idx
            )));
        }
    }

    debug!("Trace verified");
    Ok(())
}
