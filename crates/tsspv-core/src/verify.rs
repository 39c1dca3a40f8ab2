//! Public share verification
//!
//! - [`verify_distribution`] (ShD) checks the whole transcript: one
//!   commitment throughout and a valid proof for every real and dummy entry.
//! - [`verify_share`] (ShS) checks that a presented `(x, y)` is attested by
//!   the transcript, either as a real or as a dummy entry.
//!
//! Both are pure; neither needs any secret.

use tracing::{debug, instrument};

use crate::group::Point;
use crate::params::PublicParams;
use crate::transcript::{Share, Transcript};

/// ShD: verify the dealer's transcript against the reference commitment
#[instrument(skip_all, fields(records = transcript.len()))]
pub fn verify_distribution(params: &PublicParams, transcript: &Transcript, cm: &Point) -> bool {
    if !transcript.has_uniform_commitment(cm) {
        debug!("Transcript commitment is not uniform");
        return false;
    }
    for (i, record) in transcript.records().iter().enumerate() {
        if !record.proof_x.verify(params, &record.fx, &record.px, cm) {
            debug!(record = i, "Real share proof rejected");
            return false;
        }
        if !record.proof_z.verify(params, &record.fz, &record.pz, cm) {
            debug!(record = i, "Dummy share proof rejected");
            return false;
        }
    }
    true
}

/// ShS: whether `share` matches a real or dummy entry of the transcript
pub fn verify_share(params: &PublicParams, transcript: &Transcript, share: &Share) -> bool {
    let f = params.evaluate(&share.x);
    transcript
        .records()
        .iter()
        .any(|record| record.attests(&f, &share.y))
}
