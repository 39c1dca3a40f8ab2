//! # TSS-PV Core
//!
//! Publicly verifiable threshold secret sharing over Ristretto255 with
//! black-box traitor tracing.
//!
//! ## Architecture
//!
//! ```text
//! PublicParams ──► Dealer ──► Transcript ──► verify (ShD / ShS)
//!                    │            │
//!                    │            └────────► Rbox (oracle) ──► Reconstructor
//!                    ▼                          ▲
//!               TracingKey ──► trace / verify_trace
//! ```
//!
//! 1. **Setup**: the dealer samples `(r, s)`, commits `cm = H1^r · H2^s`, and
//!    hands player `i` the share `(x_i, hp(x_i)^r · B^s)`, where `hp` is the
//!    public evaluation function. Every real and dummy entry carries a proof
//!    that it was masked with the committed `(r, s)`.
//! 2. **Reconstruction**: any `k` shares interpolate at zero to `S = B^s`.
//! 3. **Tracing**: given an oracle holding leaked shares, the dealer finds
//!    which published shares it holds; anyone with the verification key can
//!    re-check the result.

pub mod audit;
pub mod config;
pub mod dealer;
pub mod error;
pub mod group;
pub mod oracle;
pub mod params;
pub mod proof;
pub mod reconstruct;
pub mod trace;
pub mod transcript;
pub mod verify;

pub use audit::{AuditCiphertext, AuditKeyPair};
pub use config::ThresholdConfig;
pub use dealer::{Dealer, DealerOutput, DealerSecret};
pub use error::{Result, TsspvError};
pub use group::{Point, Scalar};
pub use oracle::{OracleStats, Rbox, ReconstructionOracle};
pub use params::PublicParams;
pub use proof::DleqProof;
pub use reconstruct::reconstruct;
pub use trace::{
    check_trace, trace, verify_trace, TraceOutput, TraceProof, TracingKey, VerificationKey,
};
pub use transcript::{Share, ShareRecord, Transcript};
pub use verify::{verify_distribution, verify_share};
