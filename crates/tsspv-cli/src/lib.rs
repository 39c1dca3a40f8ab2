//! TSS-PV CLI - driver and benchmark for the protocol engine
//!
//! Deals an instance, checks the transcript, reconstructs, and runs the
//! Trace / TrVer audit against an oracle holding leaked shares.

pub mod commands;

pub use commands::*;
