//! Syndra Core Implementation
//!
//! Code-based signatures over a concatenated binary code:
//! 1. Keygen - seed-generated parity-check matrix H_A and inner-code
//!    generators G1, G2
//! 2. Sign - hash the message, encode it in both inner codes, juxtapose;
//!    the public key is F = H_A * G*^T
//! 3. Verify - check the syndrome identity H_A * sigma^T == F * hash^T

pub mod artifacts;
pub mod digest;
pub mod error;
pub mod keygen;
pub mod matgen;
pub mod params;
pub mod signer;
pub mod verifier;

pub use error::{Error, Result};
pub use keygen::{generate_keys, KeySet, SeedSet};
pub use matgen::{get_or_generate, GenOptions, MatrixCache, MatrixKind, Seed};
pub use params::{CodeParams, SchemeParams};
pub use signer::{sign, SignOutput};
pub use verifier::{verify, Verdict, Verification};
