//! Shared helpers for the Syndra workspace
//!
//! - rng: CSPRNG access behind a trait alias
//! - xof: deterministic SHAKE256 streams for seed expansion

pub mod rng;
pub mod xof;
