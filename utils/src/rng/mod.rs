//! Cryptographically secure random number generation
//!
//! Unseeded randomness enters the workspace through the [`SecureRng`]
//! trait alias and [`secure_rng`]; deterministic (seeded) streams live in
//! [`crate::xof`].

use rand_core::{CryptoRng, RngCore};

/// Secure RNG trait for Syndra
pub trait SecureRng: CryptoRng + RngCore {}

impl<T: CryptoRng + RngCore> SecureRng for T {}

/// Thread-local secure RNG instance
pub fn secure_rng() -> impl SecureRng {
    rand::thread_rng()
}
