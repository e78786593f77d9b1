//! Key generation: the three matrices of the scheme

use gf2_primitives::gf2::BinaryMatrix;
use tracing::info;
use utils::rng::SecureRng;

use crate::error::Result;
use crate::matgen::{self, GenOptions, MatrixCache, MatrixKind, Seed};
use crate::params::SchemeParams;

/// The seeds behind a key set, present in seed mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSet {
    pub h_a: Option<Seed>,
    pub g1: Option<Seed>,
    pub g2: Option<Seed>,
}

/// Key material: the parity-check matrix of the outer code, the two
/// inner-code generators, and the seeds that reproduce them.
pub struct KeySet {
    pub h_a: BinaryMatrix,
    pub g1: BinaryMatrix,
    pub g2: BinaryMatrix,
    pub seeds: SeedSet,
}

/// Generate (or reload) `H_A`, `G1` and `G2` through the matrix cache.
///
/// The three matrices are independent. In seed mode with intact caches the
/// operation is idempotent across runs; the returned seeds are the only
/// reproducibility handle, so callers should log them.
pub fn generate_keys(
    params: &SchemeParams,
    cache: &MatrixCache,
    opts: GenOptions,
    rng: &mut impl SecureRng,
) -> Result<KeySet> {
    let (h_a, h_a_seed) =
        matgen::get_or_generate(cache, MatrixKind::ParityCheck, params.c_a, opts, rng)?;
    info!(rows = h_a.rows(), cols = h_a.cols(), "parity check matrix H_A ready");

    let (g1, g1_seed) =
        matgen::get_or_generate(cache, MatrixKind::Generator, params.c1, opts, rng)?;
    info!(rows = g1.rows(), cols = g1.cols(), "generator matrix G1 ready");

    let (g2, g2_seed) =
        matgen::get_or_generate(cache, MatrixKind::Generator, params.c2, opts, rng)?;
    info!(rows = g2.rows(), cols = g2.cols(), "generator matrix G2 ready");

    Ok(KeySet {
        h_a,
        g1,
        g2,
        seeds: SeedSet {
            h_a: h_a_seed,
            g1: g1_seed,
            g2: g2_seed,
        },
    })
}
