//! Seeded matrix generation and the on-disk cache
//!
//! A matrix is identified by `(prefix, n, k, d)`. In seed mode a 32-byte
//! seed is expanded through a SHAKE256 stream domain-separated by that
//! identity, so the same seed and parameters always reproduce the same
//! matrix; the cache makes the result stable across runs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use gf2_primitives::gf2::BinaryMatrix;
use tracing::{debug, warn};
use utils::rng::SecureRng;
use utils::xof::SeedStream;

use crate::error::{Error, Result};
use crate::params::CodeParams;

/// Seed length in bytes.
pub const SEED_SIZE: usize = 32;

/// A 32-byte generation seed, the scheme's only reproducibility handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }

    /// Draw a fresh seed from the CSPRNG.
    pub fn random(rng: &mut impl SecureRng) -> Self {
        let mut bytes = [0u8; SEED_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Which of the scheme's matrices is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Parity-check matrix, (n - k) x n, systematized toward `[A | I]`.
    ParityCheck,
    /// Generator matrix, k x n, systematized toward `[I | P]`.
    Generator,
}

impl MatrixKind {
    pub fn prefix(self) -> &'static str {
        match self {
            MatrixKind::ParityCheck => "H",
            MatrixKind::Generator => "G",
        }
    }

    pub fn shape(self, params: CodeParams) -> (usize, usize) {
        match self {
            MatrixKind::ParityCheck => (params.redundancy() as usize, params.n as usize),
            MatrixKind::Generator => (params.k as usize, params.n as usize),
        }
    }

    /// Greedy column permutation into systematic form. Partial progress is
    /// tolerated: the signer and verifier do not depend on the identity
    /// block being complete.
    fn systematize(self, matrix: &mut BinaryMatrix) {
        let placed = match self {
            MatrixKind::ParityCheck => matrix.make_systematic(),
            MatrixKind::Generator => matrix.make_systematic_front(),
        };
        if placed < matrix.rows() {
            debug!(
                placed,
                rows = matrix.rows(),
                "matrix is only partially systematic"
            );
        }
    }
}

/// Flags steering [`get_or_generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenOptions {
    /// Persist and reuse seeds so matrices are reproducible.
    pub use_seed: bool,
    /// Ignore cached matrices and rebuild them.
    pub regenerate: bool,
}

/// Expand a seed into the matrix for `(kind, params)`.
///
/// Bits are consumed row-major, MSB-first within each stream byte. The
/// stream is domain-separated by prefix and dimensions, so the same seed
/// used for a different shape yields an unrelated matrix.
pub fn matrix_from_seed(kind: MatrixKind, params: CodeParams, seed: &Seed) -> BinaryMatrix {
    let (rows, cols) = kind.shape(params);
    let domain = format!("{}-{}-{}-{}", kind.prefix(), params.n, params.k, params.d);
    let mut stream = SeedStream::new(domain.as_bytes(), seed.as_bytes());
    let mut bits = vec![0u8; (rows * cols + 7) / 8];
    stream.fill(&mut bits);
    let mut matrix = BinaryMatrix::from_bits(rows, cols, &bits);
    kind.systematize(&mut matrix);
    matrix
}

/// Draw a matrix straight from the CSPRNG. Not reproducible.
fn matrix_from_rng(
    kind: MatrixKind,
    params: CodeParams,
    rng: &mut impl SecureRng,
) -> BinaryMatrix {
    let (rows, cols) = kind.shape(params);
    let mut bits = vec![0u8; (rows * cols + 7) / 8];
    rng.fill_bytes(&mut bits);
    let mut matrix = BinaryMatrix::from_bits(rows, cols, &bits);
    kind.systematize(&mut matrix);
    matrix
}

/// On-disk store of generated matrices and their seeds, one file per
/// `(prefix, n, k, d)`.
pub struct MatrixCache {
    dir: PathBuf,
}

impl MatrixCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn matrix_path(&self, kind: MatrixKind, p: CodeParams) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}_{}.txt", kind.prefix(), p.n, p.k, p.d))
    }

    pub fn seed_path(&self, kind: MatrixKind, p: CodeParams) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}_{}.seed", kind.prefix(), p.n, p.k, p.d))
    }

    /// Load a cached matrix. Anything unreadable, unparseable or of the
    /// wrong shape counts as a miss, never as a fatal error.
    fn load_matrix(&self, path: &Path, rows: usize, cols: usize) -> Option<BinaryMatrix> {
        let text = fs::read_to_string(path).ok()?;
        match BinaryMatrix::from_text(&text) {
            Ok(m) if m.rows() == rows && m.cols() == cols => Some(m),
            Ok(m) => {
                warn!(
                    path = %path.display(),
                    rows = m.rows(),
                    cols = m.cols(),
                    "cached matrix has the wrong shape, regenerating"
                );
                None
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "cached matrix is corrupt, regenerating");
                None
            }
        }
    }

    fn store_matrix(&self, path: &Path, matrix: &BinaryMatrix) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        fs::write(path, matrix.to_text()).map_err(|e| Error::io(path, e))
    }

    fn load_seed(&self, path: &Path) -> Option<Seed> {
        let bytes = fs::read(path).ok()?;
        match <[u8; SEED_SIZE]>::try_from(bytes.as_slice()) {
            Ok(arr) => Some(Seed::from_bytes(arr)),
            Err(_) => {
                warn!(
                    path = %path.display(),
                    len = bytes.len(),
                    "cached seed has the wrong length, drawing a fresh one"
                );
                None
            }
        }
    }

    fn store_seed(&self, path: &Path, seed: &Seed) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        fs::write(path, seed.as_bytes()).map_err(|e| Error::io(path, e))
    }
}

/// Resolve the matrix for `(kind, params)`.
///
/// Resolution order: cached matrix (unless regenerating), then seed-mode
/// expansion (loading the cached seed or drawing and persisting a fresh
/// one), then a direct CSPRNG draw. Returns the matrix together with the
/// seed behind it, when one exists.
pub fn get_or_generate(
    cache: &MatrixCache,
    kind: MatrixKind,
    params: CodeParams,
    opts: GenOptions,
    rng: &mut impl SecureRng,
) -> Result<(BinaryMatrix, Option<Seed>)> {
    let (rows, cols) = kind.shape(params);
    let matrix_path = cache.matrix_path(kind, params);
    let seed_path = cache.seed_path(kind, params);

    if !opts.regenerate {
        if let Some(matrix) = cache.load_matrix(&matrix_path, rows, cols) {
            debug!(path = %matrix_path.display(), "matrix cache hit");
            let seed = opts.use_seed.then(|| cache.load_seed(&seed_path)).flatten();
            return Ok((matrix, seed));
        }
    }

    if opts.use_seed {
        let seed = match cache.load_seed(&seed_path) {
            Some(seed) => seed,
            None => {
                let seed = Seed::random(rng);
                cache.store_seed(&seed_path, &seed)?;
                seed
            }
        };
        let matrix = matrix_from_seed(kind, params, &seed);
        cache.store_matrix(&matrix_path, &matrix)?;
        return Ok((matrix, Some(seed)));
    }

    let matrix = matrix_from_rng(kind, params, rng);
    cache.store_matrix(&matrix_path, &matrix)?;
    Ok((matrix, None))
}
