//! Code parameters and their persistent form
//!
//! The three parameter records travel together as one immutable
//! [`SchemeParams`] value handed down the call chain; nothing mutates them
//! after entry.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};

/// An [n, k, d] binary code: length, dimension, minimum distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeParams {
    pub n: u32,
    pub k: u32,
    pub d: u32,
}

impl CodeParams {
    /// BCH-style parameters: n = 2^m - 1, k = m*t, d = 2t + 1.
    pub fn bch(m: u32, t: u32) -> Self {
        Self {
            n: (1 << m) - 1,
            k: m * t,
            d: 2 * t + 1,
        }
    }

    /// Entry check: n must exceed both k and d, and all three are positive.
    pub fn validated(self, name: &'static str) -> Result<Self> {
        if self.k == 0 || self.d == 0 || self.n <= self.k || self.n <= self.d {
            return Err(Error::InvalidParams {
                name,
                n: self.n,
                k: self.k,
                d: self.d,
            });
        }
        Ok(self)
    }

    /// Parity rows of the code's check matrix.
    pub fn redundancy(&self) -> u32 {
        self.n - self.k
    }
}

/// The parameter triple of the scheme: outer concatenated code `C_A` and
/// inner codes `C1`, `C2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeParams {
    pub c_a: CodeParams,
    pub c1: CodeParams,
    pub c2: CodeParams,
}

impl SchemeParams {
    /// Derive the outer code from two inner codes:
    /// n_A = n1 + n2, k_A = k1, d_A = d1 + d2.
    ///
    /// The inner dimensions must agree; a mismatched second dimension is
    /// coerced to the first with a diagnostic.
    pub fn from_inner(c1: CodeParams, mut c2: CodeParams) -> Result<Self> {
        let c1 = c1.validated("G1")?;
        c2 = c2.validated("G2")?;
        if c2.k != c1.k {
            warn!(
                g1_k = c1.k,
                g2_k = c2.k,
                "different values for k, setting G2 k to G1 k"
            );
            c2.k = c1.k;
            c2 = c2.validated("G2")?;
        }
        let c_a = CodeParams {
            n: c1.n + c2.n,
            k: c1.k,
            d: c1.d + c2.d,
        }
        .validated("H_A")?;
        Ok(Self { c_a, c1, c2 })
    }

    /// Both inner codes from the same BCH-style (m, t) point.
    pub fn from_bch(m: u32, t: u32) -> Result<Self> {
        let inner = CodeParams::bch(m, t);
        Self::from_inner(inner, inner)
    }

    /// Read the ordered `key value` schema of params.txt.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut lines = text.lines();
        let mut next = |key: &'static str| -> Result<u32> {
            let line = lines
                .next()
                .ok_or_else(|| malformed(path, format!("missing `{key}` line")))?;
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some(found) if found == key => {}
                other => {
                    return Err(malformed(
                        path,
                        format!("expected `{key}`, found {other:?}"),
                    ))
                }
            }
            let token = parts
                .next()
                .ok_or_else(|| malformed(path, format!("`{key}` has no value")))?;
            let value = token.parse().map_err(|_| {
                malformed(path, format!("`{key}` value {token:?} is not an integer"))
            })?;
            if parts.next().is_some() {
                return Err(malformed(path, format!("trailing tokens after `{key}`")));
            }
            Ok(value)
        };

        let c_a = CodeParams {
            n: next("H_A_n")?,
            k: next("H_A_k")?,
            d: next("H_A_d")?,
        };
        let c1 = CodeParams {
            n: next("G1_n")?,
            k: next("G1_k")?,
            d: next("G1_d")?,
        };
        let c2 = CodeParams {
            n: next("G2_n")?,
            k: next("G2_k")?,
            d: next("G2_d")?,
        };

        let c_a = c_a.validated("H_A")?;
        let c1 = c1.validated("G1")?;
        let mut c2 = c2.validated("G2")?;
        if c2.k != c1.k {
            warn!(
                g1_k = c1.k,
                g2_k = c2.k,
                "different values for k, setting G2 k to G1 k"
            );
            c2.k = c1.k;
            c2 = c2.validated("G2")?;
        }
        Ok(Self { c_a, c1, c2 })
    }

    /// Write params.txt in its ordered `key value` schema.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = format!(
            "H_A_n {}\nH_A_k {}\nH_A_d {}\nG1_n {}\nG1_k {}\nG1_d {}\nG2_n {}\nG2_k {}\nG2_d {}\n",
            self.c_a.n,
            self.c_a.k,
            self.c_a.d,
            self.c1.n,
            self.c1.k,
            self.c1.d,
            self.c2.n,
            self.c2.k,
            self.c2.d,
        );
        fs::write(path, text).map_err(|e| Error::io(path, e))
    }
}

fn malformed(path: &Path, detail: String) -> Error {
    Error::MalformedParams {
        path: path.to_path_buf(),
        detail,
    }
}
