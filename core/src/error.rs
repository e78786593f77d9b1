//! Scheme-wide error taxonomy
//!
//! A cryptographic reject is not represented here: verification returns a
//! [`crate::verifier::Verdict`] value. Errors are reserved for bad
//! configuration and unreadable or corrupt inputs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Code parameters failed the entry check.
    #[error("invalid {name} parameters: n must exceed both k and d (n={n}, k={k}, d={d})")]
    InvalidParams {
        name: &'static str,
        n: u32,
        k: u32,
        d: u32,
    },

    /// The parameter file exists but does not follow its schema.
    #[error("parameter file {path}: {detail}")]
    MalformedParams { path: PathBuf, detail: String },

    /// File I/O failure, with the offending path attached.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required input matrix file parsed wrong or has the wrong shape.
    ///
    /// Cache entries never produce this; they degrade to misses. Only the
    /// signing artifacts a caller explicitly hands back in (public key,
    /// signature) are load-or-die.
    #[error("matrix file {path} is corrupt: {detail}")]
    CorruptMatrix { path: PathBuf, detail: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
