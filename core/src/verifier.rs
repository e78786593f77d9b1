//! Signature verification

use gf2_primitives::gf2::BinaryMatrix;
use tracing::debug;

/// Outcome of a verification. A reject is a result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Verdict plus the two syndrome sides, for the report.
pub struct Verification {
    pub verdict: Verdict,
    /// `F * hash^T`
    pub lhs: BinaryMatrix,
    /// `H_A * sigma^T`
    pub rhs: BinaryMatrix,
}

/// Check `H_A * sigma^T == F * hash^T`.
///
/// No weight check is performed; the signature's weight never enters the
/// decision.
pub fn verify(
    digest: &BinaryMatrix,
    signature: &BinaryMatrix,
    public_key: &BinaryMatrix,
    h_a: &BinaryMatrix,
) -> Verification {
    assert_eq!(digest.rows(), 1, "hash vector must be a row vector");
    assert_eq!(signature.rows(), 1, "signature must be a row vector");
    assert_eq!(
        public_key.cols(),
        digest.cols(),
        "public key width must equal the hash length"
    );
    assert_eq!(
        h_a.cols(),
        signature.cols(),
        "H_A width must equal the signature length"
    );

    let lhs = public_key.mul(&digest.transpose());
    let rhs = h_a.mul(&signature.transpose());
    let verdict = if lhs == rhs {
        Verdict::Accept
    } else {
        Verdict::Reject
    };
    debug!(?verdict, "syndrome comparison");

    Verification { verdict, lhs, rhs }
}
