//! Signature generation
//!
//! A signature is the outer codeword `(s*G1 || s*G2)` for the hashed
//! message `s`. Its syndrome under `H_A` equals `F * s^T` by construction,
//! which is exactly what the verifier checks.

use gf2_primitives::gf2::BinaryMatrix;
use tracing::debug;

use crate::digest::message_digest;
use crate::params::SchemeParams;

/// Everything a sign produces: the hash vector, the public key and the
/// signature.
pub struct SignOutput {
    /// `1 x k_A` hash vector.
    pub digest: BinaryMatrix,
    /// `F = H_A * G*^T`, shape `(n_A - k_A) x k_A`.
    pub public_key: BinaryMatrix,
    /// `1 x n_A` signature.
    pub signature: BinaryMatrix,
}

/// Sign a message under the key triple.
pub fn sign(
    message: &[u8],
    params: &SchemeParams,
    h_a: &BinaryMatrix,
    g1: &BinaryMatrix,
    g2: &BinaryMatrix,
) -> SignOutput {
    let k_a = params.c_a.k as usize;
    assert_eq!(g1.rows(), k_a, "G1 row count must equal the message length");
    assert_eq!(g2.rows(), k_a, "G2 row count must equal the message length");
    assert_eq!(
        h_a.cols(),
        g1.cols() + g2.cols(),
        "H_A must cover both inner codes"
    );
    assert_eq!(
        h_a.rows(),
        params.c_a.redundancy() as usize,
        "H_A row count must equal n_A - k_A"
    );

    let s = message_digest(message, k_a);

    // the outer codeword: both inner encodings, juxtaposed
    let c1 = s.mul(g1);
    let c2 = s.mul(g2);
    let signature = c1.hstack(&c2);

    // F = H_A * G*^T with G*^T = [G1^T over G2^T]
    let g_star_t = g1.transpose().vstack(&g2.transpose());
    let public_key = h_a.mul(&g_star_t);

    debug!(
        weight = signature.weight(),
        d_a = params.c_a.d,
        "signature weight (not enforced)"
    );

    SignOutput {
        digest: s,
        public_key,
        signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matgen::{matrix_from_seed, MatrixKind, Seed};

    fn test_keys(params: &SchemeParams) -> (BinaryMatrix, BinaryMatrix, BinaryMatrix) {
        let seed = Seed::from_bytes([0u8; 32]);
        let h_a = matrix_from_seed(MatrixKind::ParityCheck, params.c_a, &seed);
        let g1 = matrix_from_seed(MatrixKind::Generator, params.c1, &seed);
        let g2 = matrix_from_seed(MatrixKind::Generator, params.c2, &seed);
        (h_a, g1, g2)
    }

    #[test]
    fn test_signature_is_the_concatenated_codeword() {
        let params = SchemeParams::from_bch(3, 1).unwrap();
        let (h_a, g1, g2) = test_keys(&params);

        // digest of "A" is (1, 0, 0), so both encodings are generator row 0
        let out = sign(b"A", &params, &h_a, &g1, &g2);
        assert_eq!(out.signature.cols(), 14);
        for c in 0..7 {
            assert_eq!(out.signature.get(0, c), g1.get(0, c));
            assert_eq!(out.signature.get(0, 7 + c), g2.get(0, c));
        }
    }

    #[test]
    fn test_empty_message_signs_to_zero() {
        let params = SchemeParams::from_bch(3, 1).unwrap();
        let (h_a, g1, g2) = test_keys(&params);

        let out = sign(b"", &params, &h_a, &g1, &g2);
        assert_eq!(out.digest.weight(), 0);
        assert_eq!(out.signature.weight(), 0);
    }

    #[test]
    fn test_public_key_matches_the_block_formula() {
        // F == H_A^(1) * G1^T + H_A^(2) * G2^T, the two column blocks of H_A
        let params = SchemeParams::from_bch(3, 1).unwrap();
        let (h_a, g1, g2) = test_keys(&params);
        let out = sign(b"A", &params, &h_a, &g1, &g2);

        let n1 = params.c1.n as usize;
        let left = column_block(&h_a, 0, n1);
        let right = column_block(&h_a, n1, h_a.cols());
        let expected = left
            .mul(&g1.transpose())
            .add(&right.mul(&g2.transpose()));
        assert_eq!(out.public_key, expected);
    }

    fn column_block(m: &BinaryMatrix, from: usize, to: usize) -> BinaryMatrix {
        let mut out = BinaryMatrix::zeros(m.rows(), to - from);
        for row in 0..m.rows() {
            for col in from..to {
                out.set(row, col - from, m.get(row, col));
            }
        }
        out
    }
}
