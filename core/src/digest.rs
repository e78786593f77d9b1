//! Message normalization and the binary hash vector

use gf2_primitives::gf2::BinaryMatrix;

/// Truncate or zero-pad a message to exactly `len` bytes.
pub fn normalize_message(message: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let take = message.len().min(len);
    out[..take].copy_from_slice(&message[..take]);
    out
}

/// Hash a message to a `1 x len` row vector over GF(2).
///
/// One bit per normalized byte: the byte's parity.
pub fn message_digest(message: &[u8], len: usize) -> BinaryMatrix {
    let normalized = normalize_message(message, len);
    let mut s = BinaryMatrix::zeros(1, len);
    for (i, byte) in normalized.iter().enumerate() {
        s.set(0, i, byte & 1);
    }
    s
}
