//! Content hashing for merge proofs
//!
//! Proof records carry the SHA-256 of the merged document's UTF-8 bytes,
//! hex-encoded. External verifiers recompute this independently, so the
//! encoding is fixed here and nowhere else.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of a blob
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}
