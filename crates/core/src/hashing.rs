//! Shared SHA-256 hex digest utility.
//!
//! Used to fingerprint compiled prompt text so cached copies can be compared
//! without storing the full text twice.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
