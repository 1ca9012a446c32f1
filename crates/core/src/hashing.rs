//! Digest helpers shared by the OTP engine and session token handling.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Constant-time equality of two digests.
///
/// A length mismatch returns early (digest lengths are not secret); digests
/// of equal length are compared without a per-byte early exit.
pub fn digest_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
