//! Opaque session-token generation.

use rand::RngCore;

/// Raw token length in bytes before hex encoding (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random opaque session token.
///
/// The result is a 64-character hex string used only as a lookup key; it
/// carries no decodable structure.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}
