//! Opaque random tokens for CSRF state and durable sessions.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes behind every token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Generates a URL-safe token from [`TOKEN_BYTES`] of OS randomness.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_url_safe_and_full_length() {
        let token = generate_token();
        // 32 bytes -> 43 unpadded base64 characters
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        let decoded = URL_SAFE_NO_PAD.decode(&token).expect("decode");
        assert_eq!(decoded.len(), TOKEN_BYTES);
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate_token(), generate_token());
    }
}
