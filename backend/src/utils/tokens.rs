//! Share-token generation.
//!
//! A share token is a bearer capability: whoever holds it can read the
//! session's location stream. 32 bytes of OS randomness, URL-safe base64.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

const TOKEN_BYTES: usize = 32;

pub fn generate_share_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_are_url_safe_and_fixed_length() {
        let token = generate_share_token();
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn tokens_do_not_collide_in_practice() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_share_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
