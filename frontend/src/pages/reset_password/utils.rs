/// Reset tokens travel as `{id}.{secret}`. Anything without exactly one dot
/// separating two non-empty halves is rejected before a request is made.
pub fn looks_like_reset_token(token: &str) -> bool {
    match token.split_once('.') {
        Some((id, secret)) => !id.is_empty() && !secret.is_empty() && !secret.contains('.'),
        None => false,
    }
}

pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_shape_is_id_dot_secret() {
        assert!(looks_like_reset_token("abc123.def456"));
        assert!(!looks_like_reset_token("nodot"));
        assert!(!looks_like_reset_token(".secret"));
        assert!(!looks_like_reset_token("id."));
        assert!(!looks_like_reset_token("a.b.c"));
    }

    #[test]
    fn new_password_must_be_long_and_matching() {
        assert!(validate_new_password("longenough", "longenough").is_ok());
        assert!(validate_new_password("short", "short").is_err());
        assert!(validate_new_password("longenough", "different").is_err());
    }
}
