pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    password_confirm: &str,
) -> Result<(), String> {
    if username.trim().len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if !email.contains('@') {
        return Err("Enter a valid email address".to_string());
    }
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password != password_confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_fields() {
        assert!(validate_credentials("ada", "secret").is_ok());
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("ada", "").is_err());
        assert!(validate_credentials("   ", "secret").is_err());
    }

    #[test]
    fn registration_rejects_weak_input() {
        assert!(validate_registration("ada", "ada@example.com", "longenough", "longenough").is_ok());
        assert!(validate_registration("ab", "ada@example.com", "longenough", "longenough").is_err());
        assert!(validate_registration("ada", "not-an-email", "longenough", "longenough").is_err());
        assert!(validate_registration("ada", "ada@example.com", "short", "short").is_err());
        assert!(
            validate_registration("ada", "ada@example.com", "longenough", "different").is_err()
        );
    }

    #[test]
    fn blank_optional_fields_become_none() {
        assert_eq!(normalize_optional("  "), None);
        assert_eq!(normalize_optional(" +49151 "), Some("+49151".to_string()));
    }
}
