//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates phone number format.
///
/// Requirements:
/// - Only digits, spaces, plus, dashes, parentheses
/// - 7-20 characters in length
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() < 7 || phone.len() > 20 {
        return Err(ValidationError::new("phone_invalid_length"));
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(ValidationError::new("phone_invalid_characters"));
    }

    Ok(())
}

/// Validates a display name.
///
/// Requirements:
/// - Non-blank
/// - 1-100 characters in length
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err(ValidationError::new("name_invalid_length"));
    }
    Ok(())
}

/// Email check for the dispatch path, which validates contact lists by hand
/// rather than through derive.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 255 {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if local.chars().any(char::is_whitespace) || domain.chars().any(char::is_whitespace) {
        return false;
    }
    // Domain needs at least one dot with something on both sides.
    match domain.rsplit_once('.') {
        Some((head, tld)) => !head.is_empty() && !tld.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_rejects_too_short() {
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn phone_rejects_letters() {
        assert!(validate_phone("0821234x56").is_err());
    }

    #[test]
    fn phone_accepts_formatted_numbers() {
        assert!(validate_phone("+27 (82) 555-0101").is_ok());
        assert!(validate_phone("0821234567").is_ok());
    }

    #[test]
    fn name_rejects_blank() {
        assert!(validate_person_name("   ").is_err());
    }

    #[test]
    fn name_rejects_over_length() {
        assert!(validate_person_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn email_check_matches_expected_shapes() {
        assert!(is_valid_email("gran@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co.za"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }
}
