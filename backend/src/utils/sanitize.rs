//! Free-text sanitization for values interpolated into notification bodies.

const MAX_LEN: usize = 100;

/// Strips characters with meaning in HTML/markup (`< > " ' &`), trims
/// whitespace, and caps length. Applied to every free-text field before it
/// reaches a message template.
pub fn sanitize_text(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect();
    let trimmed = cleaned.trim();
    trimmed.chars().take(MAX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_characters() {
        assert_eq!(
            sanitize_text("<script>alert('x')</script>"),
            "scriptalert(x)/script"
        );
        assert_eq!(sanitize_text("Tom & \"Jerry\""), "Tom  Jerry");
    }

    #[test]
    fn no_markup_character_survives() {
        let out = sanitize_text("a<b>c\"d'e&f");
        for forbidden in ['<', '>', '"', '\'', '&'] {
            assert!(!out.contains(forbidden), "{} leaked through", forbidden);
        }
    }

    #[test]
    fn trims_and_caps_length() {
        assert_eq!(sanitize_text("  padded  "), "padded");
        let long = "x".repeat(500);
        assert_eq!(sanitize_text(&long).len(), 100);
    }

    #[test]
    fn plain_names_pass_unchanged() {
        assert_eq!(sanitize_text("Thandi Mokoena"), "Thandi Mokoena");
    }
}
