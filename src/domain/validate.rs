//! Pure validation helpers for front-end-collected fields.

/// Normalizes a raw phone string to `+<countrycode><subscriber>` with no
/// separators. Returns `None` when the input is not a valid number.
///
/// All non-digit characters are stripped first. An 11-digit number with
/// a leading trunk `8` is rewritten to the `7` country code before the
/// final check.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11
        && let Some(rest) = digits.strip_prefix('8')
    {
        digits = format!("7{rest}");
    }
    if digits.len() == 11 && digits.starts_with('7') {
        Some(format!("+{digits}"))
    } else {
        None
    }
}

/// Returns `true` when `name` is a displayable booking name:
/// 2 to 50 characters of letters, digits, underscores, spaces, or hyphens.
#[must_use]
pub fn valid_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(2..=50).contains(&len) {
        return false;
    }
    name.chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_plus_seven() {
        assert_eq!(
            normalize_phone("+79001234567"),
            Some("+79001234567".to_string())
        );
    }

    #[test]
    fn phone_rewrites_trunk_eight() {
        assert_eq!(
            normalize_phone("89001234567"),
            Some("+79001234567".to_string())
        );
    }

    #[test]
    fn phone_strips_separators() {
        assert_eq!(
            normalize_phone("8 (900) 123-45-67"),
            Some("+79001234567".to_string())
        );
    }

    #[test]
    fn phone_rejects_wrong_length_or_prefix() {
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("+19001234567"), None);
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("not a phone"), None);
    }

    #[test]
    fn name_accepts_letters_spaces_hyphens() {
        assert!(valid_name("Ivan"));
        assert!(valid_name("Anna-Maria Petrova"));
        assert!(valid_name("Иван"));
    }

    #[test]
    fn name_rejects_bad_lengths_and_symbols() {
        assert!(!valid_name("I"));
        assert!(!valid_name(&"x".repeat(51)));
        assert!(!valid_name("Ivan!"));
        assert!(!valid_name("<script>"));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        // 50 Cyrillic characters are 100 bytes but still a valid name.
        assert!(valid_name(&"й".repeat(50)));
    }
}
