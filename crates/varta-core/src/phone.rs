//! Phone number normalization.

/// Prepares a phone number for submission.
///
/// Surrounding whitespace is trimmed and exactly one leading `+` is removed.
/// Everything else is passed through untouched; the backend owns validation.
///
/// ```
/// use varta_core::normalize_phone;
///
/// assert_eq!(normalize_phone(" +919876543210 "), "919876543210");
/// assert_eq!(normalize_phone("++1"), "+1");
/// ```
#[must_use]
pub fn normalize_phone(input: &str) -> String {
    let trimmed = input.trim();
    trimmed.strip_prefix('+').unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn strips_single_plus() {
        assert_eq!(normalize_phone("+1234567890"), "1234567890");
        assert_eq!(normalize_phone("1234567890"), "1234567890");
        assert_eq!(normalize_phone("++44"), "+44");
    }

    #[test]
    fn keeps_inner_characters() {
        assert_eq!(normalize_phone("+1 (555) 010-2000"), "1 (555) 010-2000");
        assert_eq!(normalize_phone("12+34"), "12+34");
    }

    #[test]
    fn blank_stays_blank() {
        assert_eq!(normalize_phone("   "), "");
        assert_eq!(normalize_phone("+"), "");
    }

    proptest! {
        #[test]
        fn strips_exactly_one_plus(body in "[0-9+()\\-]{0,8}[0-9]{1,12}") {
            prop_assert_eq!(normalize_phone(&format!("+{body}")), body.clone());
        }

        #[test]
        fn plus_free_input_is_unchanged(body in "[0-9][0-9 ()\\-]{0,15}[0-9]") {
            prop_assert_eq!(normalize_phone(&body), body);
        }
    }
}
