//! Shape checks for the contact fields.
//!
//! Both predicates are deliberately permissive: they only look at the shape of
//! the input and never try to reach a mail server or a phone carrier.

use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for contact details
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$").unwrap());
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\+?[0-9]{1,4}?[\-.\t\n\x0B\x0C\r ]?\(?[0-9]{1,3}?\)?[\-.\t\n\x0B\x0C\r ]?[0-9]{1,4}[\-.\t\n\x0B\x0C\r ]?[0-9]{1,4}[\-.\t\n\x0B\x0C\r ]?[0-9]{1,9}$",
    )
    .unwrap()
});

/// Check that `email` looks like `local-part@label.tld`.
///
/// # Examples
/// ```
/// use marathon_form::validators::is_valid_email;
/// assert!(is_valid_email("a@b.co"));
/// assert!(!is_valid_email("a@b"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check that `phone` looks like an internationally dialled number,
/// e.g. `+48 123 456 789` or `(555) 123-4567`.
pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("a.b-c@sub.domain.org"));
        assert!(is_valid_email("runner_42@marathon.info"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b.toolong"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone_number("+48 123 456 789"));
        assert!(is_valid_phone_number("+48-123-456-789"));
        assert!(is_valid_phone_number("123456789"));
        assert!(is_valid_phone_number("1 (555) 123-4567"));
        assert!(!is_valid_phone_number("abc"));
        assert!(!is_valid_phone_number("+48\u{a0}123\u{a0}456\u{a0}789"));
        assert!(!is_valid_phone_number("+48 abc 456"));
        assert!(!is_valid_phone_number(""));
    }
}
