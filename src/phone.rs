//! Omani phone number mask.
//!
//! The field always displays `+968 XXXX XXXX`. Only the first eight
//! subscriber digits are kept.

/// Country prefix the mask writes in front of the subscriber number.
pub const COUNTRY_PREFIX: &str = "+968";

/// Subscriber digits the mask displays.
pub const SUBSCRIBER_DIGITS: usize = 8;

const GROUP: usize = 4;

/// Digits of the subscriber number, ignoring the mask's own prefix.
pub fn subscriber_digits(input: &str) -> String {
    let trimmed = input.trim_start();
    let rest = trimmed.strip_prefix(COUNTRY_PREFIX).unwrap_or(trimmed);
    rest.chars().filter(char::is_ascii_digit).collect()
}

/// Number of ASCII digits anywhere in `input`, the mask prefix included.
pub fn digit_count(input: &str) -> usize {
    input.chars().filter(char::is_ascii_digit).count()
}

/// Reformat raw field contents into the display mask.
///
/// Returns an empty string when no digits remain.
pub fn format_phone(input: &str) -> String {
    let digits: String = subscriber_digits(input)
        .chars()
        .take(SUBSCRIBER_DIGITS)
        .collect();
    if digits.is_empty() {
        return String::new();
    }
    let (first, second) = digits.split_at(digits.len().min(GROUP));
    format!("{COUNTRY_PREFIX} {first} {second}")
}
