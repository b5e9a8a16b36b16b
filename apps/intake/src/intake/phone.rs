use once_cell::sync::Lazy;
use regex::Regex;

/// Leading digit sequences of numbers inside the service region.
pub const REGION_PREFIXES: &[&str] = &["375", "8029", "8044", "8033", "8025"];

/// Shortest digit string accepted as a phone number.
pub const MIN_PHONE_DIGITS: usize = 9;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// Returns true when `phone`, reduced to its digits, starts with a region prefix
/// and has at least `MIN_PHONE_DIGITS` digits.
///
/// Punctuation is dropped before the prefix check, so `+375 (29) 123-45-67` and
/// `375291234567` are equivalent.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = NON_DIGIT.replace_all(phone, "");
    REGION_PREFIXES
        .iter()
        .any(|prefix| digits.starts_with(prefix))
        && digits.chars().count() >= MIN_PHONE_DIGITS
}
