//! Field extraction: turns the model's normalized four-line answer into slots.
//!
//! Each line lands in exactly one slot. Rules are checked in a fixed order
//! (interval, comment, phone, address) and a later line overwrites an earlier
//! one in the same slot.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label the prompt asks the model to put in front of the customer comment.
pub const COMMENT_LABEL: &str = "Комментарий заказчика:";

const ASAP_MARKERS: &[&str] = &["ближайшее", "как можно скорее"];

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("valid regex"));
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d{7,}").expect("valid regex"));
static NON_PHONE_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d+]").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub interval: String,
    pub address: String,
    pub phone: String,
    pub comment: String,
}

pub fn extract_fields(normalized_text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for line in normalized_text.trim().split('\n') {
        let line = line.trim();

        if is_interval_line(line) {
            fields.interval = line.to_string();
        } else if let Some(comment) = comment_after_label(line) {
            fields.comment = comment.to_string();
        } else if PHONE_PATTERN.is_match(line) {
            fields.phone = normalize_phone(line);
        } else {
            fields.address = line.to_string();
        }
    }

    fields
}

fn is_interval_line(line: &str) -> bool {
    if TIME_PATTERN.is_match(line) {
        return true;
    }
    let lower = line.to_lowercase();
    ASAP_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Text after the last occurrence of the comment label, if the label is present.
fn comment_after_label(line: &str) -> Option<&str> {
    line.rfind(COMMENT_LABEL)
        .map(|idx| line[idx + COMMENT_LABEL.len()..].trim())
}

/// Keeps digits (any script, same `\d` as the phone rule), plus a `+` only
/// when it is the first kept character.
fn normalize_phone(line: &str) -> String {
    let kept = NON_PHONE_CHAR.replace_all(line, "");
    let mut phone = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c != '+' || phone.is_empty() {
            phone.push(c);
        }
    }
    phone
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str =
        "с 14:00 до 16:00\nул. Ленина 5\n+375291234567\nКомментарий заказчика: домофон 5";

    #[test]
    fn test_well_formed_answer_fills_all_slots() {
        let fields = extract_fields(WELL_FORMED);
        assert_eq!(
            fields,
            ExtractedFields {
                interval: "с 14:00 до 16:00".to_string(),
                address: "ул. Ленина 5".to_string(),
                phone: "+375291234567".to_string(),
                comment: "домофон 5".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_input_yields_empty_fields() {
        assert_eq!(extract_fields(""), ExtractedFields::default());
        assert_eq!(extract_fields("   \n  "), ExtractedFields::default());
    }

    #[test]
    fn test_asap_phrases_are_intervals() {
        assert_eq!(
            extract_fields("В ближайшее время").interval,
            "В ближайшее время"
        );
        assert_eq!(
            extract_fields("КАК МОЖНО СКОРЕЕ").interval,
            "КАК МОЖНО СКОРЕЕ"
        );
    }

    #[test]
    fn test_single_digit_hour_is_interval() {
        assert_eq!(extract_fields("к 9:30").interval, "к 9:30");
    }

    #[test]
    fn test_last_interval_line_wins() {
        let fields = extract_fields("10:00-12:00\n15:00-17:00");
        assert_eq!(fields.interval, "15:00-17:00");
        assert!(fields.address.is_empty());
    }

    #[test]
    fn test_interval_rule_beats_phone_rule() {
        let fields = extract_fields("14:00 +375291234567");
        assert_eq!(fields.interval, "14:00 +375291234567");
        assert!(fields.phone.is_empty());
    }

    #[test]
    fn test_comment_rule_beats_phone_rule() {
        let fields = extract_fields("Комментарий заказчика: звонить на 80291234567");
        assert_eq!(fields.comment, "звонить на 80291234567");
        assert!(fields.phone.is_empty());
    }

    #[test]
    fn test_comment_uses_text_after_last_label() {
        let fields =
            extract_fields("Комментарий заказчика: a Комментарий заказчика:  домофон не работает ");
        assert_eq!(fields.comment, "домофон не работает");
    }

    #[test]
    fn test_empty_comment_label() {
        let fields = extract_fields("Комментарий заказчика:");
        assert_eq!(fields.comment, "");
    }

    #[test]
    fn test_phone_is_stripped_to_digits_and_leading_plus() {
        let fields = extract_fields("Тел: +375 (29) 1234567");
        assert_eq!(fields.phone, "+375291234567");
    }

    #[test]
    fn test_phone_without_plus() {
        assert_eq!(extract_fields("80291234567").phone, "80291234567");
    }

    #[test]
    fn test_fullwidth_digits_survive_phone_normalization() {
        let fields = extract_fields("14:00\nул. Ленина 5\n３７５２９１２３４５６７");
        assert_eq!(fields.phone, "３７５２９１２３４５６７");
    }

    #[test]
    fn test_inner_plus_signs_are_dropped() {
        assert_eq!(extract_fields("+375+29+1234567").phone, "+375291234567");
    }

    #[test]
    fn test_short_digit_run_is_not_a_phone() {
        let fields = extract_fields("ул. Ленина 123456");
        assert!(fields.phone.is_empty());
        assert_eq!(fields.address, "ул. Ленина 123456");
    }

    #[test]
    fn test_last_unmatched_line_becomes_address() {
        let fields = extract_fields("г. Минск\nпр. Независимости 4");
        assert_eq!(fields.address, "пр. Независимости 4");
    }

    #[test]
    fn test_blank_line_overwrites_address() {
        let fields = extract_fields("ул. Ленина 5\n\n+375291234567");
        assert_eq!(fields.address, "");
        assert_eq!(fields.phone, "+375291234567");
    }

    #[test]
    fn test_lines_are_trimmed() {
        let fields = extract_fields("  \r\n  ул. Ленина 5 \r\n");
        assert_eq!(fields.address, "ул. Ленина 5");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract_fields(WELL_FORMED), extract_fields(WELL_FORMED));
    }
}
