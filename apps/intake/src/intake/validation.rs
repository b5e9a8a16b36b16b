//! Order validation: decides accept / reject for a set of extracted fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intake::fields::ExtractedFields;
use crate::intake::phone::is_valid_phone;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));

/// A required slot that could not be found. Variant order is the order
/// the slots are checked and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Address,
    Interval,
    Phone,
}

impl MissingField {
    pub fn display_name(&self) -> &'static str {
        match self {
            MissingField::Address => "адрес с номером дома",
            MissingField::Interval => "временной интервал",
            MissingField::Phone => "номер телефона",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted {
        interval: String,
        address: String,
        phone: String,
        comment: String,
    },
    RejectedMissingFields {
        missing: Vec<MissingField>,
    },
    RejectedInvalidPhone,
    /// The extraction call failed; fields were never parsed.
    ExtractionFailed {
        cause: String,
    },
}

impl ValidationOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationOutcome::Accepted { .. } => "accepted",
            ValidationOutcome::RejectedMissingFields { .. } => "rejected_missing_fields",
            ValidationOutcome::RejectedInvalidPhone => "rejected_invalid_phone",
            ValidationOutcome::ExtractionFailed { .. } => "extraction_failed",
        }
    }
}

/// Applies the intake rules in order:
///
/// 1. Collect missing slots: address (empty or without a house number), interval, phone.
/// 2. A present but out-of-region phone rejects the order, even if other slots are missing.
/// 3. Any missing slot rejects the order with the list of missing slots.
/// 4. Otherwise the order is accepted.
pub fn validate(fields: &ExtractedFields) -> ValidationOutcome {
    let mut missing = Vec::new();
    if fields.address.is_empty() || !DIGIT.is_match(&fields.address) {
        missing.push(MissingField::Address);
    }
    if fields.interval.is_empty() {
        missing.push(MissingField::Interval);
    }
    if fields.phone.is_empty() {
        missing.push(MissingField::Phone);
    } else if !is_valid_phone(&fields.phone) {
        return ValidationOutcome::RejectedInvalidPhone;
    }

    if !missing.is_empty() {
        return ValidationOutcome::RejectedMissingFields { missing };
    }

    ValidationOutcome::Accepted {
        interval: fields.interval.clone(),
        address: fields.address.clone(),
        phone: fields.phone.clone(),
        comment: fields.comment.clone(),
    }
}
