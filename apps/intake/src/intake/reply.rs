//! User-facing reply texts, one per outcome.

use crate::intake::validation::{MissingField, ValidationOutcome};

pub const INVALID_PHONE_REPLY: &str = "🚫 Заказ не принят в работу! Причина: номер получателя не соответствует региону деятельности службы доставки. \
Пожалуйста, пришлите корректный номер телефона в формате +375XXXXXXXXX или своими силами обеспечьте связь водителя с получателем.";

pub const MISSING_FIELDS_REPLY: &str = "🚫 Заказ не принят в работу! Причина: Не хватает данных для осуществления доставки. \
Пожалуйста, уточните данные и пришлите заявку повторно.";

pub const EXTRACTION_FAILED_REPLY: &str = "⚠️ Ошибка при обработке заявки. Попробуйте ещё раз.";

/// Shown instead of an empty customer comment.
const NO_COMMENT: &str = "—";

pub fn render(outcome: &ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Accepted {
            interval,
            address,
            phone,
            comment,
        } => {
            let comment = if comment.is_empty() {
                NO_COMMENT
            } else {
                comment.as_str()
            };
            format!(
                "✅ Заказ принят в работу:\n{interval}\n{address}\n{phone}\nКомментарий заказчика: {comment}"
            )
        }
        ValidationOutcome::RejectedMissingFields { missing } => {
            format!("{MISSING_FIELDS_REPLY}\n\nНе хватает: {}", join_names(missing))
        }
        ValidationOutcome::RejectedInvalidPhone => INVALID_PHONE_REPLY.to_string(),
        ValidationOutcome::ExtractionFailed { .. } => EXTRACTION_FAILED_REPLY.to_string(),
    }
}

fn join_names(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(MissingField::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}
