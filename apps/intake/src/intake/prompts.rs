// Intake LLM prompt template.
// The model must answer with four lines in a fixed order; `fields::extract_fields`
// relies on the comment label below.

pub const ORDER_EXTRACTION_PROMPT: &str = r#"
Ты помощник службы доставки. Из текста заявки извлеки:

1. Временной интервал доставки (или фразу: "в ближайшее время", "как можно скорее")
2. Адрес с номером дома
3. Номер телефона
4. Комментарий заказчика (если есть)

Формат ответа:
[временной интервал]
[адрес]
[номер телефона]
Комментарий заказчика: [если есть]

Вот заявка:
{text}
"#;

pub fn build_extraction_prompt(raw_text: &str) -> String {
    ORDER_EXTRACTION_PROMPT.replace("{text}", raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::fields::COMMENT_LABEL;

    #[test]
    fn test_raw_text_is_substituted() {
        let prompt = build_extraction_prompt("Ленина 5, к 14:00, +375291234567");
        assert!(prompt.contains("Вот заявка:\nЛенина 5, к 14:00, +375291234567\n"));
        assert!(!prompt.contains("{text}"));
    }

    #[test]
    fn test_prompt_asks_for_comment_label_the_parser_expects() {
        assert!(ORDER_EXTRACTION_PROMPT.contains(&format!("{COMMENT_LABEL} [если есть]")));
    }
}
