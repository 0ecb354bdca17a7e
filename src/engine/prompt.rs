use crate::dataset::AnnotatedTable;
use crate::models::{ChatMessage, MessageRole};

/// Instructions sent ahead of every delegated question
const ANALYST_INSTRUCTIONS: &str = "You are a data analyst answering questions about one table. \
Use only the data provided below. Reply with just the answer: a bare number when the question \
asks for one, a Markdown table for list-shaped results, otherwise one short sentence. \
Do not explain your reasoning.";

/// Build the two-message prompt for one delegated question
pub fn build_messages(
    table: &AnnotatedTable,
    preview_rows: usize,
    question: &str,
) -> Vec<ChatMessage> {
    let system = format!(
        "{}\n\n{}",
        ANALYST_INSTRUCTIONS,
        table.to_prompt_context(preview_rows)
    );
    vec![
        ChatMessage::new(MessageRole::System, system),
        ChatMessage::new(MessageRole::User, question),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{annotate, FieldDescriptions, Table};
    use std::sync::Arc;

    fn sample() -> AnnotatedTable {
        let table = Table::new(
            vec!["product_name".to_string(), "order_quantity".to_string()],
            vec![],
        );
        let descriptions = Arc::new(FieldDescriptions::from_pairs([(
            "product_name",
            "Name of the product sold",
        )]));
        annotate(table, descriptions)
    }

    #[test]
    fn test_prompt_carries_context_and_question() {
        let messages = build_messages(&sample(), 5, "How many orders were placed?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("data analyst"));
        assert!(messages[0].content.contains("product_name: Name of the product sold"));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "How many orders were placed?");
    }
}
