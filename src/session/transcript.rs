use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, MessageRole};

/// The role-tagged history of one chat session
///
/// Seeded with a single system entry; every later entry is appended in
/// arrival order and never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<ChatMessage>,
}

impl Transcript {
    /// Create a transcript seeded with the system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            entries: vec![ChatMessage::new(MessageRole::System, system_prompt)],
        }
    }

    /// Append a user entry
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries
            .push(ChatMessage::new(MessageRole::User, content));
    }

    /// Append an assistant entry
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries
            .push(ChatMessage::new(MessageRole::Assistant, content));
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_the_system_seed() {
        let transcript = Transcript::new("You are a helpful assistant.");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].role, MessageRole::System);
        assert_eq!(transcript.entries()[0].content, "You are a helpful assistant.");
    }

    #[test]
    fn test_entries_keep_arrival_order() {
        let mut transcript = Transcript::new("seed");
        transcript.push_user("How many orders?");
        transcript.push_assistant("120");
        transcript.push_user("And last year?");

        let roles: Vec<MessageRole> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
            ]
        );
        assert_eq!(transcript.last().unwrap().content, "And last year?");
    }
}
