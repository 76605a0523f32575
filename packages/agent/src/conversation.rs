//! Conversation history as an immutable, append-only turn sequence.
//!
//! A [`Conversation`] is never mutated in place: extending it returns a new
//! value, so history can be snapshotted, replayed, or truncated
//! deterministically. The system prompt is not part of history; it is
//! prepended per request. Tool-call exchanges stay local to the turn that
//! produced them; history carries only user and final assistant turns.

use openai_client::ChatMessage;

/// An ordered, append-only sequence of conversation turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The turns so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no turns yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// A new conversation with one more turn appended.
    pub fn with_message(&self, message: ChatMessage) -> Self {
        let mut messages = self.messages.clone();
        messages.push(message);
        Self { messages }
    }

    /// A new conversation keeping only the most recent `n` turns.
    pub fn truncated_to(&self, n: usize) -> Self {
        let start = self.messages.len().saturating_sub(n);
        Self {
            messages: self.messages[start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appending_leaves_the_original_untouched() {
        let empty = Conversation::new();
        let one = empty.with_message(ChatMessage::user("hello"));

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(one.messages()[0].content.as_deref(), Some("hello"));
    }

    #[test]
    fn turns_keep_their_order() {
        let conversation = Conversation::new()
            .with_message(ChatMessage::user("first"))
            .with_message(ChatMessage::assistant("second"))
            .with_message(ChatMessage::user("third"));

        let roles: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
    }

    #[test]
    fn truncation_keeps_the_most_recent_turns() {
        let conversation = Conversation::new()
            .with_message(ChatMessage::user("a"))
            .with_message(ChatMessage::assistant("b"))
            .with_message(ChatMessage::user("c"));

        let truncated = conversation.truncated_to(2);
        assert_eq!(truncated.len(), 2);
        assert_eq!(truncated.messages()[0].content.as_deref(), Some("b"));

        // Truncating beyond the length is a no-op.
        assert_eq!(conversation.truncated_to(10), conversation);
    }
}
