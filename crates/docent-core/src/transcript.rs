//! Chat transcript types.
//!
//! This module contains types for representing the exchanged turns of one
//! chat session, including roles and message content.

use serde::{Deserialize, Serialize};

/// Represents the role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Question typed by the user.
    User,
    /// Answer (or greeting) from the assistant.
    Assistant,
    /// Classified failure surfaced to the user.
    SystemError,
}

/// A single turn in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub text: String,
    /// Timestamp when the entry was created (RFC 3339).
    pub timestamp: String,
}

impl TranscriptEntry {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn system_error(text: impl Into<String>) -> Self {
        Self::new(MessageRole::SystemError, text)
    }
}

/// Greeting that opens every session.
pub fn greeting(group_name: &str, document_count: usize) -> String {
    format!(
        "مرحباً! أنا مساعدك الدراسي لمجموعة \"{}\". لقد قمت بتحليل {} ملفات. كيف يمكنني مساعدتك؟",
        group_name, document_count
    )
}

/// Ordered, append-only history of one chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a transcript whose first entry greets the user for `group_name`.
    pub fn opened_for(group_name: &str, document_count: usize) -> Self {
        let mut transcript = Self::new();
        transcript.append(TranscriptEntry::assistant(greeting(group_name, document_count)));
        transcript
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Called when the user leaves the group.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opened_transcript_starts_with_greeting() {
        let transcript = Transcript::opened_for("Algorithms", 2);

        assert_eq!(transcript.len(), 1);
        let first = &transcript.entries()[0];
        assert_eq!(first.role, MessageRole::Assistant);
        assert!(first.text.contains("\"Algorithms\""));
        assert!(first.text.contains('2'));
    }

    #[test]
    fn test_append_keeps_order_and_reset_clears() {
        let mut transcript = Transcript::opened_for("Algorithms", 1);
        transcript.append(TranscriptEntry::user("q"));
        transcript.append(TranscriptEntry::system_error("e"));

        let roles: Vec<MessageRole> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::Assistant, MessageRole::User, MessageRole::SystemError]
        );

        transcript.reset();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&MessageRole::SystemError).unwrap();
        assert_eq!(json, "\"system_error\"");
    }
}
