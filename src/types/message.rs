//! Conversation messages exchanged with the completion capability.

use serde::{Deserialize, Serialize};

/// Unified message structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    /// Output of an executed function, fed back for the next extraction.
    pub fn function_result(text: impl Into<String>) -> Self {
        Self::new(MessageRole::FunctionResult, text)
    }

    pub fn is_function_result(&self) -> bool {
        self.role == MessageRole::FunctionResult
    }

    /// User and assistant turns; the only roles forwarded after the instruction.
    pub fn is_conversational(&self) -> bool {
        matches!(self.role, MessageRole::User | MessageRole::Assistant)
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    #[serde(rename = "function")]
    FunctionResult,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::FunctionResult => "function",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let msg = Message::function_result("42 rows");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "function");

        let back: Message =
            serde_json::from_value(serde_json::json!({"role": "assistant", "content": "hi"}))
                .unwrap();
        assert_eq!(back, Message::assistant("hi"));
    }

    #[test]
    fn test_conversational_roles() {
        assert!(Message::user("q").is_conversational());
        assert!(Message::assistant("a").is_conversational());
        assert!(!Message::system("s").is_conversational());
        assert!(!Message::function_result("r").is_conversational());
    }
}
