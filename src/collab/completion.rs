//! Language-completion adapter
//!
//! Only a deterministic stub exists; it echoes the last user message.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

pub trait CompletionAdapter {
    fn complete(&self, messages: &[ChatMessage]) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoCompletion;

impl CompletionAdapter for EchoCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| format!("(mock echo) {}", m.content))
            .unwrap_or_else(|| "Hello.".to_string())
    }
}
