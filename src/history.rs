//! In-memory conversation history.
//!
//! An append-only log of chat messages for the lifetime of the process.
//! Messages are never mutated after append; the only removal is a wholesale
//! clear triggered by the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::EmotionResult;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Input modality of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Audio,
}

/// One entry in the conversation log.
///
/// User messages carry no result; bot messages always carry one (possibly
/// the degraded form when classification failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub kind: MessageKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub result: Option<EmotionResult>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, kind: MessageKind, content: String, result: Option<EmotionResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            kind,
            content,
            result,
            timestamp: Utc::now(),
        }
    }

    /// A user-authored text message.
    pub fn user_text(content: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageKind::Text, content.into(), None)
    }

    /// A user-authored audio upload (content is the original file name).
    pub fn user_audio(filename: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageKind::Audio, filename.into(), None)
    }

    /// The bot's analysis of a text message.
    pub fn bot_text(content: impl Into<String>, result: EmotionResult) -> Self {
        Self::new(Sender::Bot, MessageKind::Text, content.into(), Some(result))
    }

    /// The bot's analysis of an audio upload.
    pub fn bot_audio(filename: impl Into<String>, result: EmotionResult) -> Self {
        Self::new(Sender::Bot, MessageKind::Audio, filename.into(), Some(result))
    }
}

/// Append-only conversation log.
#[derive(Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the log.
    pub fn push(&mut self, message: ChatMessage) {
        tracing::debug!(
            "History append: {:?}/{:?} ({} messages)",
            message.sender,
            message.kind,
            self.messages.len() + 1
        );
        self.messages.push(message);
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        tracing::info!("Clearing chat history ({} messages)", self.messages.len());
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
