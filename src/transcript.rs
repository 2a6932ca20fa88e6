//! Conversation transcript
//!
//! Messages are append-only. Ids increase by one per message and timestamps
//! never go backwards, so ordering by id equals ordering by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Assistant,
    User,
}

/// Kind of media attached to a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Photo,
    Video,
}

impl AttachmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentKind>,
}

/// Append-only, ordered list of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it.
    ///
    /// `now` is clamped to the previous message's timestamp if the clock
    /// stepped backwards.
    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        attachment: Option<AttachmentKind>,
        now: DateTime<Utc>,
    ) -> &Message {
        let created_at = match self.messages.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };
        let id = self.messages.last().map_or(1, |last| last.id + 1);

        self.messages.push(Message {
            id,
            role,
            content: content.into(),
            created_at,
            attachment,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
