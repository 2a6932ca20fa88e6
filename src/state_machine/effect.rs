//! Effects produced by state transitions

use super::state::Phase;
use crate::transcript::AttachmentKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the session hands the user off to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOffTarget {
    Doctor,
}

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a user message to the transcript now
    RecordUserMessage {
        content: String,
        attachment: Option<AttachmentKind>,
    },

    /// Append an assistant message now, with no composing interval
    AppendAssistant { content: String },

    /// Append an assistant message after a delay, relative to the
    /// transition. Deliveries keep the order they were scheduled in.
    ScheduleAssistant { delay: Duration, content: String },

    /// Tell observers the phase changed
    NotifyPhase { phase: Phase, step: u8 },

    /// Show `phase` and its quick replies once `delay` has passed, queued
    /// with the assistant replies so it lands right before the next prompt
    CommitPhase {
        delay: Duration,
        phase: Phase,
        captions: Vec<String>,
    },

    /// Tell observers which quick replies are now valid
    NotifyQuickReplies { captions: Vec<String> },

    /// Leave the symptom checker
    HandOff { target: HandOffTarget },
}

impl Effect {
    pub fn user_text(content: impl Into<String>) -> Self {
        Effect::RecordUserMessage {
            content: content.into(),
            attachment: None,
        }
    }

    pub fn user_media(content: impl Into<String>, kind: AttachmentKind) -> Self {
        Effect::RecordUserMessage {
            content: content.into(),
            attachment: Some(kind),
        }
    }

    pub fn assistant_after(delay: Duration, content: impl Into<String>) -> Self {
        Effect::ScheduleAssistant {
            delay,
            content: content.into(),
        }
    }

    pub fn notify_phase(phase: Phase) -> Self {
        Effect::NotifyPhase {
            phase,
            step: phase.step(),
        }
    }
}
