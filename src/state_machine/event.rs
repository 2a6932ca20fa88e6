//! Events that drive the dialogue

use crate::transcript::AttachmentKind;

/// Where a user's text came from. Only used for logging: every source
/// takes the same transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Typed,
    QuickReply,
    SymptomChip,
}

impl InputSource {
    pub fn as_str(self) -> &'static str {
        match self {
            InputSource::Typed => "typed",
            InputSource::QuickReply => "quick_reply",
            InputSource::SymptomChip => "symptom_chip",
        }
    }
}

/// Events that trigger dialogue transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Session opened; emits the greeting
    Start,
    UserInput {
        text: String,
        source: InputSource,
    },
    /// Photo or video stub upload
    Media {
        kind: AttachmentKind,
    },
    /// "Talk to Doctor Now"
    ConsultDoctor,
}

impl Event {
    pub fn typed(text: impl Into<String>) -> Self {
        Event::UserInput {
            text: text.into(),
            source: InputSource::Typed,
        }
    }

    pub fn quick_reply(caption: impl Into<String>) -> Self {
        Event::UserInput {
            text: caption.into(),
            source: InputSource::QuickReply,
        }
    }

    pub fn symptom_chip(caption: impl Into<String>) -> Self {
        Event::UserInput {
            text: caption.into(),
            source: InputSource::SymptomChip,
        }
    }
}
