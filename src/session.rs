//! Session aggregate
//!
//! One session per open symptom-checker screen. Owned exclusively by its
//! engine and discarded when the screen closes.

use crate::catalog::Language;
use crate::state_machine::{CollectedAnswers, DialogueState, Phase};
use crate::transcript::{Message, Transcript};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub language: Language,
    /// Script position: where the next answer goes
    pub dialogue: DialogueState,
    /// Phase shown to the user. Trails `dialogue.phase` by the composing
    /// interval after each answer.
    pub phase: Phase,
    pub transcript: Transcript,
    /// True while an assistant reply is pending
    pub composing: bool,
    pub voice_enabled: bool,
}

impl Session {
    pub fn new(language: Language, voice_enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            language,
            dialogue: DialogueState::new(),
            phase: Phase::Greeting,
            transcript: Transcript::new(),
            composing: false,
            voice_enabled,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 1-indexed progress step of the shown phase
    pub fn step(&self) -> u8 {
        self.phase.step()
    }

    pub fn answers(&self) -> &CollectedAnswers {
        &self.dialogue.answers
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }
}
