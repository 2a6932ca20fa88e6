//! Trait abstractions for runtime I/O
//!
//! These traits let the engine run against tokio timers and real speech in
//! production, and against virtual time and recorders in tests.

use super::SessionEvent;
use crate::catalog::Language;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

/// Identifies one scheduled assistant reply. Ids increase in schedule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryId(pub u64);

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timer source and clock for one session
pub trait Scheduler: Send {
    /// Current time, used to stamp messages
    fn now(&self) -> DateTime<Utc>;

    /// Arrange for `ConversationEngine::deliver_due(delivery)` to be called
    /// once `delay` has elapsed
    fn schedule_after(&self, delay: Duration, delivery: DeliveryId);

    /// Cancel every outstanding timer. Nothing fires afterwards.
    fn cancel_all(&self);
}

/// Text handed to speech synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language_tag: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub const DEFAULT_RATE: f32 = 0.8;
    pub const DEFAULT_PITCH: f32 = 1.0;

    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language_tag: language.speech_tag(),
            rate: Self::DEFAULT_RATE,
            pitch: Self::DEFAULT_PITCH,
        }
    }
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Speech synthesis is unavailable")]
    Unavailable,
    #[error("Failed to start speech synthesis: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Fire-and-forget text-to-speech
pub trait VoiceOutput: Send + Sync {
    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError>;
}

/// Receives outbound session notifications
pub trait SessionObserver: Send + Sync {
    fn notify(&self, event: SessionEvent);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: VoiceOutput + ?Sized> VoiceOutput for Arc<T> {
    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError> {
        (**self).speak(utterance)
    }
}

impl<T: SessionObserver + ?Sized> SessionObserver for Arc<T> {
    fn notify(&self, event: SessionEvent) {
        (**self).notify(event);
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Broadcast notifications to every subscriber; having none is fine
impl SessionObserver for broadcast::Sender<SessionEvent> {
    fn notify(&self, event: SessionEvent) {
        let _ = self.send(event);
    }
}

/// Voice output for headless environments
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVoice;

impl VoiceOutput for NoopVoice {
    fn speak(&self, _utterance: &Utterance) -> Result<(), VoiceError> {
        Err(VoiceError::Unavailable)
    }
}

/// Speech through an espeak-compatible command
/// (`<program> -v <tag> -s <wpm> -p <pitch> <text>`)
#[derive(Debug, Clone)]
pub struct CommandVoice {
    program: PathBuf,
}

impl CommandVoice {
    const BASE_WORDS_PER_MINUTE: f32 = 175.0;
    const BASE_PITCH: f32 = 50.0;

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `name` on `PATH`
    pub fn locate(name: &str) -> Option<Self> {
        match which::which(name) {
            Ok(program) => {
                tracing::info!(program = %program.display(), "Using speech synthesis command");
                Some(Self::new(program))
            }
            Err(e) => {
                tracing::warn!(command = name, error = %e, "Speech synthesis command not found");
                None
            }
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn args(utterance: &Utterance) -> Vec<String> {
        let wpm = (Self::BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        let pitch = (Self::BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        vec![
            "-v".to_string(),
            utterance.language_tag.to_ascii_lowercase(),
            "-s".to_string(),
            wpm.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            utterance.text.clone(),
        ]
    }
}

impl VoiceOutput for CommandVoice {
    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError> {
        // The child is never awaited; tokio reaps it once it exits.
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(VoiceError::Unavailable);
        }
        tokio::process::Command::new(&self.program)
            .args(Self::args(utterance))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;
        Ok(())
    }
}
