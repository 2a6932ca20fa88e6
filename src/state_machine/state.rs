//! Dialogue state types

use crate::catalog::{Language, PromptResolver, ReplySet};
use crate::config::Timing;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Phase of the five-step intake script.
///
/// Phases only move forward, one step per completed user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Greeting,
    Duration,
    Severity,
    Related,
    Suggestion,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Greeting,
        Phase::Duration,
        Phase::Severity,
        Phase::Related,
        Phase::Suggestion,
    ];

    pub const TOTAL_STEPS: u8 = 5;

    /// 1-indexed step for progress display
    pub fn step(self) -> u8 {
        match self {
            Phase::Greeting => 1,
            Phase::Duration => 2,
            Phase::Severity => 3,
            Phase::Related => 4,
            Phase::Suggestion => 5,
        }
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Greeting => Some(Phase::Duration),
            Phase::Duration => Some(Phase::Severity),
            Phase::Severity => Some(Phase::Related),
            Phase::Related => Some(Phase::Suggestion),
            Phase::Suggestion => None,
        }
    }

    /// Quick replies offered while waiting for the answer to this phase
    pub fn reply_set(self) -> Option<ReplySet> {
        match self {
            Phase::Duration => Some(ReplySet::Duration),
            Phase::Severity => Some(ReplySet::Severity),
            Phase::Related => Some(ReplySet::YesNo),
            Phase::Greeting | Phase::Suggestion => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Greeting => "greeting",
            Phase::Duration => "duration",
            Phase::Severity => "severity",
            Phase::Related => "related",
            Phase::Suggestion => "suggestion",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers extracted from the user's turns. Each field is written once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedAnswers {
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub severity: Option<String>,
    pub related_symptoms: Vec<String>,
}

impl CollectedAnswers {
    /// The symptom reported first, which drives the follow-up lookup
    pub fn primary_symptom(&self) -> Option<&str> {
        self.symptoms.first().map(String::as_str)
    }
}

/// The pure part of a session: what the transition function reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub phase: Phase,
    pub answers: CollectedAnswers,
    /// Whether the greeting has been emitted
    pub started: bool,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read-only inputs to every transition
#[derive(Clone)]
pub struct ConvContext {
    pub language: Language,
    pub catalog: Arc<dyn PromptResolver>,
    pub timing: Timing,
}

impl ConvContext {
    pub fn new(language: Language, catalog: Arc<dyn PromptResolver>, timing: Timing) -> Self {
        Self {
            language,
            catalog,
            timing,
        }
    }

    /// Captions offered as quick replies in the given phase
    pub fn quick_replies(&self, phase: Phase) -> Vec<String> {
        phase
            .reply_set()
            .map(|set| self.catalog.captions(set, self.language))
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ConvContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvContext")
            .field("language", &self.language)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
