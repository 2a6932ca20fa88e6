//! Runtime for executing conversations
//!
//! [`ConversationEngine`] applies transitions and carries out their effects
//! against injected I/O. [`ConversationRuntime`] hosts one engine on a tokio
//! task and feeds it commands and timer deliveries.

mod engine;
mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use engine::ConversationEngine;
pub use executor::{
    spawn_session, Command, ConversationRuntime, SessionError, SessionHandle, TokioScheduler,
};
pub use traits::*;

use crate::state_machine::{HandOffTarget, Phase};
use crate::transcript::Message;
use serde::Serialize;

/// Notifications sent to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended {
        message: Message,
    },
    ComposingChanged {
        composing: bool,
    },
    PhaseAdvanced {
        phase: Phase,
        step: u8,
        total_steps: u8,
    },
    /// Valid quick-reply captions for the current phase, possibly empty
    QuickRepliesChanged {
        captions: Vec<String>,
    },
    HandOff {
        target: HandOffTarget,
    },
    Closed,
}
