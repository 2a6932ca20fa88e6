//! Scripted symptom-intake state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition(state, context, event)` returns the next state plus the
//! effects the runtime must carry out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, HandOffTarget};
pub use event::{Event, InputSource};
pub use state::{CollectedAnswers, ConvContext, DialogueState, Phase};
pub use transition::{
    follow_up_question, select_remedy, transition, TransitionError, TransitionResult,
};
