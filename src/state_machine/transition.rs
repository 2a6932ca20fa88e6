//! Pure state transition function
//!
//! Given the same state, context and event, `transition` always returns the
//! same result. Timers, clocks, speech and observers live in the runtime.

use super::effect::HandOffTarget;
use super::{CollectedAnswers, ConvContext, DialogueState, Effect, Event, Phase};
use crate::catalog::{PromptKey, Remedy, Symptom};
use crate::transcript::AttachmentKind;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogueState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogueState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Inputs the dialogue refuses. Callers drop these without a trace in the
/// transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("Session has not started")]
    NotStarted,
    #[error("Session already started")]
    AlreadyStarted,
    #[error("Doctor hand-off is only offered once suggestions are shown")]
    HandOffUnavailable,
    #[error("Session is closed")]
    Closed,
}

pub fn transition(
    state: &DialogueState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // Session start
        // ============================================================
        (_, Event::Start) if state.started => Err(TransitionError::AlreadyStarted),

        (phase, Event::Start) => {
            let mut next = state.clone();
            next.started = true;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::AppendAssistant {
                    content: prompt(context, PromptKey::Greeting),
                })
                .with_effect(Effect::notify_phase(phase))
                .with_effect(Effect::NotifyQuickReplies {
                    captions: context.quick_replies(phase),
                }))
        }

        (_, Event::UserInput { .. } | Event::Media { .. }) if !state.started => {
            Err(TransitionError::NotStarted)
        }

        (_, Event::UserInput { text, .. }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        // ============================================================
        // Intake script
        // ============================================================
        (Phase::Greeting, Event::UserInput { text, .. }) => {
            let mut next = state.clone();
            next.answers.symptoms.push(text.clone());
            let question = prompt(context, PromptKey::DurationQuestion);
            Ok(advance(next, context, text, [(context.timing.question_delay(), question)]))
        }

        (Phase::Duration, Event::UserInput { text, .. }) => {
            let mut next = state.clone();
            next.answers.duration = Some(text.clone());
            let question = prompt(context, PromptKey::SeverityQuestion);
            Ok(advance(next, context, text, [(context.timing.question_delay(), question)]))
        }

        (Phase::Severity, Event::UserInput { text, .. }) => {
            let mut next = state.clone();
            next.answers.severity = Some(text.clone());
            let question = follow_up_question(&next.answers, context);
            Ok(advance(next, context, text, [(context.timing.question_delay(), question)]))
        }

        (Phase::Related, Event::UserInput { text, .. }) => {
            let mut next = state.clone();
            next.answers.related_symptoms.push(text.clone());

            let remedy = select_remedy(&next.answers, context);
            let [intro_at, remedy_at, disclaimer_at] = context.timing.suggestion_delays();
            let turns = [
                (intro_at, prompt(context, PromptKey::SuggestionIntro)),
                (remedy_at, prompt(context, PromptKey::Remedy(remedy))),
                (disclaimer_at, prompt(context, PromptKey::Disclaimer)),
            ];
            Ok(advance(next, context, text, turns))
        }

        // Script is over; the turn is kept but nothing answers it
        (Phase::Suggestion, Event::UserInput { text, .. }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::user_text(text)))
        }

        // ============================================================
        // Media side channel: never advances the phase
        // ============================================================
        (_, Event::Media { kind }) => Ok(media_upload(state, context, kind)),

        // ============================================================
        // Hand-off
        // ============================================================
        (Phase::Suggestion, Event::ConsultDoctor) => Ok(TransitionResult::new(state.clone())
            .with_effect(Effect::HandOff {
                target: HandOffTarget::Doctor,
            })),

        (_, Event::ConsultDoctor) => Err(TransitionError::HandOffUnavailable),
    }
}

/// Record the user's turn, move the script to the next phase and queue the
/// assistant's reply turns.
///
/// The script position moves at once so the next answer lands in the right
/// field. Observers only see the new phase after `reply_delay`.
fn advance(
    next: DialogueState,
    context: &ConvContext,
    user_text: String,
    replies: impl IntoIterator<Item = (std::time::Duration, String)>,
) -> TransitionResult {
    let phase = next.phase.next().unwrap_or(next.phase);
    let mut next = next;
    next.phase = phase;

    TransitionResult::new(next)
        .with_effect(Effect::user_text(user_text))
        .with_effect(Effect::CommitPhase {
            delay: context.timing.reply_delay,
            phase,
            captions: context.quick_replies(phase),
        })
        .with_effects(
            replies
                .into_iter()
                .map(|(delay, content)| Effect::assistant_after(delay, content)),
        )
}

fn media_upload(state: &DialogueState, context: &ConvContext, kind: AttachmentKind) -> TransitionResult {
    TransitionResult::new(state.clone())
        .with_effect(Effect::user_media(
            prompt(context, PromptKey::MediaUploaded(kind)),
            kind,
        ))
        .with_effect(Effect::assistant_after(
            context.timing.media_ack_delay,
            prompt(context, PromptKey::MediaReceived(kind)),
        ))
}

fn prompt(context: &ConvContext, key: PromptKey) -> String {
    context.catalog.resolve(key, context.language)
}

/// Follow-up asked when entering `related`.
///
/// A keyed lookup of the first reported symptom; anything the table does not
/// know gets the generic question.
pub fn follow_up_question(answers: &CollectedAnswers, context: &ConvContext) -> String {
    answers
        .primary_symptom()
        .and_then(|text| context.catalog.recognize(text))
        .and_then(|symptom| context.catalog.follow_up(symptom, context.language))
        .unwrap_or_else(|| prompt(context, PromptKey::FollowUpFallback))
}

/// Two-branch remedy choice: any fever mention selects the medium template.
pub fn select_remedy(answers: &CollectedAnswers, context: &ConvContext) -> Remedy {
    if answers
        .symptoms
        .iter()
        .any(|s| context.catalog.mentions(s, Symptom::Fever))
    {
        Remedy::Medium
    } else {
        Remedy::Default
    }
}
