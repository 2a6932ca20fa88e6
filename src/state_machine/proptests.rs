//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::catalog::{Language, StaticCatalog};
use crate::config::Timing;
use crate::transcript::AttachmentKind;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(language: Language) -> ConvContext {
    ConvContext::new(language, Arc::new(StaticCatalog), Timing::default())
}

fn started_state(phase: Phase) -> DialogueState {
    DialogueState {
        phase,
        started: true,
        ..DialogueState::default()
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::Pa), Just(Language::Hi)]
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Greeting),
        Just(Phase::Duration),
        Just(Phase::Severity),
        Just(Phase::Related),
        Just(Phase::Suggestion),
    ]
}

fn arb_attachment() -> impl Strategy<Value = AttachmentKind> {
    prop_oneof![Just(AttachmentKind::Photo), Just(AttachmentKind::Video)]
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 +-]{0,24}"
}

fn arb_input_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(Event::typed),
        arb_text().prop_map(Event::quick_reply),
        arb_text().prop_map(Event::symptom_chip),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_input_event(),
        1 => arb_blank().prop_map(Event::typed),
        1 => arb_attachment().prop_map(|kind| Event::Media { kind }),
        1 => Just(Event::ConsultDoctor),
        1 => Just(Event::Start),
    ]
}

// ============================================================================
// Effect Checkers
// ============================================================================

fn user_messages(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::RecordUserMessage { .. }))
        .count()
}

fn scheduled_delays(effects: &[Effect]) -> Vec<std::time::Duration> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ScheduleAssistant { delay, .. } => Some(*delay),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Phase only moves forward, one step at a time
    #[test]
    fn prop_phase_advances_monotonically(
        language in arb_language(),
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let ctx = test_context(language);
        let mut state = started_state(Phase::Greeting);

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                let before = state.phase.step();
                let after = result.new_state.phase.step();
                prop_assert!(after == before || after == before + 1,
                    "Phase jumped from {:?} to {:?}", state.phase, result.new_state.phase);
                if after == before + 1 {
                    let committed = result.effects.iter().any(|e| matches!(
                        e,
                        Effect::CommitPhase { phase, delay, .. }
                            if *phase == result.new_state.phase && *delay == ctx.timing.reply_delay
                    ));
                    prop_assert!(committed, "Phase advanced without a scheduled commit");
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 2: Blank input never changes anything
    #[test]
    fn prop_blank_input_is_rejected(
        phase in arb_phase(),
        language in arb_language(),
        blank in arb_blank()
    ) {
        let state = started_state(phase);
        let result = transition(&state, &test_context(language), Event::typed(blank));
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    // Invariant 3: Answers are write-once
    #[test]
    fn prop_answers_are_write_once(
        language in arb_language(),
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let ctx = test_context(language);
        let mut state = started_state(Phase::Greeting);

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                let old = &state.answers;
                let new = &result.new_state.answers;
                prop_assert!(new.symptoms.len() <= 1);
                prop_assert!(new.related_symptoms.len() <= 1);
                prop_assert!(new.symptoms.starts_with(&old.symptoms));
                prop_assert!(new.related_symptoms.starts_with(&old.related_symptoms));
                if old.duration.is_some() {
                    prop_assert_eq!(&old.duration, &new.duration);
                }
                if old.severity.is_some() {
                    prop_assert_eq!(&old.severity, &new.severity);
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 4: Media is a side channel
    #[test]
    fn prop_media_never_changes_state(
        phase in arb_phase(),
        language in arb_language(),
        kind in arb_attachment()
    ) {
        let state = started_state(phase);
        let result = transition(&state, &test_context(language), Event::Media { kind }).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert_eq!(user_messages(&result.effects), 1);
        prop_assert_eq!(scheduled_delays(&result.effects).len(), 1);
    }

    // Invariant 5: One valid input per phase walks the whole script in order
    #[test]
    fn prop_script_visits_every_phase_once(
        language in arb_language(),
        inputs in proptest::collection::vec(arb_input_event(), 4)
    ) {
        let ctx = test_context(language);
        let mut state = started_state(Phase::Greeting);
        let mut visited = vec![state.phase];

        for event in inputs {
            state = transition(&state, &ctx, event).unwrap().new_state;
            visited.push(state.phase);
        }
        prop_assert_eq!(visited, Phase::ALL.to_vec());
    }

    // Invariant 6: Quick replies exist only for duration, severity and related
    #[test]
    fn prop_quick_replies_follow_phase(
        language in arb_language(),
        inputs in proptest::collection::vec(arb_input_event(), 1..5)
    ) {
        let ctx = test_context(language);
        let mut state = started_state(Phase::Greeting);

        for event in inputs {
            let result = transition(&state, &ctx, event).unwrap();
            for effect in &result.effects {
                if let Effect::CommitPhase { phase, captions, .. } = effect {
                    prop_assert_eq!(*phase, result.new_state.phase);
                    prop_assert_eq!(captions.is_empty(), phase.reply_set().is_none());
                    prop_assert_eq!(captions, &ctx.quick_replies(*phase));
                }
            }
            state = result.new_state;
        }
    }

    // Invariant 7: Every accepted input records exactly one user message,
    // replies are scheduled in non-decreasing delay order and the phase is
    // shown no later than the first reply
    #[test]
    fn prop_each_turn_records_one_message(
        phase in arb_phase(),
        language in arb_language(),
        event in arb_input_event()
    ) {
        let state = started_state(phase);
        let result = transition(&state, &test_context(language), event).unwrap();
        prop_assert_eq!(user_messages(&result.effects), 1);

        let delays = scheduled_delays(&result.effects);
        prop_assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        let expected_replies = match phase {
            Phase::Related => 3,
            Phase::Suggestion => 0,
            _ => 1,
        };
        prop_assert_eq!(delays.len(), expected_replies);

        for effect in &result.effects {
            if let Effect::CommitPhase { delay, .. } = effect {
                prop_assert!(delays.iter().all(|d| delay <= d));
            }
        }
    }
}
