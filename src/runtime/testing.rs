//! Fakes for driving the engine in tests
//!
//! `ManualScheduler` runs on virtual time, so tests advance the clock
//! explicitly instead of sleeping.

use super::traits::*;
use super::{ConversationEngine, SessionEvent};
use crate::catalog::{Language, StaticCatalog};
use crate::config::Timing;
use crate::state_machine::ConvContext;
use crate::transcript::Role;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type TestEngine = ConversationEngine<ManualScheduler, RecordingVoice, RecordingObserver>;

// ============================================================================
// Manual Scheduler
// ============================================================================

#[derive(Debug)]
struct SchedulerState {
    now: DateTime<Utc>,
    timers: Vec<(DateTime<Utc>, DeliveryId)>,
    requested: Vec<Duration>,
    cancelled: bool,
}

/// Virtual-time scheduler. Clones share the same clock and timer list.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

#[allow(dead_code)]
impl ManualScheduler {
    pub fn new() -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                now: epoch,
                timers: Vec::new(),
                requested: Vec::new(),
                cancelled: false,
            })),
        }
    }

    /// Move the clock forward by `by`, firing every timer that comes due in
    /// due-time order. The clock sits at each timer's due time while it fires.
    pub fn advance<V, O>(&self, engine: &mut ConversationEngine<ManualScheduler, V, O>, by: Duration)
    where
        V: VoiceOutput,
        O: SessionObserver,
    {
        let target = {
            let state = self.state.lock().unwrap();
            state.now + chrono::Duration::from_std(by).unwrap()
        };

        while let Some(delivery) = self.pop_due(target) {
            engine.deliver_due(delivery);
        }

        self.state.lock().unwrap().now = target;
    }

    /// Remove the earliest timer due at or before `deadline` and move the
    /// clock to it
    pub fn pop_due(&self, deadline: DateTime<Utc>) -> Option<DeliveryId> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= deadline)
            .min_by_key(|(_, (due, id))| (*due, *id))
            .map(|(i, _)| i)?;
        let (due, id) = state.timers.remove(index);
        state.now = state.now.max(due);
        Some(id)
    }

    /// Timers not yet fired
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().timers.len()
    }

    /// Every delay passed to `schedule_after`, in call order
    pub fn requested_delays(&self) -> Vec<Duration> {
        self.state.lock().unwrap().requested.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().unwrap().cancelled
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap().now
    }

    fn schedule_after(&self, delay: Duration, delivery: DeliveryId) {
        let mut state = self.state.lock().unwrap();
        if state.cancelled {
            return;
        }
        let due = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|delta| state.now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        state.timers.push((due, delivery));
        state.requested.push(delay);
    }

    fn cancel_all(&self) {
        let mut state = self.state.lock().unwrap();
        state.cancelled = true;
        state.timers.clear();
    }
}

// ============================================================================
// Recording Observer
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Content of every assistant message, in delivery order
    pub fn assistant_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::MessageAppended { message } if message.role == Role::Assistant => {
                    Some(message.content)
                }
                _ => None,
            })
            .collect()
    }

    pub fn composing_changes(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::ComposingChanged { composing } => Some(composing),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for RecordingObserver {
    fn notify(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ============================================================================
// Recording Voice
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordingVoice {
    spoken: Arc<Mutex<Vec<Utterance>>>,
    available: bool,
}

#[allow(dead_code)]
impl RecordingVoice {
    pub fn new() -> Self {
        Self {
            spoken: Arc::default(),
            available: true,
        }
    }

    /// Fails every call, like a device without speech synthesis
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Default for RecordingVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceOutput for RecordingVoice {
    fn speak(&self, utterance: &Utterance) -> Result<(), VoiceError> {
        if !self.available {
            return Err(VoiceError::Unavailable);
        }
        self.spoken.lock().unwrap().push(utterance.clone());
        Ok(())
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn test_context(language: Language) -> ConvContext {
    ConvContext::new(language, Arc::new(StaticCatalog), Timing::default())
}

/// Engine with default timing and voice off
pub fn test_engine(
    language: Language,
) -> (TestEngine, ManualScheduler, RecordingObserver, RecordingVoice) {
    test_engine_with_voice(language, RecordingVoice::new(), false)
}

pub fn test_engine_with_voice(
    language: Language,
    voice: RecordingVoice,
    voice_enabled: bool,
) -> (TestEngine, ManualScheduler, RecordingObserver, RecordingVoice) {
    build(test_context(language), voice, voice_enabled)
}

pub fn test_engine_with_timing(
    language: Language,
    timing: Timing,
) -> (TestEngine, ManualScheduler, RecordingObserver, RecordingVoice) {
    let context = ConvContext::new(language, Arc::new(StaticCatalog), timing);
    build(context, RecordingVoice::new(), false)
}

fn build(
    context: ConvContext,
    voice: RecordingVoice,
    voice_enabled: bool,
) -> (TestEngine, ManualScheduler, RecordingObserver, RecordingVoice) {
    let scheduler = ManualScheduler::new();
    let observer = RecordingObserver::default();
    let engine = ConversationEngine::new(
        context,
        voice_enabled,
        scheduler.clone(),
        voice.clone(),
        observer.clone(),
    );
    (engine, scheduler, observer, voice)
}
