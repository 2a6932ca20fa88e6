//! Conversation engine
//!
//! Owns the session, runs the pure transition and executes its effects.
//! Scheduled assistant replies and phase commits go through a single queue:
//! an entry is never due before one scheduled earlier, and delivering an
//! entry first flushes every earlier pending one, so transcript order always
//! equals schedule order even if timers fire out of order.

use super::traits::{DeliveryId, Scheduler, SessionObserver, Utterance, VoiceOutput};
use super::SessionEvent;
use crate::catalog::{PromptKey, ReplySet};
use crate::session::Session;
use crate::state_machine::{transition, ConvContext, Effect, Event, Phase, TransitionError};
use crate::transcript::{AttachmentKind, Role};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug)]
enum Deferred {
    Reply(String),
    Phase { phase: Phase, captions: Vec<String> },
}

#[derive(Debug)]
struct PendingEntry {
    delivery: DeliveryId,
    deferred: Deferred,
}

pub struct ConversationEngine<S, V, O>
where
    S: Scheduler,
    V: VoiceOutput,
    O: SessionObserver,
{
    context: ConvContext,
    session: Session,
    scheduler: S,
    voice: V,
    observer: O,
    pending: VecDeque<PendingEntry>,
    next_delivery: u64,
    /// Due time of the most recently scheduled reply
    last_due_at: Option<DateTime<Utc>>,
    closed: bool,
}

impl<S, V, O> ConversationEngine<S, V, O>
where
    S: Scheduler,
    V: VoiceOutput,
    O: SessionObserver,
{
    pub fn new(context: ConvContext, voice_enabled: bool, scheduler: S, voice: V, observer: O) -> Self {
        let session = Session::new(context.language, voice_enabled);
        Self {
            context,
            session,
            scheduler,
            voice,
            observer,
            pending: VecDeque::new(),
            next_delivery: 1,
            last_due_at: None,
            closed: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn context(&self) -> &ConvContext {
        &self.context
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Emit the greeting. Call once, before any input.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.handle(Event::Start)
    }

    pub fn submit_text(&mut self, text: impl Into<String>) -> Result<(), TransitionError> {
        self.handle(Event::typed(text))
    }

    pub fn submit_quick_reply(&mut self, caption: impl Into<String>) -> Result<(), TransitionError> {
        self.handle(Event::quick_reply(caption))
    }

    pub fn submit_symptom(&mut self, caption: impl Into<String>) -> Result<(), TransitionError> {
        self.handle(Event::symptom_chip(caption))
    }

    pub fn submit_media(&mut self, kind: AttachmentKind) -> Result<(), TransitionError> {
        self.handle(Event::Media { kind })
    }

    pub fn consult_doctor(&mut self) -> Result<(), TransitionError> {
        self.handle(Event::ConsultDoctor)
    }

    /// Applies to assistant messages delivered from now on
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        if self.closed || self.session.voice_enabled == enabled {
            return;
        }
        self.session.voice_enabled = enabled;
        tracing::info!(session_id = %self.session.id, enabled, "Voice playback toggled");
    }

    /// Quick replies valid in the current phase
    pub fn quick_replies(&self) -> Vec<String> {
        self.context.quick_replies(self.session.phase())
    }

    /// Common-symptom chips, offered only while waiting for the first symptom
    pub fn common_symptoms(&self) -> Vec<String> {
        if self.session.phase() == Phase::Greeting {
            self.context
                .catalog
                .captions(ReplySet::CommonSymptoms, self.context.language)
        } else {
            Vec::new()
        }
    }

    /// "Step N of 5"
    pub fn progress_label(&self) -> String {
        self.context
            .catalog
            .progress(self.session.step(), Phase::TOTAL_STEPS, self.context.language)
    }

    /// Caption of the doctor hand-off action
    pub fn consult_doctor_label(&self) -> String {
        self.context
            .catalog
            .resolve(PromptKey::ConsultDoctor, self.context.language)
    }

    /// Run one event through the state machine and execute its effects.
    ///
    /// Rejected events leave the session untouched.
    pub fn handle(&mut self, event: Event) -> Result<(), TransitionError> {
        if self.closed {
            return Err(TransitionError::Closed);
        }
        // The button only exists once the suggestion phase is on screen
        if matches!(event, Event::ConsultDoctor) && self.session.phase() != Phase::Suggestion {
            return Err(TransitionError::HandOffUnavailable);
        }

        if let Event::UserInput { source, .. } = &event {
            tracing::debug!(
                session_id = %self.session.id,
                phase = %self.session.phase(),
                source = source.as_str(),
                "User input"
            );
        }

        let result = match transition(&self.session.dialogue, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    session_id = %self.session.id,
                    phase = %self.session.phase(),
                    error = %e,
                    "Event rejected"
                );
                return Err(e);
            }
        };

        self.session.dialogue = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    /// Timer callback. Unknown or already-delivered ids and deliveries after
    /// `close` are no-ops.
    pub fn deliver_due(&mut self, delivery: DeliveryId) {
        if self.closed {
            tracing::debug!(%delivery, "Ignoring delivery for closed session");
            return;
        }
        while self
            .pending
            .front()
            .is_some_and(|entry| entry.delivery <= delivery)
        {
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            tracing::debug!(session_id = %self.session.id, delivery = %entry.delivery, "Delivering");
            match entry.deferred {
                Deferred::Reply(content) => self.append_assistant(content),
                Deferred::Phase { phase, captions } => self.show_phase(phase, captions),
            }
        }

        if self.pending.is_empty() {
            self.last_due_at = None;
            self.set_composing(false);
        }
    }

    /// Tear down: cancel timers and drop pending replies. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scheduler.cancel_all();
        let dropped = self.pending.len();
        self.pending.clear();
        self.last_due_at = None;
        self.session.composing = false;
        self.observer.notify(SessionEvent::Closed);
        tracing::info!(session_id = %self.session.id, dropped, "Session closed");
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RecordUserMessage {
                content,
                attachment,
            } => {
                let now = self.scheduler.now();
                let message = self
                    .session
                    .transcript
                    .append(Role::User, content, attachment, now)
                    .clone();
                self.observer.notify(SessionEvent::MessageAppended { message });
            }

            Effect::AppendAssistant { content } => self.append_assistant(content),

            Effect::ScheduleAssistant { delay, content } => {
                self.schedule(delay, Deferred::Reply(content));
            }

            Effect::NotifyPhase { phase, step } => {
                self.session.phase = phase;
                tracing::info!(session_id = %self.session.id, %phase, step, "Phase advanced");
                self.observer.notify(SessionEvent::PhaseAdvanced {
                    phase,
                    step,
                    total_steps: Phase::TOTAL_STEPS,
                });
            }

            Effect::CommitPhase {
                delay,
                phase,
                captions,
            } => self.schedule(delay, Deferred::Phase { phase, captions }),

            Effect::NotifyQuickReplies { captions } => {
                self.observer
                    .notify(SessionEvent::QuickRepliesChanged { captions });
            }

            Effect::HandOff { target } => {
                tracing::info!(session_id = %self.session.id, ?target, "Handing off");
                self.observer.notify(SessionEvent::HandOff { target });
            }
        }
    }

    fn schedule(&mut self, delay: Duration, deferred: Deferred) {
        let now = self.scheduler.now();
        let requested = due_after(now, delay);
        let due_at = self
            .last_due_at
            .map_or(requested, |last| last.max(requested));
        self.last_due_at = Some(due_at);
        let wait = (due_at - now).to_std().unwrap_or(Duration::ZERO);

        let delivery = DeliveryId(self.next_delivery);
        self.next_delivery += 1;
        self.pending.push_back(PendingEntry { delivery, deferred });
        self.scheduler.schedule_after(wait, delivery);
        self.set_composing(true);
    }

    fn show_phase(&mut self, phase: Phase, captions: Vec<String>) {
        self.session.phase = phase;
        tracing::info!(session_id = %self.session.id, %phase, step = phase.step(), "Phase advanced");
        self.observer.notify(SessionEvent::PhaseAdvanced {
            phase,
            step: phase.step(),
            total_steps: Phase::TOTAL_STEPS,
        });
        self.observer
            .notify(SessionEvent::QuickRepliesChanged { captions });
    }

    fn append_assistant(&mut self, content: String) {
        let now = self.scheduler.now();
        let message = self
            .session
            .transcript
            .append(Role::Assistant, content, None, now)
            .clone();

        if self.session.voice_enabled {
            let utterance = Utterance::new(message.content.clone(), self.session.language);
            if let Err(e) = self.voice.speak(&utterance) {
                tracing::debug!(error = %e, "Voice playback skipped");
            }
        }

        self.observer.notify(SessionEvent::MessageAppended { message });
    }

    fn set_composing(&mut self, composing: bool) {
        if self.session.composing == composing {
            return;
        }
        self.session.composing = composing;
        self.observer
            .notify(SessionEvent::ComposingChanged { composing });
    }
}

/// `now + delay`, saturating at the latest representable time
fn due_after(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl<S, V, O> Drop for ConversationEngine<S, V, O>
where
    S: Scheduler,
    V: VoiceOutput,
    O: SessionObserver,
{
    fn drop(&mut self) {
        self.close();
    }
}
