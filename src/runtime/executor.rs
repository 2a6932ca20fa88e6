//! Tokio host for a conversation engine
//!
//! One task owns the engine. Callers talk to it through [`SessionHandle`],
//! and timers report back on the same command channel, so the engine never
//! needs a lock.

use super::engine::ConversationEngine;
use super::traits::{DeliveryId, Scheduler, SessionObserver, VoiceOutput};
use super::SessionEvent;
use crate::catalog::PromptResolver;
use crate::config::EngineConfig;
use crate::session::Session;
use crate::state_machine::{ConvContext, Event, TransitionError};
use crate::transcript::AttachmentKind;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 128;

/// Messages processed by the runtime task
#[derive(Debug)]
pub enum Command {
    Dispatch {
        event: Event,
        reply: oneshot::Sender<Result<(), TransitionError>>,
    },
    SetVoice(bool),
    /// A scheduled reply came due
    Deliver(DeliveryId),
    Snapshot(oneshot::Sender<Session>),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session is closed")]
    Closed,
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

// ============================================================================
// Scheduler
// ============================================================================

/// Wall-clock scheduler backed by tokio timers.
///
/// Holds only a weak sender so pending timers never keep a session alive.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    commands: mpsc::WeakSender<Command>,
    cancel: CancellationToken,
}

impl TokioScheduler {
    pub fn new(commands: &mpsc::Sender<Command>) -> Self {
        Self {
            commands: commands.downgrade(),
            cancel: CancellationToken::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule_after(&self, delay: Duration, delivery: DeliveryId) {
        if self.cancel.is_cancelled() {
            return;
        }
        let commands = self.commands.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Some(tx) = commands.upgrade() {
                        let _ = tx.send(Command::Deliver(delivery)).await;
                    }
                }
            }
        });
    }

    fn cancel_all(&self) {
        self.cancel.cancel();
    }
}

// ============================================================================
// Runtime
// ============================================================================

pub struct ConversationRuntime<V, O>
where
    V: VoiceOutput + 'static,
    O: SessionObserver + 'static,
{
    engine: ConversationEngine<TokioScheduler, V, O>,
    commands: mpsc::Receiver<Command>,
}

impl<V, O> ConversationRuntime<V, O>
where
    V: VoiceOutput + 'static,
    O: SessionObserver + 'static,
{
    pub fn new(engine: ConversationEngine<TokioScheduler, V, O>, commands: mpsc::Receiver<Command>) -> Self {
        Self { engine, commands }
    }

    pub async fn run(mut self) {
        let session_id = self.engine.session().id;
        tracing::info!(%session_id, language = %self.engine.session().language, "Starting conversation runtime");

        if let Err(e) = self.engine.start() {
            tracing::warn!(%session_id, error = %e, "Failed to start conversation");
        }

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Dispatch { event, reply } => {
                    let _ = reply.send(self.engine.handle(event));
                }
                Command::SetVoice(enabled) => self.engine.set_voice_enabled(enabled),
                Command::Deliver(delivery) => self.engine.deliver_due(delivery),
                Command::Snapshot(reply) => {
                    let _ = reply.send(self.engine.session().clone());
                }
                Command::Close => break,
            }
        }

        self.engine.close();
        tracing::info!(%session_id, "Conversation runtime stopped");
    }
}

/// Build an engine for `config`, start it on its own task and return a
/// handle plus a receiver that already sees the greeting.
pub fn spawn_session<V>(
    config: &EngineConfig,
    catalog: Arc<dyn PromptResolver>,
    voice: V,
) -> (SessionHandle, broadcast::Receiver<SessionEvent>)
where
    V: VoiceOutput + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
    let (event_tx, event_rx) = broadcast::channel(EVENT_CAPACITY);

    let context = ConvContext::new(config.language, catalog, config.timing.clone());
    let engine = ConversationEngine::new(
        context,
        config.voice_enabled,
        TokioScheduler::new(&command_tx),
        voice,
        event_tx.clone(),
    );
    let id = engine.session().id;

    tokio::spawn(ConversationRuntime::new(engine, command_rx).run());

    let handle = SessionHandle {
        id,
        commands: command_tx,
        events: event_tx,
    };
    (handle, event_rx)
}

// ============================================================================
// Handle
// ============================================================================

/// Cloneable front door to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn submit_text(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.dispatch(Event::typed(text)).await
    }

    pub async fn submit_quick_reply(&self, caption: impl Into<String>) -> Result<(), SessionError> {
        self.dispatch(Event::quick_reply(caption)).await
    }

    pub async fn submit_symptom(&self, caption: impl Into<String>) -> Result<(), SessionError> {
        self.dispatch(Event::symptom_chip(caption)).await
    }

    pub async fn submit_media(&self, kind: AttachmentKind) -> Result<(), SessionError> {
        self.dispatch(Event::Media { kind }).await
    }

    pub async fn consult_doctor(&self) -> Result<(), SessionError> {
        self.dispatch(Event::ConsultDoctor).await
    }

    pub async fn set_voice_enabled(&self, enabled: bool) -> Result<(), SessionError> {
        self.commands
            .send(Command::SetVoice(enabled))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Copy of the current session state
    pub async fn snapshot(&self) -> Result<Session, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Tear the session down. Safe to call more than once.
    pub async fn close(&self) {
        let _ = self.commands.send(Command::Close).await;
    }

    async fn dispatch(&self, event: Event) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { event, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Language, StaticCatalog};
    use crate::runtime::testing::RecordingVoice;
    use crate::runtime::NoopVoice;
    use crate::state_machine::Phase;
    use crate::transcript::Role;
    use tokio::sync::broadcast::error::TryRecvError;

    fn config(language: Language) -> EngineConfig {
        EngineConfig {
            language,
            ..EngineConfig::default()
        }
    }

    /// Receive until the next assistant message
    async fn next_assistant(rx: &mut broadcast::Receiver<SessionEvent>) -> String {
        loop {
            match rx.recv().await.unwrap() {
                SessionEvent::MessageAppended { message } if message.role == Role::Assistant => {
                    return message.content;
                }
                _ => {}
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn greets_and_answers_after_delay() {
        let (handle, mut rx) = spawn_session(&config(Language::En), Arc::new(StaticCatalog), NoopVoice);

        assert!(next_assistant(&mut rx).await.starts_with("Hello!"));

        let sent = tokio::time::Instant::now();
        handle.submit_symptom("Fever").await.unwrap();
        assert_eq!(
            next_assistant(&mut rx).await,
            "How long have you had this problem?"
        );
        assert!(sent.elapsed() >= Duration::from_millis(2500));

        let session = handle.snapshot().await.unwrap();
        assert_eq!(session.phase(), Phase::Duration);
        assert!(!session.composing);
        assert_eq!(session.id, handle.id());
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_input_is_reported() {
        let (handle, _rx) = spawn_session(&config(Language::Hi), Arc::new(StaticCatalog), NoopVoice);
        assert_eq!(
            handle.submit_text("  ").await.unwrap_err(),
            SessionError::Rejected(TransitionError::EmptyInput)
        );
        assert_eq!(
            handle.consult_doctor().await.unwrap_err(),
            SessionError::Rejected(TransitionError::HandOffUnavailable)
        );
        assert_eq!(handle.snapshot().await.unwrap().messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn voice_toggle_applies_to_later_messages() {
        let voice = RecordingVoice::new();
        let (handle, mut rx) =
            spawn_session(&config(Language::Pa), Arc::new(StaticCatalog), voice.clone());
        next_assistant(&mut rx).await;

        handle.set_voice_enabled(true).await.unwrap();
        handle.submit_text("ਖੰਘ").await.unwrap();
        next_assistant(&mut rx).await;

        let spoken = voice.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].language_tag, "pa-IN");
        assert!((spoken[0].rate - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn close_drops_pending_replies() {
        let (handle, mut rx) = spawn_session(&config(Language::En), Arc::new(StaticCatalog), NoopVoice);
        next_assistant(&mut rx).await;

        handle.submit_text("Fever").await.unwrap();
        handle.close().await;

        loop {
            match rx.recv().await.unwrap() {
                SessionEvent::Closed => break,
                SessionEvent::MessageAppended { message } => {
                    assert_eq!(message.role, Role::User);
                }
                _ => {}
            }
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty | TryRecvError::Closed)));
        assert_eq!(handle.submit_text("Today").await.unwrap_err(), SessionError::Closed);
        assert_eq!(handle.snapshot().await.unwrap_err(), SessionError::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_scheduler_never_fires() {
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = TokioScheduler::new(&tx);
        scheduler.schedule_after(Duration::from_millis(100), DeliveryId(1));
        scheduler.cancel_all();
        scheduler.schedule_after(Duration::from_millis(100), DeliveryId(2));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_delivers_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = TokioScheduler::new(&tx);
        scheduler.schedule_after(Duration::from_millis(1500), DeliveryId(7));

        match rx.recv().await {
            Some(Command::Deliver(id)) => assert_eq!(id, DeliveryId(7)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
