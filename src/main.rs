//! Terminal host for the symptom checker
//!
//! Reads one line per turn from stdin and prints session events to stdout.
//! Logs go to stderr.

use rural_healthconnect::catalog::{Language, PromptKey, PromptResolver, ReplySet, StaticCatalog};
use rural_healthconnect::config::{EngineConfig, OutputFormat};
use rural_healthconnect::runtime::{
    spawn_session, CommandVoice, NoopVoice, SessionEvent, SessionHandle, VoiceOutput,
};
use rural_healthconnect::state_machine::Phase;
use rural_healthconnect::transcript::{AttachmentKind, Role};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TTS_COMMAND: &str = "espeak-ng";

const HELP: &str = "Type your answer, or a number to pick an option.\n\
Commands: /photo /video /voice on|off /doctor /quit";

/// What the terminal currently offers as numbered options
struct Prompter {
    language: Language,
    catalog: Arc<dyn PromptResolver>,
    phase: Phase,
    options: Vec<String>,
}

impl Prompter {
    fn new(language: Language, catalog: Arc<dyn PromptResolver>) -> Self {
        Self {
            language,
            catalog,
            phase: Phase::Greeting,
            options: Vec::new(),
        }
    }

    fn chips(&self) -> Vec<String> {
        if self.phase == Phase::Greeting {
            self.catalog.captions(ReplySet::CommonSymptoms, self.language)
        } else {
            self.options.clone()
        }
    }

    /// Resolve "2" to the second option
    fn pick(&self, line: &str) -> Option<String> {
        let index: usize = line.parse().ok()?;
        self.chips().get(index.checked_sub(1)?).cloned()
    }

    fn render(&self, event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::MessageAppended { message } => Some(match message.role {
                Role::Assistant => format!("assistant> {}", message.content),
                Role::User => format!("you> {}", message.content),
            }),
            SessionEvent::ComposingChanged { composing: true } => Some("assistant is typing...".into()),
            SessionEvent::ComposingChanged { composing: false } => None,
            SessionEvent::PhaseAdvanced {
                step, total_steps, ..
            } => Some(format!(
                "-- {} --",
                self.catalog.progress(*step, *total_steps, self.language)
            )),
            SessionEvent::QuickRepliesChanged { .. } => {
                let chips = self.chips();
                if chips.is_empty() {
                    None
                } else {
                    Some(
                        chips
                            .iter()
                            .enumerate()
                            .map(|(i, c)| format!("  [{}] {c}", i + 1))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    )
                }
            }
            SessionEvent::HandOff { .. } => Some(format!(
                "==> {}",
                self.catalog.resolve(PromptKey::ConsultDoctor, self.language)
            )),
            SessionEvent::Closed => None,
        }
    }

    fn observe(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::PhaseAdvanced { phase, .. } => self.phase = *phase,
            SessionEvent::QuickRepliesChanged { captions } => self.options.clone_from(captions),
            _ => {}
        }
    }
}

fn select_voice(config: &EngineConfig) -> Arc<dyn VoiceOutput> {
    let command = config.tts_command.as_deref().unwrap_or(DEFAULT_TTS_COMMAND);
    match CommandVoice::locate(command) {
        Some(voice) => Arc::new(voice),
        None => Arc::new(NoopVoice),
    }
}

/// Returns false when the user asked to leave
async fn handle_line(handle: &SessionHandle, prompter: &Prompter, line: &str) -> bool {
    let result = match line {
        "/quit" | "/exit" => return false,
        "/help" => {
            println!("{HELP}");
            return true;
        }
        "/photo" => handle.submit_media(AttachmentKind::Photo).await,
        "/video" => handle.submit_media(AttachmentKind::Video).await,
        "/voice on" => handle.set_voice_enabled(true).await,
        "/voice off" => handle.set_voice_enabled(false).await,
        "/doctor" => handle.consult_doctor().await,
        _ => match prompter.pick(line) {
            Some(choice) if prompter.phase == Phase::Greeting => handle.submit_symptom(choice).await,
            Some(choice) => handle.submit_quick_reply(choice).await,
            None => handle.submit_text(line).await,
        },
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, input = line, "Input not accepted");
        eprintln!("({e})");
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rural_healthconnect=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        language = %config.language,
        voice = config.voice_enabled,
        output = ?config.output,
        "Starting symptom checker"
    );

    let catalog: Arc<dyn PromptResolver> = Arc::new(StaticCatalog);
    let voice = select_voice(&config);
    let (handle, mut events) = spawn_session(&config, Arc::clone(&catalog), voice);
    let mut prompter = Prompter::new(config.language, catalog);

    if config.output == OutputFormat::Text {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event stream lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                prompter.observe(&event);
                match config.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
                    OutputFormat::Text => {
                        if let Some(text) = prompter.render(&event) {
                            println!("{text}");
                        }
                    }
                }
                if matches!(event, SessionEvent::HandOff { .. } | SessionEvent::Closed) {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !handle_line(&handle, &prompter, line).await {
                    break;
                }
            }
        }
    }

    handle.close().await;
    Ok(())
}
