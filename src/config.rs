//! Engine configuration
//!
//! Loaded from `HEALTHCONNECT_*` environment variables. Invalid values fall
//! back to the defaults with a warning. Delays are capped at [`MAX_DELAY`].

use crate::catalog::Language;
use std::time::Duration;

/// Longest accepted delay setting
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Simulated assistant latency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Reading time after every user turn
    pub reply_delay: Duration,
    /// Extra delay before the next question, on top of `reply_delay`
    pub prompt_delay: Duration,
    /// Intro, remedy and disclaimer offsets, each on top of `reply_delay`
    pub suggestion_offsets: [Duration; 3],
    /// Delay before acknowledging an uploaded photo or video
    pub media_ack_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1500),
            prompt_delay: Duration::from_millis(1000),
            suggestion_offsets: [
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3500),
            ],
            media_ack_delay: Duration::from_millis(1000),
        }
    }
}

impl Timing {
    /// Delay between a user turn and the next question
    pub fn question_delay(&self) -> Duration {
        self.reply_delay.saturating_add(self.prompt_delay)
    }

    /// Intro, remedy and disclaimer delays measured from the user turn
    pub fn suggestion_delays(&self) -> [Duration; 3] {
        self.suggestion_offsets
            .map(|offset| self.reply_delay.saturating_add(offset))
    }
}

/// How the terminal host prints session events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub language: Language,
    pub voice_enabled: bool,
    pub timing: Timing,
    /// Speech synthesis program name or path
    pub tts_command: Option<String>,
    pub output: OutputFormat,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(code) = lookup("HEALTHCONNECT_LANG") {
            config.language = Language::from_code(&code);
        }

        if let Some(raw) = lookup("HEALTHCONNECT_VOICE") {
            match parse_flag(&raw) {
                Some(enabled) => config.voice_enabled = enabled,
                None => tracing::warn!(value = %raw, "Ignoring invalid HEALTHCONNECT_VOICE"),
            }
        }

        if let Some(delay) = millis(&lookup, "HEALTHCONNECT_REPLY_DELAY_MS") {
            config.timing.reply_delay = delay;
        }
        if let Some(delay) = millis(&lookup, "HEALTHCONNECT_PROMPT_DELAY_MS") {
            config.timing.prompt_delay = delay;
        }
        if let Some(delay) = millis(&lookup, "HEALTHCONNECT_MEDIA_DELAY_MS") {
            config.timing.media_ack_delay = delay;
        }
        if let Some(offsets) = offsets(&lookup, "HEALTHCONNECT_SUGGESTION_OFFSETS_MS") {
            config.timing.suggestion_offsets = offsets;
        }

        config.tts_command = lookup("HEALTHCONNECT_TTS_COMMAND")
            .map(|cmd| cmd.trim().to_string())
            .filter(|cmd| !cmd.is_empty());

        if let Some(raw) = lookup("HEALTHCONNECT_OUTPUT") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "text" => config.output = OutputFormat::Text,
                "json" => config.output = OutputFormat::Json,
                _ => tracing::warn!(value = %raw, "Ignoring invalid HEALTHCONNECT_OUTPUT"),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(capped(key, Duration::from_millis(ms))),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid delay");
            None
        }
    }
}

/// Three comma-separated, non-decreasing millisecond values
fn offsets(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<[Duration; 3]> {
    let raw = lookup(key)?;
    let parsed: Result<Vec<u64>, _> = raw.split(',').map(|part| part.trim().parse::<u64>()).collect();
    let values = match parsed {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid offsets");
            return None;
        }
    };
    match <[u64; 3]>::try_from(values) {
        Ok(ms) if ms.windows(2).all(|w| w[0] <= w[1]) => {
            Some(ms.map(|v| capped(key, Duration::from_millis(v))))
        }
        _ => {
            tracing::warn!(key, value = %raw, "Expected three non-decreasing offsets");
            None
        }
    }
}

fn capped(key: &str, delay: Duration) -> Duration {
    if delay > MAX_DELAY {
        tracing::warn!(key, requested_ms = %delay.as_millis(), max_ms = %MAX_DELAY.as_millis(), "Capping delay");
        MAX_DELAY
    } else {
        delay
    }
}
