//! Localized prompt catalog
//!
//! The conversation engine never reads string tables directly. It asks a
//! [`PromptResolver`] for every caption it emits, keyed by [`PromptKey`] and
//! [`Language`]. [`StaticCatalog`] is the built-in resolver backed by the
//! English, Punjabi and Hindi tables in `tables`.

mod tables;

use crate::transcript::AttachmentKind;
use serde::{Deserialize, Serialize};
use tables::Strings;

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Pa,
    Hi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Pa, Language::Hi];

    /// Parse a language code. Region suffixes are ignored (`pa-IN` is `pa`)
    /// and unrecognized codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "pa" => Language::Pa,
            "hi" => Language::Hi,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pa => "pa",
            Language::Hi => "hi",
        }
    }

    /// BCP 47 tag handed to speech synthesis
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::En => "en-IN",
            Language::Pa => "pa-IN",
            Language::Hi => "hi-IN",
        }
    }

    fn strings(self) -> &'static Strings {
        match self {
            Language::En => &tables::EN,
            Language::Pa => &tables::PA,
            Language::Hi => &tables::HI,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Symptoms offered as one-tap chips on the greeting screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Fever,
    Cough,
    Headache,
    BodyPain,
    StomachPain,
    Rash,
    EyeProblem,
    EarProblem,
    Cold,
    SoreThroat,
}

impl Symptom {
    /// Chip order
    pub const COMMON: [Symptom; 10] = [
        Symptom::Fever,
        Symptom::Cough,
        Symptom::Headache,
        Symptom::BodyPain,
        Symptom::StomachPain,
        Symptom::Rash,
        Symptom::EyeProblem,
        Symptom::EarProblem,
        Symptom::Cold,
        Symptom::SoreThroat,
    ];

    /// Lower-case English lookup key
    pub fn key(self) -> &'static str {
        match self {
            Symptom::Fever => "fever",
            Symptom::Cough => "cough",
            Symptom::Headache => "headache",
            Symptom::BodyPain => "body pain",
            Symptom::StomachPain => "stomach pain",
            Symptom::Rash => "rash",
            Symptom::EyeProblem => "eye problem",
            Symptom::EarProblem => "ear problem",
            Symptom::Cold => "cold",
            Symptom::SoreThroat => "sore throat",
        }
    }

    fn index(self) -> usize {
        Self::COMMON
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }
}

/// Which remedy template closes the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remedy {
    /// Warm fluids, rest, see a doctor if the fever rises
    Medium,
    /// Hydration, rest, see a doctor if symptoms persist
    Default,
}

/// Single-caption prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
    Greeting,
    DurationQuestion,
    SeverityQuestion,
    FollowUpFallback,
    SuggestionIntro,
    Remedy(Remedy),
    Disclaimer,
    MediaUploaded(AttachmentKind),
    MediaReceived(AttachmentKind),
    ConsultDoctor,
}

/// Caption lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplySet {
    Duration,
    Severity,
    YesNo,
    CommonSymptoms,
}

/// Resolves localized captions for the conversation engine
pub trait PromptResolver: Send + Sync {
    fn resolve(&self, key: PromptKey, language: Language) -> String;

    /// Symptom-specific follow-up question, if the table has one
    fn follow_up(&self, symptom: Symptom, language: Language) -> Option<String>;

    fn captions(&self, set: ReplySet, language: Language) -> Vec<String>;

    /// "Step 2 of 5" in the given language
    fn progress(&self, step: u8, total: u8, language: Language) -> String;

    /// Exact (trimmed, case-insensitive) match of free text against a
    /// symptom's English key or its chip caption in any language
    fn recognize(&self, text: &str) -> Option<Symptom>;

    /// Whether free text mentions the symptom anywhere, in any language
    fn mentions(&self, text: &str, symptom: Symptom) -> bool;
}

/// Resolver backed by the built-in tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    fn aliases(symptom: Symptom) -> impl Iterator<Item = String> {
        std::iter::once(symptom.key().to_string()).chain(
            Language::ALL
                .into_iter()
                .map(move |lang| lang.strings().common_symptoms[symptom.index()].to_lowercase()),
        )
    }
}

impl PromptResolver for StaticCatalog {
    fn resolve(&self, key: PromptKey, language: Language) -> String {
        let t = language.strings();
        let text = match key {
            PromptKey::Greeting => t.greeting,
            PromptKey::DurationQuestion => t.duration_question,
            PromptKey::SeverityQuestion => t.severity_question,
            PromptKey::FollowUpFallback => t.follow_up_fallback,
            PromptKey::SuggestionIntro => t.suggestion_intro,
            PromptKey::Remedy(Remedy::Medium) => t.remedy_medium,
            PromptKey::Remedy(Remedy::Default) => t.remedy_default,
            PromptKey::Disclaimer => t.disclaimer,
            PromptKey::MediaUploaded(AttachmentKind::Photo) => t.photo_uploaded,
            PromptKey::MediaUploaded(AttachmentKind::Video) => t.video_uploaded,
            PromptKey::MediaReceived(AttachmentKind::Photo) => t.photo_received,
            PromptKey::MediaReceived(AttachmentKind::Video) => t.video_received,
            PromptKey::ConsultDoctor => t.consult_doctor,
        };
        text.to_string()
    }

    fn follow_up(&self, symptom: Symptom, language: Language) -> Option<String> {
        let t = language.strings();
        match symptom {
            Symptom::Fever => Some(t.follow_up_fever),
            Symptom::Cough => Some(t.follow_up_cough),
            Symptom::Headache => Some(t.follow_up_headache),
            _ => None,
        }
        .map(str::to_string)
    }

    fn captions(&self, set: ReplySet, language: Language) -> Vec<String> {
        let t = language.strings();
        let captions: &[&str] = match set {
            ReplySet::Duration => &t.duration_options,
            ReplySet::Severity => &t.severity_options,
            ReplySet::YesNo => &t.yes_no,
            ReplySet::CommonSymptoms => &t.common_symptoms,
        };
        captions.iter().map(|c| (*c).to_string()).collect()
    }

    fn progress(&self, step: u8, total: u8, language: Language) -> String {
        let t = language.strings();
        format!("{} {step} {} {total}", t.step, t.of)
    }

    fn recognize(&self, text: &str) -> Option<Symptom> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Symptom::COMMON
            .into_iter()
            .find(|symptom| Self::aliases(*symptom).any(|alias| alias == needle))
    }

    fn mentions(&self, text: &str, symptom: Symptom) -> bool {
        let haystack = text.to_lowercase();
        Self::aliases(symptom).any(|alias| haystack.contains(&alias))
    }
}
