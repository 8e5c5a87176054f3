use serde::{Deserialize, Serialize};

/// The kind of user input a translation request carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Typed text.
    Text,
    /// A voice clip.
    Voice,
    /// A video clip (audio track is transcribed).
    Video,
    /// A photograph (text is read via OCR).
    Photo,
}

/// An ordered translation direction: source language → target language.
///
/// Language codes are ISO-639-1 (`uz`, `ru`, `en`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Direction {
    pub source: String,
    pub target: String,
}

impl Direction {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Human-readable arrow form, e.g. `UZ ➡️ RU`.
    pub fn arrow_label(&self) -> String {
        format!(
            "{} ➡️ {}",
            self.source.to_uppercase(),
            self.target.to_uppercase()
        )
    }
}

/// Maps an ISO-639-1 language code to the locale code the speech
/// recognizer expects. Unmapped languages fall back to a generic locale.
pub fn recognizer_locale(lang: &str) -> &'static str {
    match lang {
        "uz" => "uz-UZ",
        "ru" => "ru-RU",
        "en" => "en-US",
        _ => "en-US",
    }
}
