use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tarjimon_core::{TarjimonError, TarjimonResult};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://www.google.com";

/// Speech-recognition collaborator boundary.
///
/// Always yields ranked transcript alternatives, best first — a recognizer
/// that only produces one transcript returns a single-element list. An
/// empty list means "no speech found", not an error.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, wav_path: &Path, locale: &str) -> TarjimonResult<Vec<String>>;
}

/// Google Web Speech API client (`speech-api/v2/recognize`).
pub struct GoogleSpeechRecognizer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

// ── Web Speech API response types ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    result: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternative: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    transcript: Option<String>,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl GoogleSpeechRecognizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(&self, wav_path: &Path, locale: &str) -> TarjimonResult<Vec<String>> {
        let audio = tokio::fs::read(wav_path).await?;

        let url = format!("{}/speech-api/v2/recognize", self.base_url);

        let resp = self
            .http
            .post(&url)
            .query(&[
                ("output", "json"),
                ("lang", locale),
                ("key", self.api_key.as_str()),
            ])
            .header("Content-Type", "audio/l16; rate=16000")
            .body(audio)
            .send()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TarjimonError::Media(format!(
                "Speech API error {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        // The endpoint streams newline-separated JSON objects; the first is
        // usually an empty {"result":[]} placeholder.
        let mut alternatives = Vec::new();
        for line in body.lines().filter(|l| !l.trim().is_empty()) {
            let parsed: SpeechResponse = match serde_json::from_str(line) {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "Skipping unparsable speech response line");
                    continue;
                }
            };
            for result in parsed.result {
                for alt in result.alternative {
                    if let Some(t) = alt.transcript {
                        let t = t.trim();
                        if !t.is_empty() {
                            alternatives.push(t.to_string());
                        }
                    }
                }
            }
        }

        Ok(alternatives)
    }
}
