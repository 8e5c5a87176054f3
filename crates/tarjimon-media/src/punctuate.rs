use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tarjimon_core::{TarjimonError, TarjimonResult};

/// Punctuation-restoration collaborator. The pipeline applies it
/// best-effort: a restoration error falls back to the raw transcript.
#[async_trait]
pub trait Punctuator: Send + Sync {
    async fn restore(&self, text: &str) -> TarjimonResult<String>;
}

/// Client for a punctuation-restoration HTTP service.
pub struct HttpPunctuator {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct PunctuateRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PunctuateResponse {
    text: String,
}

impl HttpPunctuator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Punctuator for HttpPunctuator {
    async fn restore(&self, text: &str) -> TarjimonResult<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&PunctuateRequest { text })
            .send()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TarjimonError::Media(format!(
                "Punctuation service error {status}"
            )));
        }

        let body: PunctuateResponse = resp
            .json()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        Ok(body.text)
    }
}
