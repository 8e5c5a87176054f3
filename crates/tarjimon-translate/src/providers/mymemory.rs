use crate::provider::TranslationProvider;
use crate::providers::http_client;
use async_trait::async_trait;
use serde::Deserialize;
use tarjimon_core::{TarjimonError, TarjimonResult};

const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";

/// MyMemory translation memory API.
pub struct MyMemoryTranslate {
    http: reqwest::Client,
    base_url: String,
}

// ── MyMemory API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
    /// A number on success, a quoted error string on failure.
    #[serde(rename = "responseStatus", default)]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    fn status_ok(&self) -> bool {
        self.response_status.as_u64() == Some(200)
            || self.response_status.as_str() == Some("200")
    }
}

// ── Implementation ──────────────────────────────────────────────────────────

impl MyMemoryTranslate {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MyMemoryTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryTranslate {
    fn name(&self) -> &str {
        "MyMemory"
    }

    async fn translate(&self, source: &str, target: &str, text: &str) -> TarjimonResult<String> {
        let url = format!("{}/get", self.base_url);
        let langpair = format!("{source}|{target}");

        let resp = self
            .http
            .get(&url)
            .query(&[("q", text), ("langpair", &langpair)])
            .send()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TarjimonError::Provider(format!(
                "MyMemory API error {status}"
            )));
        }

        let body: MyMemoryResponse = resp
            .json()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        if !body.status_ok() {
            return Err(TarjimonError::Provider(format!(
                "MyMemory rejected request: {}",
                body.response_details.unwrap_or_default()
            )));
        }

        body.response_data
            .and_then(|d| d.translated_text)
            .ok_or_else(|| TarjimonError::Provider("MyMemory: no translation in response".into()))
    }
}
