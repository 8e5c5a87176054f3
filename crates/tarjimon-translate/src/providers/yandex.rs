use crate::provider::TranslationProvider;
use crate::providers::http_client;
use async_trait::async_trait;
use serde::Deserialize;
use tarjimon_core::{TarjimonError, TarjimonResult};

const DEFAULT_BASE_URL: &str = "https://translate.yandex.net";

/// Yandex Translate API (v1.5, keyed).
pub struct YandexTranslate {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

// ── Yandex API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct YandexResponse {
    code: u32,
    #[serde(default)]
    text: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl YandexTranslate {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl TranslationProvider for YandexTranslate {
    fn name(&self) -> &str {
        "Yandex"
    }

    async fn translate(&self, source: &str, target: &str, text: &str) -> TarjimonResult<String> {
        let url = format!("{}/api/v1.5/tr.json/translate", self.base_url);
        let lang = format!("{source}-{target}");

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str()), ("lang", &lang)])
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TarjimonError::Provider(format!(
                "Yandex API error {status}"
            )));
        }

        let body: YandexResponse = resp
            .json()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        if body.code != 200 {
            return Err(TarjimonError::Provider(format!(
                "Yandex rejected request ({}): {}",
                body.code,
                body.message.unwrap_or_default()
            )));
        }

        Ok(body.text.join(" "))
    }
}
