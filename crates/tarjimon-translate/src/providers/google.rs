use crate::provider::TranslationProvider;
use crate::providers::http_client;
use async_trait::async_trait;
use tarjimon_core::{TarjimonError, TarjimonResult};

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Google web translation endpoint (the keyless `gtx` client).
///
/// The response is an untyped nested array; the translated segments sit in
/// `body[0][n][0]` and are concatenated in order.
pub struct GoogleTranslate {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleTranslate {
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

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    fn name(&self) -> &str {
        "Google"
    }

    async fn translate(&self, source: &str, target: &str, text: &str) -> TarjimonResult<String> {
        let url = format!("{}/translate_a/single", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TarjimonError::Provider(format!(
                "Google API error {status}"
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TarjimonError::Http(e.to_string()))?;

        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| TarjimonError::Provider("Google: unexpected response shape".into()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        Ok(translated)
    }
}
