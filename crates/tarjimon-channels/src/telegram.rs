use crate::channel::{EventKind, InboundEvent, MessageRef, Transport};
use crate::keyboard::Keyboard;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tarjimon_core::{TarjimonError, TarjimonResult};
use tokio::sync::mpsc;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API transport.
///
/// Uses the Bot HTTP API for sending/editing messages and long-polling
/// (`getUpdates`) for receiving them. Incoming messages are normalized
/// into [`InboundEvent`]s and forwarded through a `tokio::sync::mpsc`
/// channel.
pub struct TelegramTransport {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
    event_tx: mpsc::Sender<InboundEvent>,
    event_rx: Option<mpsc::Receiver<InboundEvent>>,
}

// ── Telegram API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessagePayload>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessagePayload {
    #[allow(dead_code)]
    message_id: i64,
    chat: TelegramChat,
    text: Option<String>,
    voice: Option<TelegramFileRef>,
    video: Option<TelegramVideo>,
    photo: Option<Vec<TelegramPhotoSize>>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramFileRef {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct TelegramVideo {
    file_id: String,
    #[serde(default)]
    file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TelegramPhotoSize {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramFileInfo {
    file_path: Option<String>,
}

/// Normalize one Telegram message into an [`InboundEvent`].
///
/// Photos arrive as a size ladder; the last entry is the largest rendition
/// and the one worth downloading.
fn event_from_message(msg: TelegramMessagePayload) -> Option<InboundEvent> {
    let sender = msg.chat.id;

    let kind = if let Some(text) = msg.text {
        if text.starts_with('/') {
            EventKind::Command(text)
        } else {
            EventKind::Text(text)
        }
    } else if let Some(voice) = msg.voice {
        EventKind::Voice {
            file_id: voice.file_id,
        }
    } else if let Some(video) = msg.video {
        EventKind::Video {
            file_id: video.file_id,
            file_size: video.file_size.unwrap_or(0),
        }
    } else if let Some(photo) = msg.photo {
        let largest = photo.into_iter().next_back()?;
        EventKind::Photo {
            file_id: largest.file_id,
        }
    } else {
        return None;
    };

    Some(InboundEvent { sender, kind })
}

fn reply_markup(keyboard: &Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|text| serde_json::json!({ "text": text }))
                .collect()
        })
        .collect();

    serde_json::json!({
        "keyboard": rows,
        "resize_keyboard": true,
    })
}

// ── Implementation ──────────────────────────────────────────────────────────

impl TelegramTransport {
    /// Create a new `TelegramTransport`.
    ///
    /// * `bot_token` – The bot token obtained from @BotFather.
    /// * `event_buffer` – Capacity of the internal mpsc event buffer.
    pub fn new(bot_token: impl Into<String>, event_buffer: usize) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, bot_token, event_buffer)
    }

    /// Point the transport at a different API host (tests).
    pub fn with_base_url(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        event_buffer: usize,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer);
        Self {
            bot_token: bot_token.into(),
            api_base: api_base.into(),
            client: reqwest::Client::new(),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Take the receiving half of the event channel.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<InboundEvent>> {
        self.event_rx.take()
    }

    /// Drop any webhook registration and pending backlog before polling.
    pub async fn delete_webhook(&self) -> TarjimonResult<()> {
        let url = self.api_url("deleteWebhook");
        let body: TelegramResponse<serde_json::Value> = self
            .client
            .post(&url)
            .query(&[("drop_pending_updates", "true")])
            .send()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Telegram deleteWebhook error: {e}")))?
            .json()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(TarjimonError::Transport(format!(
                "Telegram deleteWebhook failed: {}",
                body.description.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Start long-polling the Telegram `getUpdates` endpoint.
    ///
    /// Runs indefinitely, forwarding every usable incoming message as an
    /// [`InboundEvent`] through the mpsc channel. Should be spawned onto
    /// a Tokio task.
    pub async fn poll_updates(&self) -> TarjimonResult<()> {
        let mut offset: Option<i64> = None;

        loop {
            let url = self.api_url("getUpdates");

            let mut params: Vec<(&str, String)> = vec![("timeout", "30".to_string())];
            if let Some(off) = offset {
                params.push(("offset", off.to_string()));
            }

            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| TarjimonError::Transport(format!("Telegram poll error: {e}")))?;

            let body: TelegramResponse<Vec<TelegramUpdate>> = response
                .json()
                .await
                .map_err(|e| TarjimonError::Transport(format!("Telegram parse error: {e}")))?;

            if !body.ok {
                return Err(TarjimonError::Transport(format!(
                    "Telegram API error: {}",
                    body.description.unwrap_or_default()
                )));
            }

            if let Some(updates) = body.result {
                for update in updates {
                    // Advance the offset so we do not receive this update again.
                    offset = Some(update.update_id + 1);

                    let Some(msg) = update.message else { continue };
                    let Some(event) = event_from_message(msg) else {
                        debug!("Skipping unsupported update payload");
                        continue;
                    };

                    // Best-effort send; if the receiver is dropped we stop.
                    if self.event_tx.send(event).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> TarjimonResult<T> {
        let url = self.api_url(method);

        let body: TelegramResponse<T> = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Telegram {method} error: {e}")))?
            .json()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Telegram parse error: {e}")))?;

        if !body.ok {
            return Err(TarjimonError::Transport(format!(
                "Telegram {method} failed: {}",
                body.description.unwrap_or_default()
            )));
        }

        body.result.ok_or_else(|| {
            TarjimonError::Transport(format!("Telegram {method}: empty result"))
        })
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> TarjimonResult<MessageRef> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(kb) = keyboard {
            payload["reply_markup"] = reply_markup(kb);
        }

        let sent: SentMessage = self.call("sendMessage", payload).await?;
        Ok(MessageRef {
            chat_id,
            message_id: sent.message_id,
        })
    }

    async fn edit_message(&self, message: &MessageRef, text: &str) -> TarjimonResult<()> {
        let payload = serde_json::json!({
            "chat_id": message.chat_id,
            "message_id": message.message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        let _: serde_json::Value = self.call("editMessageText", payload).await?;
        Ok(())
    }

    async fn delete_message(&self, message: &MessageRef) -> TarjimonResult<()> {
        let payload = serde_json::json!({
            "chat_id": message.chat_id,
            "message_id": message.message_id,
        });
        let _: serde_json::Value = self.call("deleteMessage", payload).await?;
        Ok(())
    }

    async fn file_url(&self, file_id: &str) -> TarjimonResult<String> {
        let payload = serde_json::json!({ "file_id": file_id });
        let info: TelegramFileInfo = self.call("getFile", payload).await?;

        let file_path = info.file_path.ok_or_else(|| {
            TarjimonError::Transport("Telegram getFile: no file_path in result".into())
        })?;

        Ok(format!(
            "{}/file/bot{}/{}",
            self.api_base, self.bot_token, file_path
        ))
    }

    async fn download_to(&self, url: &str, dest: &Path) -> TarjimonResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Download error: {e}")))?;

        if !response.status().is_success() {
            return Err(TarjimonError::Transport(format!(
                "Download failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TarjimonError::Transport(format!("Download read error: {e}")))?;

        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> TelegramMessagePayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_text_becomes_text_event() {
        let event = event_from_message(payload(serde_json::json!({
            "message_id": 1,
            "chat": { "id": 77 },
            "text": "Salom"
        })))
        .unwrap();

        assert_eq!(event.sender, 77);
        assert!(matches!(event.kind, EventKind::Text(ref t) if t == "Salom"));
    }

    #[test]
    fn test_slash_text_becomes_command() {
        let event = event_from_message(payload(serde_json::json!({
            "message_id": 1,
            "chat": { "id": 5 },
            "text": "/start"
        })))
        .unwrap();

        assert!(matches!(event.kind, EventKind::Command(ref c) if c == "/start"));
    }

    #[test]
    fn test_photo_picks_largest_rendition() {
        let event = event_from_message(payload(serde_json::json!({
            "message_id": 2,
            "chat": { "id": 5 },
            "photo": [
                { "file_id": "small" },
                { "file_id": "medium" },
                { "file_id": "large" }
            ]
        })))
        .unwrap();

        assert!(matches!(event.kind, EventKind::Photo { ref file_id } if file_id == "large"));
    }

    #[test]
    fn test_video_carries_declared_size() {
        let event = event_from_message(payload(serde_json::json!({
            "message_id": 3,
            "chat": { "id": 5 },
            "video": { "file_id": "vid", "file_size": 1234 }
        })))
        .unwrap();

        assert!(
            matches!(event.kind, EventKind::Video { ref file_id, file_size } if file_id == "vid" && file_size == 1234)
        );
    }

    #[test]
    fn test_unsupported_payload_is_skipped() {
        assert!(event_from_message(payload(serde_json::json!({
            "message_id": 4,
            "chat": { "id": 5 }
        })))
        .is_none());
    }
}
