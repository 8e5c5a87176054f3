use crate::keyboard::Keyboard;
use async_trait::async_trait;
use std::path::Path;
use tarjimon_core::TarjimonResult;

/// Handle to a delivered message, good for later edits and deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// What a user sent, normalized at the transport boundary.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// A slash command, e.g. `/start`.
    Command(String),
    Text(String),
    Voice { file_id: String },
    Video { file_id: String, file_size: u64 },
    Photo { file_id: String },
}

/// One inbound unit of work from the chat transport.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub sender: i64,
    pub kind: EventKind,
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> TarjimonResult<MessageRef>;

    async fn edit_message(&self, message: &MessageRef, text: &str) -> TarjimonResult<()>;

    async fn delete_message(&self, message: &MessageRef) -> TarjimonResult<()>;

    /// Resolve an opaque file reference to a download URL.
    async fn file_url(&self, file_id: &str) -> TarjimonResult<String>;

    /// Download a URL into a local file.
    async fn download_to(&self, url: &str, dest: &Path) -> TarjimonResult<()>;
}
