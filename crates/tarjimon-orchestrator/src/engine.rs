use crate::menu;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tarjimon_channels::{EventKind, InboundEvent, MessageRef, Transport};
use tarjimon_core::{Direction, Modality, TarjimonResult};
use tarjimon_media::{job::remove_stale, MediaJob, Transcription, TranscriptionPipeline};
use tarjimon_session::{SessionStore, UserSession};
use tarjimon_translate::FallbackTranslator;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Videos above this size are rejected before any download happens.
pub const MAX_VIDEO_BYTES: u64 = 20 * 1024 * 1024;

/// How long a terminal failure notice stays on screen before the status
/// message is cleaned up.
const FAILURE_NOTICE_SECS: u64 = 3;

const MSG_WELCOME: &str = "Assalomu alaykum! Kerakli bo'limni tanlang:";
const MSG_PICK_DIRECTION: &str = "Endi tarjima yo'nalishini tanlang:";
const MSG_PICK_DIRECTION_AGAIN: &str = "Tarjima yo'nalishini tanlang:";
const MSG_INVALID: &str =
    "Noto'g'ri buyruq. Iltimos, bosh menyudan kerakli bo'limni tanlang.";
const MSG_VIDEO_TOO_BIG: &str = "Kechirasiz, yuborgan video hajmi 20 MB dan katta.";
const MSG_RECEIVED: &str = "✅ Fayl qabul qilindi. Yuklab olinmoqda...";
const MSG_RECOGNIZING_PHOTO: &str = "🖼️ Rasmdagi matn aniqlanmoqda...";
const MSG_RECOGNIZING_AUDIO: &str = "🎵 Ovoz matnga o'girilmoqda...";
const MSG_TRANSLATING: &str = "⏳ Matn tarjima qilinmoqda...";
const MSG_TRANSLATE_FAILED: &str = "😔 Kechirasiz, tarjima qilishda xatolik yuz berdi.";
const MSG_RECOGNIZE_FAILED: &str = "❌ Matnni aniqlab bo'lmadi.";
const MSG_OCR_UNAVAILABLE: &str =
    "⚠️ OCR xizmati hozircha ishlamayapti. Keyinroq urinib ko'ring.";
const MSG_HOME: &str = "Bosh menyu";

fn guard_prompt(modality: Modality) -> &'static str {
    match modality {
        Modality::Text => MSG_INVALID,
        Modality::Voice => {
            "Ovozli tarjima uchun avval menyudan '🎙️ Ovoz Tarjimasi' bo'limini tanlang."
        }
        Modality::Video => {
            "Video tarjimasi uchun avval menyudan '🎬 Video Tarjimasi' bo'limini tanlang."
        }
        Modality::Photo => {
            "Rasm tarjimasi uchun avval menyudan '🖼️ Rasmdan Tarjima' bo'limini tanlang."
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Sequences one inbound unit of work: validates session state, drives
/// transcription for media, invokes the translation engine, formats the
/// response, and commits session transitions.
pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    sessions: Arc<dyn SessionStore>,
    translator: FallbackTranslator,
    media: TranscriptionPipeline,
    download_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        sessions: Arc<dyn SessionStore>,
        translator: FallbackTranslator,
        media: TranscriptionPipeline,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transport,
            sessions,
            translator,
            media,
            download_dir: download_dir.into(),
        }
    }

    /// Handle one inbound event. Collaborator failures inside the
    /// translation and transcription paths are absorbed below this level;
    /// what surfaces here are transport delivery errors.
    pub async fn handle_event(&self, event: InboundEvent) -> TarjimonResult<()> {
        let user = event.sender;
        match event.kind {
            EventKind::Command(cmd) if cmd == "/start" || cmd.starts_with("/start ") => {
                self.go_home(user).await
            }
            EventKind::Command(cmd) => {
                debug!(user, command = %cmd, "Unknown command");
                self.invalid_input(user).await
            }
            EventKind::Text(text) => self.handle_text(user, text).await,
            EventKind::Voice { file_id } => {
                self.handle_media(user, Modality::Voice, &file_id, "ogg", None)
                    .await
            }
            EventKind::Video { file_id, file_size } => {
                self.handle_media(user, Modality::Video, &file_id, "mp4", Some(file_size))
                    .await
            }
            EventKind::Photo { file_id } => {
                self.handle_media(user, Modality::Photo, &file_id, "jpg", None)
                    .await
            }
        }
    }

    /// On startup, invite every user with a persisted in-flight session to
    /// resume. Users we cannot reach are dropped from the store.
    pub async fn notify_interrupted(&self) {
        for (user, session) in self.sessions.load_all().await {
            if session.stage().is_none() {
                continue;
            }
            let Some(mode) = session.mode else { continue };

            let mut text = format!(
                "🤖 Bot qayta ishga tushdi!\n\n🔹 Sizning oxirgi so'rovingiz: {}",
                menu::mode_label(mode)
            );
            if let Some(direction) = &session.direction {
                text.push_str(&format!("\n🔹 Yo'nalish: {}", direction.arrow_label()));
            }
            text.push_str("\n\nIltimos, so'rovingizni davom ettiring yoki yangisini boshlang.");

            if let Err(e) = self
                .transport
                .send_message(user, &text, Some(&menu::main_menu_keyboard()))
                .await
            {
                warn!(user, error = %e, "Unreachable user, dropping interrupted session");
                self.clear_session(user).await;
            }
        }
    }

    // ── Menu flow ────────────────────────────────────────────────────────

    async fn go_home(&self, user: i64) -> TarjimonResult<()> {
        self.clear_session(user).await;
        self.transport
            .send_message(user, MSG_WELCOME, Some(&menu::main_menu_keyboard()))
            .await?;
        Ok(())
    }

    async fn invalid_input(&self, user: i64) -> TarjimonResult<()> {
        self.transport
            .send_message(user, MSG_INVALID, Some(&menu::main_menu_keyboard()))
            .await?;
        Ok(())
    }

    async fn select_mode(&self, user: i64, mode: Modality) -> TarjimonResult<()> {
        if let Err(e) = self.sessions.set(user, UserSession::with_mode(mode)).await {
            error!(user, error = %e, "Session persist failed, continuing in memory");
        }
        self.transport
            .send_message(user, MSG_PICK_DIRECTION, Some(&menu::directions_keyboard()))
            .await?;
        Ok(())
    }

    async fn select_direction(&self, user: i64, direction: Direction) -> TarjimonResult<()> {
        // A direction without a chosen mode means the flow was never
        // started (or was cleared): restart from the main menu.
        let Some(mut session) = self.sessions.get(user).await else {
            return self.go_home(user).await;
        };
        let Some(mode) = session.mode else {
            return self.go_home(user).await;
        };

        session.select_direction(direction);
        if let Err(e) = self.sessions.set(user, session).await {
            error!(user, error = %e, "Session persist failed, continuing in memory");
        }

        self.transport
            .send_message(user, menu::instruction(mode), Some(&menu::work_keyboard()))
            .await?;
        Ok(())
    }

    async fn handle_text(&self, user: i64, text: String) -> TarjimonResult<()> {
        if text == menu::BTN_BACK_TO_MAIN || text == menu::BTN_HOME {
            return self.go_home(user).await;
        }
        if let Some(mode) = menu::mode_for_label(&text) {
            return self.select_mode(user, mode).await;
        }
        if let Some(direction) = menu::direction_for_label(&text) {
            return self.select_direction(user, direction).await;
        }
        if text == menu::BTN_BACK {
            self.transport
                .send_message(
                    user,
                    MSG_PICK_DIRECTION_AGAIN,
                    Some(&menu::directions_keyboard()),
                )
                .await?;
            return Ok(());
        }

        // Free text: only valid as translation input
        match self.sessions.get(user).await {
            Some(session) if session.accepts(Modality::Text) => {
                self.run_translation(user, &text, None).await
            }
            _ => self.invalid_input(user).await,
        }
    }

    // ── Translation flow ─────────────────────────────────────────────────

    /// Translate `text` for `user` and deliver the formatted result. The
    /// session is cleared afterwards whether the engine produced text or
    /// not; only transport failures propagate.
    async fn run_translation(
        &self,
        user: i64,
        text: &str,
        status: Option<MessageRef>,
    ) -> TarjimonResult<()> {
        let Some(direction) = self
            .sessions
            .get(user)
            .await
            .and_then(|s| s.direction)
        else {
            return Ok(());
        };

        let status = match status {
            Some(existing) => {
                if let Err(e) = self.transport.edit_message(&existing, MSG_TRANSLATING).await {
                    debug!(user, error = %e, "Status edit failed");
                }
                existing
            }
            None => {
                self.transport
                    .send_message(user, MSG_TRANSLATING, None)
                    .await?
            }
        };

        let outcome = self
            .translator
            .translate(text, &direction.source, &direction.target)
            .await;

        if let Err(e) = self.transport.delete_message(&status).await {
            debug!(user, error = %e, "Status delete failed");
        }

        let response = match (&outcome.text, &outcome.provider) {
            (Some(translated), Some(provider)) => {
                info!(user, provider = %provider, "Translation delivered");
                format!(
                    "<b>Tarjima ({provider}):</b>\n\n{}",
                    escape_html(translated)
                )
            }
            _ => MSG_TRANSLATE_FAILED.to_string(),
        };

        self.transport
            .send_message(user, &response, Some(&menu::main_menu_keyboard()))
            .await?;
        self.clear_session(user).await;
        Ok(())
    }

    // ── Media flow ───────────────────────────────────────────────────────

    async fn handle_media(
        &self,
        user: i64,
        modality: Modality,
        file_id: &str,
        ext: &str,
        declared_size: Option<u64>,
    ) -> TarjimonResult<()> {
        let session = self.sessions.get(user).await;
        let Some(session) = session.filter(|s| s.accepts(modality)) else {
            self.transport
                .send_message(user, guard_prompt(modality), Some(&menu::main_menu_keyboard()))
                .await?;
            return Ok(());
        };
        let Some(direction) = session.direction else {
            return Ok(());
        };

        // Oversized video: reject before touching the network. The session
        // stays as is so the user can resubmit a smaller file.
        if let Some(size) = declared_size {
            if size > MAX_VIDEO_BYTES {
                info!(user, size, "Rejecting oversized video");
                self.transport
                    .send_message(user, MSG_VIDEO_TOO_BIG, None)
                    .await?;
                return Ok(());
            }
        }

        let status = self.transport.send_message(user, MSG_RECEIVED, None).await?;

        if let Err(e) = tokio::fs::create_dir_all(&self.download_dir).await {
            error!(error = %e, "Could not create download dir");
            return self.fail_media(user, status, MSG_RECOGNIZE_FAILED).await;
        }
        // Per-request namespacing: concurrent jobs never share a path.
        let local_path = self
            .download_dir
            .join(format!("{}.{}", Uuid::new_v4(), ext));
        remove_stale(&local_path);

        let downloaded = async {
            let url = self.transport.file_url(file_id).await?;
            self.transport.download_to(&url, &local_path).await
        }
        .await;

        if let Err(e) = downloaded {
            warn!(user, error = %e, "Media download failed");
            remove_stale(&local_path);
            return self.fail_media(user, status, MSG_RECOGNIZE_FAILED).await;
        }

        let recognizing = match modality {
            Modality::Photo => MSG_RECOGNIZING_PHOTO,
            _ => MSG_RECOGNIZING_AUDIO,
        };
        if let Err(e) = self.transport.edit_message(&status, recognizing).await {
            debug!(user, error = %e, "Status edit failed");
        }

        let job = MediaJob {
            file_id: file_id.to_string(),
            local_path,
            modality,
            source_lang: direction.source.clone(),
        };

        match self.media.transcribe(&job).await {
            Transcription::Recognized(text) => {
                self.transport
                    .send_message(
                        user,
                        &format!("<b>Aniqlangan matn:</b>\n<i>{}</i>", escape_html(&text)),
                        None,
                    )
                    .await?;
                self.run_translation(user, &text, Some(status)).await
            }
            Transcription::Failed => self.fail_media(user, status, MSG_RECOGNIZE_FAILED).await,
            Transcription::ServiceUnavailable => {
                self.fail_media(user, status, MSG_OCR_UNAVAILABLE).await
            }
        }
    }

    /// Terminal media failure: show the notice briefly, clean up the
    /// status message, clear the half-finished session, return to the
    /// idle menu.
    async fn fail_media(
        &self,
        user: i64,
        status: MessageRef,
        message: &str,
    ) -> TarjimonResult<()> {
        if let Err(e) = self.transport.edit_message(&status, message).await {
            warn!(user, error = %e, "Failure notice edit failed");
        }
        tokio::time::sleep(Duration::from_secs(FAILURE_NOTICE_SECS)).await;
        if let Err(e) = self.transport.delete_message(&status).await {
            debug!(user, error = %e, "Status delete failed");
        }

        self.clear_session(user).await;
        self.transport
            .send_message(user, MSG_HOME, Some(&menu::main_menu_keyboard()))
            .await?;
        Ok(())
    }

    /// Clear the user's session, tolerating both absence and persist
    /// failure (in-memory state stays authoritative).
    async fn clear_session(&self, user: i64) {
        if let Err(e) = self.sessions.delete(user).await {
            error!(user, error = %e, "Session persist failed, continuing in memory");
        }
    }
}
