use crate::session::UserSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tarjimon_core::{TarjimonError, TarjimonResult};
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Version tag of the on-disk session snapshot. Bump when `UserSession`
/// changes shape in a way the loader cannot absorb via serde defaults.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// The serialized form of the whole store: written wholesale on every
/// mutation, read wholesale at startup.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    #[serde(default)]
    sessions: HashMap<i64, UserSession>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Option<UserSession>;
    /// Insert or replace, then persist the full store.
    async fn set(&self, user_id: i64, session: UserSession) -> TarjimonResult<()>;
    /// Remove and persist. Deleting an absent session is a no-op.
    async fn delete(&self, user_id: i64) -> TarjimonResult<()>;
    /// Snapshot of every live session (startup recovery sweep).
    async fn load_all(&self) -> Vec<(i64, UserSession)>;
    /// Force a snapshot write (shutdown path).
    async fn persist_all(&self) -> TarjimonResult<()>;
}

/// File-backed session store: a single JSON snapshot, replaced atomically
/// on every mutation.
///
/// The in-memory map sits behind one mutex, so all mutations are
/// single-writer. Durability is best-effort — a failed persist leaves the
/// in-memory state authoritative and is reported to the caller, which is
/// expected to log and carry on.
pub struct FileSessionStore {
    path: PathBuf,
    sessions: Mutex<HashMap<i64, UserSession>>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading any existing snapshot. A missing
    /// file means an empty store; an unreadable or wrong-version file is
    /// logged and degrades to an empty store rather than failing startup.
    pub async fn open(path: impl Into<PathBuf>) -> TarjimonResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let sessions = match tokio::fs::read_to_string(&path).await {
            Ok(data) => match serde_json::from_str::<PersistedState>(&data) {
                Ok(state) if state.version == STATE_FORMAT_VERSION => state.sessions,
                Ok(state) => {
                    warn!(
                        found = state.version,
                        expected = STATE_FORMAT_VERSION,
                        "Unknown session snapshot version, starting empty"
                    );
                    HashMap::new()
                }
                Err(e) => {
                    error!(error = %e, path = %path.display(), "Unreadable session snapshot, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
        })
    }

    /// Write the full snapshot: serialize to a sibling temp file, then
    /// rename over the live one so readers never observe a torn write.
    async fn persist(&self, sessions: &HashMap<i64, UserSession>) -> TarjimonResult<()> {
        let state = PersistedState {
            version: STATE_FORMAT_VERSION,
            sessions: sessions.clone(),
        };
        let json = serde_json::to_string_pretty(&state)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| TarjimonError::Session(format!("Failed to write snapshot: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| TarjimonError::Session(format!("Failed to replace snapshot: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, user_id: i64) -> Option<UserSession> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    async fn set(&self, user_id: i64, session: UserSession) -> TarjimonResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(user_id, session);
        self.persist(&sessions).await
    }

    async fn delete(&self, user_id: i64) -> TarjimonResult<()> {
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(&user_id).is_none() {
            return Ok(());
        }
        self.persist(&sessions).await
    }

    async fn load_all(&self) -> Vec<(i64, UserSession)> {
        self.sessions
            .lock()
            .await
            .iter()
            .map(|(id, s)| (*id, s.clone()))
            .collect()
    }

    async fn persist_all(&self) -> TarjimonResult<()> {
        let sessions = self.sessions.lock().await;
        self.persist(&sessions).await
    }
}
