use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tarjimon_core::{Direction, Modality};

/// Where a session sits in the mode → direction selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ModeSelected,
    DirectionSelected,
}

/// Per-user translation request state.
///
/// A session exists only while a request is in flight: it is created when
/// the user picks a mode, gains a direction when they pick one, and is
/// deleted once the translation completes (or terminally fails). A session
/// with neither field set never reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSession {
    #[serde(default)]
    pub mode: Option<Modality>,
    #[serde(default)]
    pub direction: Option<Direction>,
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    /// Start a fresh session with the given mode selected.
    pub fn with_mode(mode: Modality) -> Self {
        Self {
            mode: Some(mode),
            direction: None,
            updated_at: Utc::now(),
        }
    }

    /// Re-selecting a mode restarts the flow: any previously chosen
    /// direction is discarded.
    pub fn select_mode(&mut self, mode: Modality) {
        self.mode = Some(mode);
        self.direction = None;
        self.updated_at = Utc::now();
    }

    pub fn select_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
        self.updated_at = Utc::now();
    }

    pub fn stage(&self) -> Option<Stage> {
        match (&self.mode, &self.direction) {
            (Some(_), Some(_)) => Some(Stage::DirectionSelected),
            (Some(_), None) => Some(Stage::ModeSelected),
            _ => None,
        }
    }

    /// Whether a unit of work with the declared modality may be accepted.
    ///
    /// Input is only valid once the direction is chosen and the declared
    /// modality matches the mode the session was started with.
    pub fn accepts(&self, modality: Modality) -> bool {
        self.stage() == Some(Stage::DirectionSelected) && self.mode == Some(modality)
    }
}
