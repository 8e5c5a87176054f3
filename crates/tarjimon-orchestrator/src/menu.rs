//! Button labels, per-mode texts, and keyboard layouts. All user-facing
//! strings are Uzbek, matching the bot's audience.

use tarjimon_channels::Keyboard;
use tarjimon_core::{Direction, Modality};

pub const BTN_TEXT: &str = "✍️ Matn Tarjimasi";
pub const BTN_VOICE: &str = "🎙️ Ovoz Tarjimasi";
pub const BTN_VIDEO: &str = "🎬 Video Tarjimasi";
pub const BTN_PHOTO: &str = "🖼️ Rasmdan Tarjima";

pub const BTN_BACK_TO_MAIN: &str = "⬅️ Bosh menyu";
pub const BTN_HOME: &str = "🏠 Bosh menyu";
pub const BTN_BACK: &str = "⬅️ Orqaga";

pub const MAIN_MENU_BUTTONS: [&str; 4] = [BTN_TEXT, BTN_VOICE, BTN_VIDEO, BTN_PHOTO];

/// Direction button label → (source, target).
const DIRECTIONS: [(&str, &str, &str); 6] = [
    ("🇺🇿 UZ-RU 🇷🇺", "uz", "ru"),
    ("🇷🇺 RU-UZ 🇺🇿", "ru", "uz"),
    ("🇺🇿 UZ-EN 🇬🇧", "uz", "en"),
    ("🇬🇧 EN-UZ 🇺🇿", "en", "uz"),
    ("🇷🇺 RU-EN 🇬🇧", "ru", "en"),
    ("🇬🇧 EN-RU 🇷🇺", "en", "ru"),
];

pub fn mode_for_label(label: &str) -> Option<Modality> {
    match label {
        BTN_TEXT => Some(Modality::Text),
        BTN_VOICE => Some(Modality::Voice),
        BTN_VIDEO => Some(Modality::Video),
        BTN_PHOTO => Some(Modality::Photo),
        _ => None,
    }
}

/// Short label for an interrupted request's mode (startup notification).
pub fn mode_label(mode: Modality) -> &'static str {
    match mode {
        Modality::Text => "✍️ Matn tarjimasi",
        Modality::Voice => "🎙️ Ovoz tarjimasi",
        Modality::Video => "🎬 Video tarjimasi",
        Modality::Photo => "🖼️ Rasm tarjimasi",
    }
}

pub fn direction_for_label(label: &str) -> Option<Direction> {
    DIRECTIONS
        .iter()
        .find(|(l, _, _)| *l == label)
        .map(|(_, source, target)| Direction::new(*source, *target))
}

/// What to send once the direction is chosen.
pub fn instruction(mode: Modality) -> &'static str {
    match mode {
        Modality::Text => "Tarjima uchun matn yuboring:",
        Modality::Voice => "Tarjima uchun ovozli xabar yuboring:",
        Modality::Video => "Tarjima uchun video (20 MB gacha) yuboring:",
        Modality::Photo => "Tarjima uchun rasm yuboring:",
    }
}

pub fn main_menu_keyboard() -> Keyboard {
    Keyboard::from_buttons(&MAIN_MENU_BUTTONS, 2)
}

pub fn directions_keyboard() -> Keyboard {
    let labels: Vec<&str> = DIRECTIONS.iter().map(|(l, _, _)| *l).collect();
    Keyboard::from_buttons(&labels, 2).row(&[BTN_BACK_TO_MAIN])
}

/// Shown while a request is in flight: back to directions, or all the way home.
pub fn work_keyboard() -> Keyboard {
    Keyboard::from_buttons(&[BTN_BACK, BTN_HOME], 2)
}
