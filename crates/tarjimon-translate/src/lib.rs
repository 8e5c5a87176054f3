//! Translation fallback engine: bounded-chunk splitting plus ordered
//! provider failover, so arbitrarily long text survives unreliable
//! third-party translation services.

pub mod chunk;
pub mod fallback;
pub mod provider;
pub mod providers;

pub use chunk::{split_text, MAX_CHUNK_WORDS};
pub use fallback::{FallbackTranslator, TranslationOutcome, FAILURE_MARKER};
pub use provider::TranslationProvider;
pub use providers::{GoogleTranslate, MyMemoryTranslate, YandexTranslate};
