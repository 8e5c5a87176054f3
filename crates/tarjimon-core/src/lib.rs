//! Shared vocabulary for the Tarjimon translation bot: the error type,
//! input modalities, translation directions, and locale mapping.

pub mod error;
pub mod lang;

pub use error::{TarjimonError, TarjimonResult};
pub use lang::{recognizer_locale, Direction, Modality};
