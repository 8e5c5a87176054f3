pub mod channel;
pub mod keyboard;
pub mod telegram;

pub use channel::{EventKind, InboundEvent, MessageRef, Transport};
pub use keyboard::Keyboard;
pub use telegram::TelegramTransport;
