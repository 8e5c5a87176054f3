pub mod session;
pub mod store;

pub use session::{Stage, UserSession};
pub use store::{FileSessionStore, SessionStore, STATE_FORMAT_VERSION};
