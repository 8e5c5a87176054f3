pub mod google;
pub mod mymemory;
pub mod yandex;

pub use google::GoogleTranslate;
pub use mymemory::MyMemoryTranslate;
pub use yandex::YandexTranslate;

use std::time::Duration;

/// Per-attempt HTTP timeout shared by all provider clients. A hung
/// provider call is bounded here, not by the fallback engine.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}
