use async_trait::async_trait;
use tarjimon_core::TarjimonResult;

/// Trait for machine-translation provider backends.
///
/// Each provider (Yandex, Google, MyMemory, ...) implements this trait to
/// handle its API communication. The fallback engine only ever sees the
/// trait object.
///
/// To add a new provider:
/// 1. Create a new module in `providers/`
/// 2. Implement `TranslationProvider` for your struct
/// 3. Put it in the chain the binary builds in priority order
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short display name, credited to the user in the final response.
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target` (ISO-639-1 codes).
    async fn translate(&self, source: &str, target: &str, text: &str) -> TarjimonResult<String>;
}
