use crate::chunk::split_text;
use crate::provider::TranslationProvider;
use tracing::{info, warn};

/// Literal text substituted for a chunk when every provider failed on it.
/// The chunk keeps its position so the rest of the response stays in order.
pub const FAILURE_MARKER: &str = "[Tarjima xatosi]";

/// Result of translating one unit of work.
///
/// `text` is `None` only when the input was empty (a no-op) or when every
/// provider failed on every chunk; per-chunk failure is masked with
/// [`FAILURE_MARKER`] instead of aborting the whole result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: Option<String>,
    pub provider: Option<String>,
}

/// Translates text through an ordered provider chain, chunk by chunk.
///
/// Chunks are processed strictly sequentially and in order. For each chunk
/// the providers are tried in priority order; an error or an
/// empty/whitespace-only reply advances to the next provider, and the first
/// non-empty result wins. Provider failures are fully absorbed — this
/// engine never returns an error to its caller.
pub struct FallbackTranslator {
    providers: Vec<Box<dyn TranslationProvider>>,
}

impl FallbackTranslator {
    /// Create a new fallback translator with the given provider chain.
    ///
    /// # Panics
    /// Panics if `providers` is empty.
    pub fn new(providers: Vec<Box<dyn TranslationProvider>>) -> Self {
        assert!(
            !providers.is_empty(),
            "FallbackTranslator requires at least one provider"
        );
        Self { providers }
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// The credited provider is the one that produced the most recent
    /// successful chunk; if no chunk ever succeeded the outcome carries
    /// neither text nor provider.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> TranslationOutcome {
        let chunks = split_text(text);
        if chunks.is_empty() {
            return TranslationOutcome::default();
        }

        let mut parts = Vec::with_capacity(chunks.len());
        let mut credited: Option<String> = None;

        for (idx, chunk) in chunks.iter().enumerate() {
            let mut translated: Option<String> = None;

            for provider in &self.providers {
                match provider.translate(source, target, chunk).await {
                    Ok(reply) if !reply.trim().is_empty() => {
                        info!(chunk = idx, provider = provider.name(), "Chunk translated");
                        translated = Some(reply.trim().to_string());
                        credited = Some(provider.name().to_string());
                        break;
                    }
                    Ok(_) => {
                        warn!(chunk = idx, provider = provider.name(), "Empty translation");
                    }
                    Err(e) => {
                        warn!(
                            chunk = idx,
                            provider = provider.name(),
                            error = %e,
                            "Provider failed"
                        );
                    }
                }
            }

            match translated {
                Some(part) => parts.push(part),
                None => {
                    warn!(chunk = idx, "All providers exhausted for chunk");
                    parts.push(FAILURE_MARKER.to_string());
                }
            }
        }

        if credited.is_none() {
            // Every chunk fell through the whole chain
            return TranslationOutcome::default();
        }

        TranslationOutcome {
            text: Some(parts.join(" ")),
            provider: credited,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tarjimon_core::{TarjimonError, TarjimonResult};

    /// A mock provider: fails the first `fail_first` calls, then echoes
    /// the chunk with a prefix. Counts every invocation.
    struct MockProvider {
        name: &'static str,
        fail_first: u32,
        calls: Arc<AtomicU32>,
    }

    impl MockProvider {
        fn new(name: &'static str, fail_first: u32) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    name,
                    fail_first,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn translate(
            &self,
            _source: &str,
            _target: &str,
            text: &str,
        ) -> TarjimonResult<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(TarjimonError::Provider(format!("{} down", self.name)))
            } else {
                Ok(format!("{}:{}", self.name, text))
            }
        }
    }

    /// Always succeeds with a fixed reply.
    struct FixedProvider(&'static str, &'static str);

    #[async_trait]
    impl TranslationProvider for FixedProvider {
        fn name(&self) -> &str {
            self.0
        }

        async fn translate(&self, _s: &str, _t: &str, _x: &str) -> TarjimonResult<String> {
            Ok(self.1.to_string())
        }
    }

    #[tokio::test]
    async fn empty_input_is_a_noop() {
        let (p, _) = MockProvider::new("A", 0);
        let engine = FallbackTranslator::new(vec![Box::new(p)]);

        let outcome = engine.translate("   ", "uz", "ru").await;
        assert_eq!(outcome, TranslationOutcome::default());
    }

    #[tokio::test]
    async fn first_provider_wins_when_healthy() {
        let (a, a_calls) = MockProvider::new("A", 0);
        let (b, b_calls) = MockProvider::new("B", 0);
        let engine = FallbackTranslator::new(vec![Box::new(a), Box::new(b)]);

        let outcome = engine.translate("salom", "uz", "ru").await;
        assert_eq!(outcome.provider.as_deref(), Some("A"));
        assert_eq!(outcome.text.as_deref(), Some("A:salom"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_credits_second_and_never_calls_third() {
        let (a, _) = MockProvider::new("A", u32::MAX);
        let (b, _) = MockProvider::new("B", 0);
        let (c, c_calls) = MockProvider::new("C", 0);
        let engine = FallbackTranslator::new(vec![Box::new(a), Box::new(b), Box::new(c)]);

        let outcome = engine.translate("salom", "uz", "ru").await;
        assert_eq!(outcome.provider.as_deref(), Some("B"));
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_reply_is_treated_as_failure() {
        let empty = FixedProvider("Empty", "   ");
        let (b, _) = MockProvider::new("B", 0);
        let engine = FallbackTranslator::new(vec![Box::new(empty), Box::new(b)]);

        let outcome = engine.translate("salom", "uz", "ru").await;
        assert_eq!(outcome.provider.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn failed_chunk_keeps_its_position() {
        // Provider fails exactly on the middle chunk (second call) and
        // succeeds on the first and third.
        struct MiddleChunkFails {
            calls: AtomicU32,
        }

        #[async_trait]
        impl TranslationProvider for MiddleChunkFails {
            fn name(&self) -> &str {
                "Flaky"
            }

            async fn translate(&self, _s: &str, _t: &str, text: &str) -> TarjimonResult<String> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                if call == 1 {
                    Err(TarjimonError::Provider("middle chunk refused".into()))
                } else {
                    Ok(format!("ok:{}", text.split_whitespace().count()))
                }
            }
        }

        // 75 words → exactly three chunks
        let text = (0..75).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let engine = FallbackTranslator::new(vec![Box::new(MiddleChunkFails {
            calls: AtomicU32::new(0),
        })]);

        let outcome = engine.translate(&text, "en", "ru").await;
        let joined = outcome.text.unwrap();
        assert_eq!(joined, format!("ok:25 {FAILURE_MARKER} ok:25"));
    }

    #[tokio::test]
    async fn credited_provider_is_the_last_to_succeed() {
        // A serves only the first chunk, then goes down; B picks up the rest.
        struct FirstCallOnly {
            calls: AtomicU32,
        }

        #[async_trait]
        impl TranslationProvider for FirstCallOnly {
            fn name(&self) -> &str {
                "A"
            }

            async fn translate(&self, _s: &str, _t: &str, text: &str) -> TarjimonResult<String> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(format!("A:{text}"))
                } else {
                    Err(TarjimonError::Provider("A exhausted".into()))
                }
            }
        }

        let (b, _) = MockProvider::new("B", 0);
        let text = (0..50).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let engine = FallbackTranslator::new(vec![
            Box::new(FirstCallOnly {
                calls: AtomicU32::new(0),
            }),
            Box::new(b),
        ]);

        let outcome = engine.translate(&text, "en", "ru").await;
        assert_eq!(outcome.provider.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn total_failure_reports_nothing() {
        let (a, _) = MockProvider::new("A", u32::MAX);
        let (b, _) = MockProvider::new("B", u32::MAX);
        let engine = FallbackTranslator::new(vec![Box::new(a), Box::new(b)]);

        let outcome = engine.translate("salom dunyo", "uz", "ru").await;
        assert!(outcome.text.is_none());
        assert!(outcome.provider.is_none());
    }
}
