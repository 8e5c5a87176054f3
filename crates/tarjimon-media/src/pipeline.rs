use crate::audio::AudioDecoder;
use crate::dedup::dedup_alternatives;
use crate::job::{MediaJob, TempGuard};
use crate::ocr::OcrReader;
use crate::punctuate::Punctuator;
use crate::speech::SpeechRecognizer;
use std::sync::Arc;
use tarjimon_core::{recognizer_locale, Modality};
use tracing::{error, info, warn};

/// What a media job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Recognized(String),
    /// Decode or recognition failed, or the media contained no text.
    Failed,
    /// The OCR subsystem never initialized; distinct from a plain failure
    /// so the caller can show a specific message.
    ServiceUnavailable,
}

/// Turns downloaded media into text.
///
/// Every collaborator error is caught here and mapped to a
/// [`Transcription`] value; nothing propagates to the caller. The job's
/// local input file — and any waveform derived from it — is removed
/// unconditionally once processing ends.
pub struct TranscriptionPipeline {
    decoder: Arc<dyn AudioDecoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    ocr: Option<(Arc<dyn OcrReader>, Arc<dyn OcrReader>)>,
    punctuator: Option<Arc<dyn Punctuator>>,
}

impl TranscriptionPipeline {
    pub fn new(decoder: Arc<dyn AudioDecoder>, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            decoder,
            recognizer,
            ocr: None,
            punctuator: None,
        }
    }

    /// Attach the per-script OCR readers, Latin first.
    pub fn with_ocr(mut self, latin: Arc<dyn OcrReader>, cyrillic: Arc<dyn OcrReader>) -> Self {
        self.ocr = Some((latin, cyrillic));
        self
    }

    pub fn with_punctuator(mut self, punctuator: Arc<dyn Punctuator>) -> Self {
        self.punctuator = Some(punctuator);
        self
    }

    pub async fn transcribe(&self, job: &MediaJob) -> Transcription {
        let mut guard = TempGuard::new(&job.local_path);

        match job.modality {
            Modality::Photo => self.image_to_text(job).await,
            _ => self.audio_to_text(job, &mut guard).await,
        }
    }

    async fn audio_to_text(&self, job: &MediaJob, guard: &mut TempGuard) -> Transcription {
        let wav = match self.decoder.to_mono_wav(&job.local_path).await {
            Ok(wav) => wav,
            Err(e) => {
                error!(file = %job.local_path.display(), error = %e, "Could not decode media");
                return Transcription::Failed;
            }
        };
        guard.track(&wav);

        let locale = recognizer_locale(&job.source_lang);
        let alternatives = match self.recognizer.recognize(&wav, locale).await {
            Ok(alts) => alts,
            Err(e) => {
                warn!(error = %e, "Speech recognition failed");
                return Transcription::Failed;
            }
        };

        let kept = dedup_alternatives(alternatives);
        if kept.is_empty() {
            return Transcription::Failed;
        }
        let text = kept.join(". ");

        Transcription::Recognized(self.punctuate(text).await)
    }

    async fn image_to_text(&self, job: &MediaJob) -> Transcription {
        let Some((latin, cyrillic)) = &self.ocr else {
            error!("OCR readers are not initialized");
            return Transcription::ServiceUnavailable;
        };

        let mut groups = Vec::new();
        for reader in [latin, cyrillic] {
            match reader.read_lines(&job.local_path).await {
                Ok(lines) => groups.extend(lines),
                Err(e) => {
                    error!(error = %e, "OCR pass failed");
                    return Transcription::Failed;
                }
            }
        }

        if groups.is_empty() {
            return Transcription::Failed;
        }

        Transcription::Recognized(groups.join(" "))
    }

    /// Best-effort punctuation restoration: any error falls back to the
    /// raw transcript.
    async fn punctuate(&self, text: String) -> String {
        let Some(punctuator) = &self.punctuator else {
            return text;
        };

        match punctuator.restore(&text).await {
            Ok(restored) => {
                info!("Punctuation restored");
                restored
            }
            Err(e) => {
                warn!(error = %e, "Punctuation restoration failed, keeping raw text");
                text
            }
        }
    }
}
