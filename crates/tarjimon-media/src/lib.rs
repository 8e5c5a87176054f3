//! Media ingestion pipeline: acquire a binary media object, normalize it,
//! and produce recognized text via speech recognition or OCR — with
//! unconditional temp-file cleanup on every exit path.

pub mod audio;
pub mod dedup;
pub mod job;
pub mod ocr;
pub mod pipeline;
pub mod punctuate;
pub mod speech;

pub use audio::{AudioDecoder, FfmpegDecoder};
pub use dedup::{dedup_alternatives, is_similar, SIMILARITY_THRESHOLD};
pub use job::{MediaJob, TempGuard};
pub use ocr::{OcrReader, TesseractOcr};
pub use pipeline::{Transcription, TranscriptionPipeline};
pub use punctuate::{HttpPunctuator, Punctuator};
pub use speech::{GoogleSpeechRecognizer, SpeechRecognizer};
