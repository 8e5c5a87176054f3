use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tarjimon_core::{TarjimonError, TarjimonResult};
use tracing::debug;

/// Decodes an arbitrary media container into a normalized waveform file
/// the speech recognizer can consume.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Produce a mono 16 kHz WAV next to `input` and return its path.
    async fn to_mono_wav(&self, input: &Path) -> TarjimonResult<PathBuf>;
}

/// ffmpeg-based decoder. Handles every container the original media can
/// arrive in (ogg voice notes, mp4 video) in one subprocess invocation.
pub struct FfmpegDecoder {
    binary: PathBuf,
    timeout: Duration,
}

impl FfmpegDecoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[async_trait]
impl AudioDecoder for FfmpegDecoder {
    async fn to_mono_wav(&self, input: &Path) -> TarjimonResult<PathBuf> {
        let output = PathBuf::from(format!("{}.wav", input.display()));

        debug!(input = %input.display(), "Decoding media to mono WAV");

        let result = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.binary)
                .arg("-y")
                .arg("-i")
                .arg(input)
                .args(["-vn", "-ac", "1", "-ar", "16000", "-f", "wav"])
                .arg(&output)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(out)) if out.status.success() => Ok(output),
            Ok(Ok(out)) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                let tail: String = stderr
                    .lines()
                    .rev()
                    .take(3)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect::<Vec<_>>()
                    .join(" | ");
                Err(TarjimonError::Media(format!(
                    "ffmpeg exited with {}: {}",
                    out.status, tail
                )))
            }
            Ok(Err(e)) => Err(TarjimonError::Media(format!(
                "Failed to run ffmpeg: {e}"
            ))),
            Err(_) => Err(TarjimonError::Media(format!(
                "ffmpeg timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
