use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tarjimon_core::{TarjimonError, TarjimonResult};
use tracing::debug;

/// OCR collaborator boundary: ordered paragraph groups read from an
/// image. One instance is tuned per script family.
#[async_trait]
pub trait OcrReader: Send + Sync {
    async fn read_lines(&self, image: &Path) -> TarjimonResult<Vec<String>>;
}

/// tesseract CLI reader. Language packs decide the script family:
/// `uzb+eng` for the Latin reader, `rus` for the Cyrillic one.
pub struct TesseractOcr {
    binary: PathBuf,
    languages: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn latin(binary: impl Into<PathBuf>) -> Self {
        Self::with_languages(binary, "uzb+eng")
    }

    pub fn cyrillic(binary: impl Into<PathBuf>) -> Self {
        Self::with_languages(binary, "rus")
    }

    pub fn with_languages(binary: impl Into<PathBuf>, languages: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            languages: languages.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Whether the tesseract binary is actually runnable. Checked once at
    /// startup so an uninstalled OCR stack is reported as "service
    /// unavailable" instead of failing every photo job.
    pub async fn probe(&self) -> bool {
        matches!(
            tokio::process::Command::new(&self.binary)
                .arg("--version")
                .output()
                .await,
            Ok(out) if out.status.success()
        )
    }
}

/// Split raw OCR output into paragraph groups: blank lines separate
/// groups, lines within a group are space-joined.
fn paragraph_groups(raw: &str) -> Vec<String> {
    raw.split("\n\n")
        .map(|block| {
            block
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|g| !g.is_empty())
        .collect()
}

#[async_trait]
impl OcrReader for TesseractOcr {
    async fn read_lines(&self, image: &Path) -> TarjimonResult<Vec<String>> {
        debug!(image = %image.display(), languages = %self.languages, "Running OCR");

        let result = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.binary)
                .arg(image)
                .arg("stdout")
                .args(["-l", &self.languages])
                .output(),
        )
        .await;

        match result {
            Ok(Ok(out)) if out.status.success() => {
                let stdout = String::from_utf8_lossy(&out.stdout);
                Ok(paragraph_groups(&stdout))
            }
            Ok(Ok(out)) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                Err(TarjimonError::Media(format!(
                    "tesseract exited with {}: {}",
                    out.status,
                    stderr.lines().next().unwrap_or_default()
                )))
            }
            Ok(Err(e)) => Err(TarjimonError::Media(format!(
                "Failed to run tesseract: {e}"
            ))),
            Err(_) => Err(TarjimonError::Media(format!(
                "tesseract timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
