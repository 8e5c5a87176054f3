use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tarjimon_channels::TelegramTransport;
use tarjimon_media::{
    FfmpegDecoder, GoogleSpeechRecognizer, HttpPunctuator, TesseractOcr, TranscriptionPipeline,
};
use tarjimon_orchestrator::Orchestrator;
use tarjimon_session::{FileSessionStore, SessionStore};
use tarjimon_translate::{
    FallbackTranslator, GoogleTranslate, MyMemoryTranslate, TranslationProvider, YandexTranslate,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tarjimon", about = "Tarjimon — multi-modal translation bot")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "tarjimon.toml")]
    config: PathBuf,
}

#[derive(Deserialize)]
struct TarjimonConfig {
    #[serde(default)]
    telegram: TelegramConfig,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    providers: ProvidersConfig,
    #[serde(default)]
    media: MediaConfig,
}

#[derive(Deserialize, Default)]
struct TelegramConfig {
    /// Bot token; `TARJIMON_BOT_TOKEN` overrides this.
    #[serde(default)]
    bot_token: String,
    #[serde(default = "default_event_buffer")]
    event_buffer: usize,
}

#[derive(Deserialize, Default)]
struct ProvidersConfig {
    /// Yandex is only put in the chain when a key is configured.
    #[serde(default)]
    yandex_api_key: Option<String>,
    #[serde(default)]
    speech_api_key: String,
}

#[derive(Deserialize)]
struct MediaConfig {
    #[serde(default = "default_ffmpeg")]
    ffmpeg_path: PathBuf,
    #[serde(default = "default_tesseract")]
    tesseract_path: PathBuf,
    #[serde(default)]
    punctuation_url: Option<String>,
    #[serde(default = "default_download_dir")]
    download_dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            tesseract_path: default_tesseract(),
            punctuation_url: None,
            download_dir: default_download_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_event_buffer() -> usize {
    64
}
fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}
fn default_tesseract() -> PathBuf {
    PathBuf::from("tesseract")
}
fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Load config
    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let mut config: TarjimonConfig = toml::from_str(&config_str)?;

    if let Ok(token) = std::env::var("TARJIMON_BOT_TOKEN") {
        config.telegram.bot_token = token;
    }
    if config.telegram.bot_token.is_empty() {
        anyhow::bail!("No bot token: set telegram.bot_token or TARJIMON_BOT_TOKEN");
    }

    // Sessions
    let sessions = Arc::new(FileSessionStore::open(config.data_dir.join("sessions.json")).await?);

    // Provider chain, priority order
    let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();
    if let Some(key) = config.providers.yandex_api_key.clone() {
        providers.push(Box::new(YandexTranslate::new(key)));
    }
    providers.push(Box::new(GoogleTranslate::new()));
    providers.push(Box::new(MyMemoryTranslate::new()));
    info!(count = providers.len(), "Translation providers configured");
    let translator = FallbackTranslator::new(providers);

    // Media pipeline
    let decoder = Arc::new(FfmpegDecoder::new(&config.media.ffmpeg_path));
    let recognizer = Arc::new(GoogleSpeechRecognizer::new(
        config.providers.speech_api_key.clone(),
    ));
    let mut pipeline = TranscriptionPipeline::new(decoder, recognizer);

    let latin = TesseractOcr::latin(&config.media.tesseract_path);
    let cyrillic = TesseractOcr::cyrillic(&config.media.tesseract_path);
    if latin.probe().await && cyrillic.probe().await {
        info!("OCR readers ready");
        pipeline = pipeline.with_ocr(Arc::new(latin), Arc::new(cyrillic));
    } else {
        warn!("tesseract unavailable, photo translation will report service unavailable");
    }

    if let Some(url) = config.media.punctuation_url.clone() {
        pipeline = pipeline.with_punctuator(Arc::new(HttpPunctuator::new(url)));
    }

    // Transport
    let mut telegram = TelegramTransport::new(
        config.telegram.bot_token.clone(),
        config.telegram.event_buffer,
    );
    let mut events = telegram
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("Event receiver already taken"))?;
    let transport = Arc::new(telegram);

    transport.delete_webhook().await?;

    let orchestrator = Arc::new(Orchestrator::new(
        transport.clone(),
        sessions.clone(),
        translator,
        pipeline,
        config.media.download_dir.clone(),
    ));

    // Tell users whose requests were interrupted by the restart
    orchestrator.notify_interrupted().await;

    let poller = transport.clone();
    tokio::spawn(async move {
        if let Err(e) = poller.poll_updates().await {
            error!(error = %e, "Polling stopped");
        }
    });

    info!("Tarjimon is up, polling for updates");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, persisting sessions");
                if let Err(e) = sessions.persist_all().await {
                    error!(error = %e, "Final persist failed");
                }
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    warn!("Event stream closed");
                    break;
                };
                // One task per unit of work: requests from different users
                // interleave, each request is internally sequential.
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    if let Err(e) = orchestrator.handle_event(event).await {
                        error!(error = %e, "Event handling failed");
                    }
                });
            }
        }
    }

    Ok(())
}
