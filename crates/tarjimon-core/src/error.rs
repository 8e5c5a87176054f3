use thiserror::Error;

pub type TarjimonResult<T> = Result<T, TarjimonError>;

#[derive(Error, Debug)]
pub enum TarjimonError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}
