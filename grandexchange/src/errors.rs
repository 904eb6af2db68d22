use runequant::DbError;
use thiserror::Error;

// CollectorErrors
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed reading item mapping: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Failed loading configuration: {0}")]
    Config(#[from] envy::Error),
    #[error("Failed parsing HTML: {0}")]
    Html(String),
    #[error("Player count element not found")]
    PlayerCountNotFound,
    #[error("Could not extract player count from text: {0}")]
    PlayerCountUnparsable(String),
}

pub type Result<T> = std::result::Result<T, CollectorError>;
