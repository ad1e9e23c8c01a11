use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    /// Notion answered with a non-success status. `message` is relayed verbatim.
    #[error("{message}")]
    Notion { status: StatusCode, message: String },

    #[error("Missing Notion credentials")]
    Unauthorized,

    /// The flashcards backend answered with an `{error}` body.
    #[error("{0}")]
    Server(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for FlashcardError {
    fn from(error: std::io::Error) -> Self {
        FlashcardError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FlashcardError {
    fn from(error: reqwest::Error) -> Self {
        FlashcardError::Reqwest(Box::new(error))
    }
}
