use thiserror::Error;

#[derive(Error, Debug)]
pub enum TomoxError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("relayer error: {0}")]
    Relayer(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("missing data in response from {0}")]
    MissingData(String),

    #[error("overflow: {0}")]
    Overflow(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, TomoxError>;
