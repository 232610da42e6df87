use thiserror::Error;

/// Why a transport payload could not be turned into articles.
/// Always recovered per payload: the event is counted as failed and skipped.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an article object or an array of them, got {0}")]
    UnexpectedShape(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
