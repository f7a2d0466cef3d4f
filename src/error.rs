use thiserror::Error;

/// Errors raised by the codecs, the selectors and package ingestion.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid position '{fen}': {reason}")]
    InvalidPosition { fen: String, reason: String },
    #[error("invalid move '{0}'")]
    InvalidMove(String),
    #[error("normalized evaluation {0} outside (-1, 1)")]
    EvaluationDomain(f64),
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("learning record '{key}' rejected: {source}")]
    LearningRecord {
        key: String,
        #[source]
        source: Box<Error>,
    },
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_position(fen: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPosition { fen: fen.to_string(), reason: reason.into() }
    }

    pub(crate) fn learning_record(key: &str, source: Error) -> Self {
        Error::LearningRecord { key: key.to_string(), source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
