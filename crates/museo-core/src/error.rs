use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to write batch snapshot: {0}")]
    Sink(#[from] SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems detected while assembling a catalog client, before any request is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing catalog API key (set HAM_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("invalid catalog base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Any failure to obtain raw records from the catalog.
///
/// Callers treat every variant the same way: the pipeline aborts and nothing
/// partial is returned.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("catalog responded with status {status}")]
    Status { status: u16 },

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("could not read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raised when a statistics input cannot be read as a finite number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {value} to a number")]
pub struct ConversionError {
    pub value: String,
}

pub type Result<T> = std::result::Result<T, Error>;
