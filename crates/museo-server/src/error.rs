use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Server error: {0}")]
    Server(String),

    #[error("Catalog request failed: {0}")]
    Transport(#[from] museo_core::error::TransportError),

    #[error("Report generation failed: {0}")]
    Report(#[from] museo_report::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
