use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
