use thiserror::Error;

/// Main error type for Scigraph
#[derive(Error, Debug)]
pub enum ScigraphError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport errors (Wikipedia or LLM providers)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encode/decode errors (graph files, API payloads)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text-retrieval errors other than a plain missing page
    #[error("Text source error: {0}")]
    Fetch(String),

    /// LLM provider failures (timeout, bad status, unparseable response)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using ScigraphError
pub type Result<T> = std::result::Result<T, ScigraphError>;
