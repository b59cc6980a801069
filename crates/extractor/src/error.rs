use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractorError>;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("{0}")]
    PdfError(String),

    #[error("Gemini API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Could not resolve model output: {0}")]
    ResolveError(String),

    #[error("Visualization error: {0}")]
    VisualizeError(String),

    #[error("Missing API Key.")]
    MissingApiKey,
}
