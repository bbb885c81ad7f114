use axum::http::StatusCode;
use thiserror::Error;

/// Every failure the OCR pipeline can report back to a caller.
#[derive(Debug, Error)]
pub enum OcrError {
    /// No usable input arrived with the request.
    #[error("{0}")]
    MissingInput(String),

    #[error("Failed to initialize recognition engine: {0}")]
    EngineInit(String),

    #[error("Failed to load language model '{code}': {reason}")]
    LanguageLoad { code: String, reason: String },

    #[error("Failed to recognize image: {0}")]
    Recognition(String),

    #[error("Failed to decode base64 image: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A session operation was called out of order.
    #[error("Invalid session state: {0}")]
    InvalidSession(String),

    /// The request body went over the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Failed to store uploaded file: {0}")]
    Upload(#[from] std::io::Error),
}

impl OcrError {
    pub fn missing_input(message: impl Into<String>) -> Self {
        OcrError::MissingInput(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            OcrError::MissingInput(_) => StatusCode::BAD_REQUEST,
            OcrError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
