use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::OcrError;
use crate::process::{RecognitionResult, Recognizer};

#[derive(Clone)]
pub struct AppState {
    pub recognizer: Recognizer,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(recognizer: Recognizer, upload_dir: PathBuf) -> Self {
        Self { recognizer, upload_dir }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Base64Request {
    #[serde(rename = "base64Image", default)]
    pub base64_image: Option<String>,
}

/// Uniform JSON body for every OCR response.
///
/// Exactly one of `text` and `error` is set. Rejected requests (400) carry
/// only `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(result: RecognitionResult) -> Self {
        let (text, original_file) = result.into_parts();
        Self {
            success: Some(true),
            text: Some(text),
            original_file,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            text: None,
            original_file: None,
            error: Some(error.into()),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: None,
            text: None,
            original_file: None,
            error: Some(error.into()),
        }
    }
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status.is_client_error() {
            log::warn!("Rejected OCR request: {}", self);
            ResponseEnvelope::rejected(self.to_string())
        } else {
            log::error!("OCR error: {}", self);
            ResponseEnvelope::failure(self.to_string())
        };
        (status, Json(body)).into_response()
    }
}
