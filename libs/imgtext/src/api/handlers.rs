use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    Json,
};
use std::path::Path;
use tempfile::NamedTempFile;

use super::types::{AppState, Base64Request, ResponseEnvelope};
use crate::error::OcrError;
use crate::input::{normalize_base64, normalize_file, NO_FILE_UPLOADED};

/// Uploaded file kept on disk for the duration of one request.
struct StoredUpload {
    file: NamedTempFile,
    original_name: String,
}

/// POST /api/image-to-text
pub async fn image_to_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResponseEnvelope>, OcrError> {
    let upload = match multipart {
        Ok(multipart) => store_upload(multipart, &state.upload_dir).await?,
        Err(rejection) => {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                return Err(OcrError::PayloadTooLarge(rejection.body_text()));
            }
            log::warn!("Request body is not a multipart upload: {}", rejection);
            None
        }
    };

    let source = normalize_file(upload.as_ref().map(|upload| upload.file.path()))?;
    let original_name = upload.as_ref().map(|upload| upload.original_name.clone());
    log::info!("Processing uploaded image {:?}", original_name);

    let result = state.recognizer.recognize(source, original_name).await?;
    Ok(Json(ResponseEnvelope::success(result)))
}

/// POST /api/base64-to-text
pub async fn base64_to_text(
    State(state): State<AppState>,
    payload: Result<Json<Base64Request>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, OcrError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(OcrError::PayloadTooLarge(rejection.body_text()));
        }
        Err(rejection) => {
            log::warn!("Invalid base64 request body: {}", rejection);
            Base64Request::default()
        }
    };

    let source = normalize_base64(request.base64_image.as_deref())?;
    log::info!("Processing base64 image ({})", source.describe());

    let result = state.recognizer.recognize(source, None).await?;
    Ok(Json(ResponseEnvelope::success(result)))
}

/// Writes the first part carrying a filename to a temp file in `dir`.
async fn store_upload(mut multipart: Multipart, dir: &Path) -> Result<Option<StoredUpload>, OcrError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(err) => {
                log::warn!("Failed to read multipart body: {}", err);
                return Err(multipart_error(err));
            }
        };

        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let data = field.bytes().await.map_err(|err| {
            log::warn!("Failed to read uploaded file {}: {}", original_name, err);
            multipart_error(err)
        })?;

        let file = tempfile::Builder::new().prefix("upload-").tempfile_in(dir)?;
        tokio::fs::write(file.path(), &data).await?;
        log::debug!("Stored {} ({} bytes) at {}", original_name, data.len(), file.path().display());

        return Ok(Some(StoredUpload { file, original_name }));
    }
}

/// Oversized bodies keep their 413, any other broken body counts as no upload.
fn multipart_error(err: MultipartError) -> OcrError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        OcrError::PayloadTooLarge(err.body_text())
    } else {
        OcrError::missing_input(NO_FILE_UPLOADED)
    }
}
