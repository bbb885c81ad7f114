//! HTTP surface of the OCR pipeline.
//!
//! - `POST /api/image-to-text` - multipart upload, first part with a filename
//! - `POST /api/base64-to-text` - JSON `{ "base64Image": "..." }`
//! - `GET /`, `GET /ping`, `GET /health`

mod handlers;
pub use handlers::{base64_to_text, image_to_text};

mod types;
pub use types::{AppState, Base64Request, ResponseEnvelope};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route("/image-to-text", post(image_to_text))
        .route("/base64-to-text", post(base64_to_text));

    Router::new()
        .route("/", get(|| async { "welcome to base app" }))
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
