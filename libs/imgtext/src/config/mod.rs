mod types;
pub use types::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
