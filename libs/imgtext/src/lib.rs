pub mod api;
pub mod config;
pub mod error;
pub mod image2text;
pub mod input;
pub mod logger;
pub mod process;
pub mod session;

pub use error::OcrError;
