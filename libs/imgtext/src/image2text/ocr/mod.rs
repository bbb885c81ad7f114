// OCR module structure
mod ocr_tesseract;
pub use ocr_tesseract::{decode_source, TesseractEngine};

mod types;
pub use types::OcrConfig;

use crate::error::OcrError;
use crate::input::ImageSource;

/// Factory for recognition engine instances.
///
/// Implementations must hand out a fresh, unshared instance on every call.
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Allocates a new engine instance.
    fn create(&self) -> Result<Box<dyn EngineInstance>, OcrError>;
}

/// One engine instance, driven by a session through its lifecycle.
pub trait EngineInstance: Send {
    /// Loads the engine core. Called once, right after `create`.
    fn load(&mut self) -> Result<(), OcrError>;

    fn load_language(&mut self, code: &str) -> Result<(), OcrError>;

    /// Blocking; callers keep this off the async executor.
    fn recognize(&mut self, source: &ImageSource) -> Result<String, OcrError>;

    /// Frees everything the instance holds.
    fn terminate(&mut self) -> Result<(), OcrError>;
}
