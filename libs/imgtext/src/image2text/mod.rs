mod ocr;
pub use ocr::{decode_source, EngineInstance, OcrConfig, RecognitionEngine, TesseractEngine};
