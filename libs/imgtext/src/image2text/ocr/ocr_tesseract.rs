use image::{DynamicImage, ImageReader};
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use std::io::Cursor;

use super::types::OcrConfig;
use super::{EngineInstance, RecognitionEngine};
use crate::error::OcrError;
use crate::input::ImageSource;

/// Tesseract-backed engine. Every instance drives the local `tesseract` install.
#[derive(Clone, Debug, Default)]
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn create(&self) -> Result<Box<dyn EngineInstance>, OcrError> {
        Ok(Box::new(TesseractInstance::new(self.config.clone())))
    }
}

struct TesseractInstance {
    config: OcrConfig,
    installed_langs: Vec<String>,
    args: Option<Args>,
}

impl TesseractInstance {
    fn new(config: OcrConfig) -> Self {
        Self {
            config,
            installed_langs: Vec::new(),
            args: None,
        }
    }

    fn build_args(&self, lang: &str) -> Args {
        Args {
            lang: lang.to_string(),
            config_variables: HashMap::new(),
            dpi: Some(self.config.dpi.unwrap_or(OcrConfig::get_default_dpi()) as i32),
            psm: Some(self.config.psm.unwrap_or(OcrConfig::get_default_psm()) as i32),
            oem: Some(self.config.oem.unwrap_or(OcrConfig::get_default_oem()) as i32),
        }
    }
}

impl EngineInstance for TesseractInstance {
    fn load(&mut self) -> Result<(), OcrError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| OcrError::EngineInit(e.to_string()))?;
        log::debug!("Using tesseract {}", version.lines().next().unwrap_or_default());

        self.installed_langs = rusty_tesseract::get_tesseract_langs()
            .map_err(|e| OcrError::EngineInit(e.to_string()))?;
        Ok(())
    }

    fn load_language(&mut self, code: &str) -> Result<(), OcrError> {
        if !self.installed_langs.iter().any(|lang| lang == code) {
            return Err(OcrError::LanguageLoad {
                code: code.to_string(),
                reason: format!("not installed (available: {})", self.installed_langs.join(", ")),
            });
        }
        self.args = Some(self.build_args(code));
        Ok(())
    }

    fn recognize(&mut self, source: &ImageSource) -> Result<String, OcrError> {
        let args = self
            .args
            .as_ref()
            .ok_or_else(|| OcrError::InvalidSession("no language loaded".to_string()))?;

        let image = decode_source(source)?;
        let ocr_image = Image::from_dynamic_image(&image)
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        rusty_tesseract::image_to_string(&ocr_image, args)
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }

    fn terminate(&mut self) -> Result<(), OcrError> {
        self.args = None;
        self.installed_langs.clear();
        Ok(())
    }
}

/// Decodes an image source, sniffing the format from content rather than extension.
pub fn decode_source(source: &ImageSource) -> Result<DynamicImage, OcrError> {
    let decoded = match source {
        ImageSource::Path(path) => ImageReader::open(path)
            .map_err(|e| OcrError::Recognition(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| OcrError::Recognition(e.to_string()))?
            .decode(),
        ImageSource::Bytes(bytes) => ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| OcrError::Recognition(e.to_string()))?
            .decode(),
    };
    decoded.map_err(|e| OcrError::Recognition(format!("unreadable image data: {}", e)))
}
