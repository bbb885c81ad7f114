#[derive(Clone, Debug, Default)]
pub struct OcrConfig {
    pub dpi: Option<u32>, // dots per inch
    pub psm: Option<u32>, // Page segmentation mode
    pub oem: Option<u32>, // OCR Engine Mode
}

impl OcrConfig {
    pub fn new(dpi: Option<u32>, psm: Option<u32>, oem: Option<u32>) -> Self {
        Self { dpi, psm, oem }
    }

    pub fn get_default_dpi() -> u32 {
        150
    }

    // fully automatic page segmentation, no OSD
    pub fn get_default_psm() -> u32 {
        3
    }

    // whatever engine the installed tesseract supports
    pub fn get_default_oem() -> u32 {
        3
    }
}
