use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::path::Path;

use super::types::ImageSource;
use crate::error::OcrError;

pub const NO_FILE_UPLOADED: &str = "No file uploaded";
pub const NO_BASE64_IMAGE: &str = "No base64 image provided";

const DATA_URI_HEAD: &str = "data:image/";
const DATA_URI_TAIL: &str = ";base64,";

// clients frequently drop the trailing padding
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn normalize_file(path: Option<&Path>) -> Result<ImageSource, OcrError> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => Ok(ImageSource::Path(path.to_path_buf())),
        _ => Err(OcrError::missing_input(NO_FILE_UPLOADED)),
    }
}

pub fn normalize_base64(raw: Option<&str>) -> Result<ImageSource, OcrError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(OcrError::missing_input(NO_BASE64_IMAGE)),
    };

    // url-safe payloads decode the same as standard ones
    let payload: String = strip_data_uri_prefix(raw)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let bytes = LENIENT_STANDARD.decode(payload)?;
    log::debug!("Decoded base64 image into {} bytes", bytes.len());
    Ok(ImageSource::Bytes(bytes))
}

/// Removes a leading `data:image/<subtype>;base64,` prefix, if there is one.
///
/// Only the first prefix is removed and `<subtype>` must be made of word
/// characters. Anything else is returned untouched.
pub fn strip_data_uri_prefix(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix(DATA_URI_HEAD) else {
        return raw;
    };

    let subtype_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if subtype_len == 0 {
        return raw;
    }

    rest[subtype_len..].strip_prefix(DATA_URI_TAIL).unwrap_or(raw)
}
