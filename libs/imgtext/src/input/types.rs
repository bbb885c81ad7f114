use std::path::PathBuf;

/// Normalized image input handed to a recognition session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Image stored on the local filesystem.
    Path(PathBuf),
    /// Decoded image bytes, never a data-URI string.
    Bytes(Vec<u8>),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => format!("file {}", path.display()),
            ImageSource::Bytes(bytes) => format!("{} bytes", bytes.len()),
        }
    }
}
