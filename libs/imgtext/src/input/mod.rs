mod types;
pub use types::ImageSource;

mod utils;
pub use utils::{normalize_base64, normalize_file, strip_data_uri_prefix};
pub use utils::{NO_BASE64_IMAGE, NO_FILE_UPLOADED};
