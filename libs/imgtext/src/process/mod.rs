mod types;
pub use types::{ProcessorConfig, RecognitionResult};

mod utils;
pub use utils::Recognizer;
