#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    /// Language model every session loads before recognizing.
    pub language: String,
    /// Upper bound on concurrently open sessions, `0` for unbounded.
    pub max_sessions: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            max_sessions: 0,
        }
    }
}

impl ProcessorConfig {
    pub fn new(language: impl Into<String>, max_sessions: usize) -> Self {
        Self {
            language: language.into(),
            max_sessions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionResult {
    text: String,
    original_file: Option<String>,
}

impl RecognitionResult {
    pub fn new(text: String, original_file: Option<String>) -> Self {
        Self { text, original_file }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original_file(&self) -> Option<&str> {
        self.original_file.as_deref()
    }

    pub fn into_parts(self) -> (String, Option<String>) {
        (self.text, self.original_file)
    }
}
