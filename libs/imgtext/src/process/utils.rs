use std::sync::Arc;
use tokio::sync::Semaphore;

use super::types::{ProcessorConfig, RecognitionResult};
use crate::error::OcrError;
use crate::image2text::RecognitionEngine;
use crate::input::ImageSource;
use crate::session::{with_session, SessionTracker};

/// Runs one recognition per call, each on its own freshly opened session.
#[derive(Clone)]
pub struct Recognizer {
    engine: Arc<dyn RecognitionEngine>,
    config: ProcessorConfig,
    tracker: Arc<SessionTracker>,
    admission: Option<Arc<Semaphore>>,
}

impl Recognizer {
    pub fn new(engine: Arc<dyn RecognitionEngine>, config: ProcessorConfig) -> Self {
        let admission = match config.max_sessions {
            0 => None,
            limit => Some(Arc::new(Semaphore::new(limit))),
        };
        log::info!(
            "Recognizer using {} engine, language {}, max sessions {}",
            engine.name(),
            config.language,
            if config.max_sessions == 0 { "unbounded".to_string() } else { config.max_sessions.to_string() }
        );
        Self {
            engine,
            config,
            tracker: Arc::new(SessionTracker::new()),
            admission,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Sessions currently open.
    pub fn live_sessions(&self) -> usize {
        self.tracker.live()
    }

    /// Sessions opened since this recognizer was created.
    pub fn opened_sessions(&self) -> u64 {
        self.tracker.opened()
    }

    /// Opens a session, loads the configured language, recognizes `source` and
    /// closes the session again.
    ///
    /// The session lives entirely inside a blocking task, so it is closed even
    /// when the calling future is dropped halfway.
    pub async fn recognize(
        &self,
        source: ImageSource,
        original_file: Option<String>,
    ) -> Result<RecognitionResult, OcrError> {
        let permit = match &self.admission {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| OcrError::EngineInit(e.to_string()))?,
            ),
            None => None,
        };

        let engine = self.engine.clone();
        let tracker = self.tracker.clone();
        let language = self.config.language.clone();

        let text = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            with_session(engine.as_ref(), &tracker, |session| {
                session.load_language(&language)?;
                session.recognize(&source)
            })
        })
        .await
        .map_err(|e| OcrError::Recognition(format!("recognition task failed: {}", e)))??;

        log::info!("Recognized {} characters", text.chars().count());
        Ok(RecognitionResult::new(text, original_file))
    }
}
