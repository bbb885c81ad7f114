use std::sync::Arc;

use super::types::{SessionState, SessionTracker};
use crate::error::OcrError;
use crate::image2text::{EngineInstance, RecognitionEngine};
use crate::input::ImageSource;

/// A single-use recognition engine instance bound to one request.
///
/// Moves strictly through `Created -> Loaded -> Ready(lang) -> Terminated`.
/// A session that is dropped before `close` releases itself on drop.
pub struct Session {
    id: u64,
    state: SessionState,
    instance: Box<dyn EngineInstance>,
    tracker: Arc<SessionTracker>,
}

impl Session {
    /// Allocates an engine instance and loads the engine core.
    pub fn open(engine: &dyn RecognitionEngine, tracker: &Arc<SessionTracker>) -> Result<Self, OcrError> {
        let instance = engine.create()?;
        let id = tracker.register();
        let mut session = Session {
            id,
            state: SessionState::Created,
            instance,
            tracker: tracker.clone(),
        };
        log::debug!("Session {} created ({})", id, engine.name());

        if let Err(err) = session.instance.load() {
            if let Err(close_err) = session.close() {
                log::error!("Failed to release session {} after load failure: {}", id, close_err);
            }
            return Err(err);
        }
        session.state = SessionState::Loaded;
        Ok(session)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn load_language(&mut self, code: &str) -> Result<(), OcrError> {
        if self.state != SessionState::Loaded {
            return Err(self.out_of_order("load_language"));
        }
        self.instance.load_language(code)?;
        self.state = SessionState::Ready(code.to_string());
        log::debug!("Session {} ready with language {}", self.id, code);
        Ok(())
    }

    pub fn recognize(&mut self, source: &ImageSource) -> Result<String, OcrError> {
        if !matches!(self.state, SessionState::Ready(_)) {
            return Err(self.out_of_order("recognize"));
        }
        log::debug!("Session {} recognizing {}", self.id, source.describe());
        self.instance.recognize(source)
    }

    /// Releases the engine instance. Must be called exactly once.
    pub fn close(&mut self) -> Result<(), OcrError> {
        if self.state == SessionState::Terminated {
            return Err(self.out_of_order("close"));
        }
        self.state = SessionState::Terminated;
        self.tracker.release();
        log::debug!("Session {} terminated", self.id);
        self.instance.terminate()
    }

    fn out_of_order(&self, operation: &str) -> OcrError {
        log::error!("Session {}: {} called while {}", self.id, operation, self.state);
        OcrError::InvalidSession(format!("{} called while session is {}", operation, self.state))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        log::warn!("Session {} dropped while {}, releasing it", self.id, self.state);
        if let Err(err) = self.close() {
            log::error!("Failed to release session {} on drop: {}", self.id, err);
        }
    }
}

/// Opens a session, runs `body` with it and closes it on every exit path.
///
/// A failing `close` is logged on its own and never replaces the body's outcome.
pub fn with_session<T, F>(engine: &dyn RecognitionEngine, tracker: &Arc<SessionTracker>, body: F) -> Result<T, OcrError>
where
    F: FnOnce(&mut Session) -> Result<T, OcrError>,
{
    let mut session = Session::open(engine, tracker)?;
    let outcome = body(&mut session);
    if let Err(err) = session.close() {
        log::error!("Failed to release session {}: {}", session.id(), err);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls {
        log: Mutex<Vec<String>>,
    }

    impl Calls {
        fn push(&self, call: &str) {
            self.log.lock().unwrap().push(call.to_string());
        }

        fn count(&self, call: &str) -> usize {
            self.log.lock().unwrap().iter().filter(|c| *c == call).count()
        }

        fn snapshot(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct ScriptedEngine {
        calls: Arc<Calls>,
        fail_create: bool,
        fail_load: bool,
        fail_terminate: bool,
    }

    struct ScriptedInstance {
        calls: Arc<Calls>,
        fail_load: bool,
        fail_terminate: bool,
    }

    impl RecognitionEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn create(&self) -> Result<Box<dyn EngineInstance>, OcrError> {
            if self.fail_create {
                return Err(OcrError::EngineInit("out of memory".into()));
            }
            self.calls.push("create");
            Ok(Box::new(ScriptedInstance {
                calls: self.calls.clone(),
                fail_load: self.fail_load,
                fail_terminate: self.fail_terminate,
            }))
        }
    }

    impl EngineInstance for ScriptedInstance {
        fn load(&mut self) -> Result<(), OcrError> {
            self.calls.push("load");
            if self.fail_load {
                return Err(OcrError::EngineInit("native init failed".into()));
            }
            Ok(())
        }

        fn load_language(&mut self, code: &str) -> Result<(), OcrError> {
            self.calls.push("load_language");
            if code != "eng" {
                return Err(OcrError::LanguageLoad { code: code.into(), reason: "missing".into() });
            }
            Ok(())
        }

        fn recognize(&mut self, source: &ImageSource) -> Result<String, OcrError> {
            self.calls.push("recognize");
            match source {
                ImageSource::Bytes(bytes) if bytes.is_empty() => Err(OcrError::Recognition("empty".into())),
                _ => Ok("HELLO".to_string()),
            }
        }

        fn terminate(&mut self) -> Result<(), OcrError> {
            self.calls.push("terminate");
            if self.fail_terminate {
                return Err(OcrError::Recognition("terminate failed".into()));
            }
            Ok(())
        }
    }

    fn bytes(data: &[u8]) -> ImageSource {
        ImageSource::Bytes(data.to_vec())
    }

    #[test]
    fn test_session_walks_the_lifecycle_in_order() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());

        let mut session = Session::open(&engine, &tracker).unwrap();
        assert_eq!(session.state(), &SessionState::Loaded);
        assert_eq!(tracker.live(), 1);

        session.load_language("eng").unwrap();
        assert_eq!(session.state(), &SessionState::Ready("eng".into()));

        assert_eq!(session.recognize(&bytes(b"img")).unwrap(), "HELLO");
        session.close().unwrap();

        assert_eq!(session.state(), &SessionState::Terminated);
        assert_eq!(tracker.live(), 0);
        assert_eq!(
            engine.calls.snapshot(),
            vec!["create", "load", "load_language", "recognize", "terminate"]
        );
    }

    #[test]
    fn test_recognize_before_language_is_rejected() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());
        let mut session = Session::open(&engine, &tracker).unwrap();

        let result = session.recognize(&bytes(b"img"));
        assert!(matches!(result, Err(OcrError::InvalidSession(_))));
        assert_eq!(engine.calls.count("recognize"), 0);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());
        let mut session = Session::open(&engine, &tracker).unwrap();
        session.close().unwrap();

        assert!(matches!(session.load_language("eng"), Err(OcrError::InvalidSession(_))));
        assert!(matches!(session.close(), Err(OcrError::InvalidSession(_))));
        drop(session);

        assert_eq!(engine.calls.count("terminate"), 1);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_with_session_closes_after_recognition_failure() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());

        let result = with_session(&engine, &tracker, |session| {
            session.load_language("eng")?;
            session.recognize(&bytes(b""))
        });

        assert!(matches!(result, Err(OcrError::Recognition(_))));
        assert_eq!(engine.calls.count("terminate"), 1);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_with_session_closes_after_language_failure() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());

        let result = with_session(&engine, &tracker, |session| {
            session.load_language("klingon")?;
            session.recognize(&bytes(b"img"))
        });

        assert!(matches!(result, Err(OcrError::LanguageLoad { .. })));
        assert_eq!(engine.calls.count("recognize"), 0);
        assert_eq!(engine.calls.count("terminate"), 1);
    }

    #[test]
    fn test_close_failure_does_not_mask_the_result() {
        let engine = ScriptedEngine { fail_terminate: true, ..Default::default() };
        let tracker = Arc::new(SessionTracker::new());

        let result = with_session(&engine, &tracker, |session| {
            session.load_language("eng")?;
            session.recognize(&bytes(b"img"))
        });

        assert_eq!(result.unwrap(), "HELLO");
        assert_eq!(engine.calls.count("terminate"), 1);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_panicking_body_still_releases_the_session() {
        let engine = ScriptedEngine::default();
        let tracker = Arc::new(SessionTracker::new());

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            with_session(&engine, &tracker, |session| -> Result<(), OcrError> {
                session.load_language("eng")?;
                panic!("engine fault");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(engine.calls.count("terminate"), 1);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_failed_load_releases_the_instance() {
        let engine = ScriptedEngine { fail_load: true, ..Default::default() };
        let tracker = Arc::new(SessionTracker::new());

        let result = with_session(&engine, &tracker, |_| Ok(()));

        assert!(matches!(result, Err(OcrError::EngineInit(_))));
        assert_eq!(engine.calls.snapshot(), vec!["create", "load", "terminate"]);
        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.opened(), 1);
    }

    #[test]
    fn test_failed_create_never_registers() {
        let engine = ScriptedEngine { fail_create: true, ..Default::default() };
        let tracker = Arc::new(SessionTracker::new());

        let result = with_session(&engine, &tracker, |_| Ok(()));

        assert!(matches!(result, Err(OcrError::EngineInit(_))));
        assert_eq!(tracker.opened(), 0);
        assert_eq!(tracker.live(), 0);
    }
}
