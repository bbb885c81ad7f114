use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Loaded,
    Ready(String),
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Created => write!(f, "created"),
            SessionState::Loaded => write!(f, "loaded"),
            SessionState::Ready(lang) => write!(f, "ready({})", lang),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Counts sessions opened through one recognizer and how many are still alive.
#[derive(Debug, Default)]
pub struct SessionTracker {
    opened: AtomicU64,
    live: AtomicUsize,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly allocated session and returns its id.
    pub(crate) fn register(&self) -> u64 {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }
}
