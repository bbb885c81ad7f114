mod types;
pub use types::{SessionState, SessionTracker};

mod utils;
pub use utils::{with_session, Session};
