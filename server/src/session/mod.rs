mod session;
mod session_manager;

pub use session::{Session, SessionState};
pub use session_manager::{SessionEvent, SessionManager};
