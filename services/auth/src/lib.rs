//! Authentication for the Cinema Reviews client
//!
//! Session state, route guards and per-review view modes.

pub mod backend;
pub mod guards;
pub mod session;
pub mod view_mode;

pub use backend::AuthBackend;
pub use guards::{GuardDecision, require_admin, require_auth};
pub use session::{Session, SessionStatus, SessionStore};
pub use view_mode::ReviewViewMode;
