//! Route guards
//!
//! Guards decide whether a view may be shown for the current session, and
//! where to send the user otherwise.

use common::routes;

use crate::session::Session;

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still initializing, render nothing yet
    Pending,
    /// Render the guarded view
    Allow,
    /// Navigate elsewhere; `from` is the path to return to after sign-in
    Redirect { to: String, from: Option<String> },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Only signed-in users may pass
pub fn require_auth(session: &Session, target: &str) -> GuardDecision {
    if session.is_loading() {
        return GuardDecision::Pending;
    }

    if !session.is_authenticated() {
        return GuardDecision::Redirect {
            to: routes::sign_in().to_string(),
            from: Some(target.to_string()),
        };
    }

    GuardDecision::Allow
}

/// Only administrators may pass
///
/// Signed-in users without the admin role go back to the review list, not
/// to sign-in.
pub fn require_admin(session: &Session, target: &str) -> GuardDecision {
    match require_auth(session, target) {
        GuardDecision::Allow if !session.is_admin() => GuardDecision::Redirect {
            to: routes::all_reviews().to_string(),
            from: None,
        },
        decision => decision,
    }
}
