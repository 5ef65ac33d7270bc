//! How a single review is presented to the current viewer

use api::models::{Review, User};

/// Presentation of the review detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewViewMode {
    /// Admin reviewing a pending submission: approve and reject actions
    Moderation,
    /// The author: edit and delete actions
    Author,
    /// Everyone else: read-only with likes
    Public,
}

impl ReviewViewMode {
    /// Moderation mode is only granted to admins who asked for it.
    pub fn resolve(viewer: Option<&User>, review: &Review, moderation_requested: bool) -> Self {
        let is_admin = viewer.is_some_and(User::is_admin);
        let is_author = viewer.is_some_and(|user| review.is_written_by(user.id));

        if moderation_requested && is_admin {
            ReviewViewMode::Moderation
        } else if is_author {
            ReviewViewMode::Author
        } else {
            ReviewViewMode::Public
        }
    }
}
