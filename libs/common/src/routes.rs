//! Route paths of the client views

use crate::validation::ValidationError;

pub fn all_reviews() -> &'static str {
    "/"
}

pub fn sign_up() -> &'static str {
    "/sign-up"
}

pub fn sign_in() -> &'static str {
    "/sign-in"
}

pub fn my_reviews() -> &'static str {
    "/my-reviews"
}

pub fn moderation() -> &'static str {
    "/moderation"
}

pub fn new_review() -> &'static str {
    "/reviews/new"
}

pub fn review(review_id: i64) -> String {
    format!("/reviews/{}", review_id)
}

pub fn user_profile(user_id: i64) -> String {
    format!("/users/{}", user_id)
}

/// Parse the review id segment of a `/reviews/{id}` path
pub fn parse_review_id(segment: &str) -> Result<i64, ValidationError> {
    segment
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ValidationError::new("review_id", "Некорректный id рецензии"))
}
