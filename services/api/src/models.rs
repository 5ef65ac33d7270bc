//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod review;

pub use review::{
    Author, LikeStatus, PaginationInfo, Review, ReviewForm, ReviewPage, ReviewQuery,
    ReviewStatus, SavedReview, SortField, SortOrder,
};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Profile of the signed-in user (`GET /auth/me`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Public profile of any user (`GET /users/{id}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

/// Request for login and registration
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response for token issuance
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
