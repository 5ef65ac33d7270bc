//! Review models for the API client

use common::date::{DateError, format_date};
use common::validation::{ValidationError, validate_review};
use serde::{Deserialize, Deserializer, Serialize};

/// Moderation state of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Author summary embedded in a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

/// Review model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub title: String,
    pub movie_title: String,
    pub content: String,
    pub likes: i64,
    /// Whether the current user liked the review; `null` reads as `false`
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_liked: bool,
    pub created_at: String,
    pub status: ReviewStatus,
    /// Omitted by the "my reviews" listing
    #[serde(default)]
    pub author: Option<Author>,
}

impl Review {
    /// Creation date rendered as `dd.mm.yyyy`
    pub fn created_date(&self) -> Result<String, DateError> {
        format_date(&self.created_at)
    }

    pub fn is_written_by(&self, user_id: i64) -> bool {
        self.author.as_ref().is_some_and(|author| author.id == user_id)
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Pagination block of a listing response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items_per_page: u32,
}

/// Response for review listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

/// Sort field understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    Likes,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for review listings
///
/// Fields left as `None` are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewQuery {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    /// Search term for title and movie title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Filter by author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

impl ReviewQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// Body of review create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewForm {
    pub title: String,
    pub movie_title: String,
    pub content: String,
}

impl ReviewForm {
    /// Build a form from raw input, trimming every field
    pub fn new(title: &str, movie_title: &str, content: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            movie_title: movie_title.trim().to_string(),
            content: content.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_review(&self.title, &self.movie_title, &self.content)
    }
}

/// Id returned by create and update; the rest of the body is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SavedReview {
    pub id: i64,
}

/// Response for like toggling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub likes: i64,
    pub is_liked: bool,
}
