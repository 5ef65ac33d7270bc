//! Where a feed gets its reviews from

use api::ApiClient;
use api::models::{LikeStatus, ReviewPage, ReviewQuery};
use async_trait::async_trait;
use common::error::ApiResult;

use crate::state::FeedOptions;

/// Backend calls a feed depends on
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch one page of reviews
    async fn list(&self, query: &ReviewQuery) -> ApiResult<ReviewPage>;

    /// Toggle the current user's like on a review
    async fn toggle_like(&self, review_id: i64) -> ApiResult<LikeStatus>;
}

/// Review listings exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Approved reviews from everyone
    Public,
    /// The current user's own reviews, any status
    Mine,
    /// Pending reviews awaiting an admin
    Moderation,
}

impl Listing {
    /// Feed options matching how each listing is presented
    pub fn options(self, page_size: u32) -> FeedOptions {
        FeedOptions {
            with_controls: !matches!(self, Listing::Moderation),
            author_id: None,
            page_size,
        }
    }
}

/// [`ReviewSource`] backed by the REST client
#[derive(Clone)]
pub struct ApiReviewSource {
    client: ApiClient,
    listing: Listing,
}

impl ApiReviewSource {
    pub fn new(client: ApiClient, listing: Listing) -> Self {
        Self { client, listing }
    }

    pub fn listing(&self) -> Listing {
        self.listing
    }
}

#[async_trait]
impl ReviewSource for ApiReviewSource {
    async fn list(&self, query: &ReviewQuery) -> ApiResult<ReviewPage> {
        match self.listing {
            Listing::Public => self.client.list_public_reviews(query).await,
            Listing::Mine => self.client.list_my_reviews(query).await,
            Listing::Moderation => self.client.list_moderation_reviews(query).await,
        }
    }

    async fn toggle_like(&self, review_id: i64) -> ApiResult<LikeStatus> {
        self.client.toggle_like(review_id).await
    }
}
