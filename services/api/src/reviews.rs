//! Review endpoints

use common::error::ApiResult;
use tracing::info;

use crate::client::ApiClient;
use crate::models::{LikeStatus, Review, ReviewForm, ReviewPage, ReviewQuery, SavedReview};

impl ApiClient {
    /// List approved reviews
    pub async fn list_public_reviews(&self, query: &ReviewQuery) -> ApiResult<ReviewPage> {
        self.get_with_query("/reviews/public", query).await
    }

    /// List reviews written by the current user
    pub async fn list_my_reviews(&self, query: &ReviewQuery) -> ApiResult<ReviewPage> {
        self.get_with_query("/reviews/my", query).await
    }

    /// List reviews waiting for moderation (admin only)
    pub async fn list_moderation_reviews(&self, query: &ReviewQuery) -> ApiResult<ReviewPage> {
        self.get_with_query("/reviews/moderation", query).await
    }

    /// Get a review by ID
    pub async fn get_review(&self, review_id: i64) -> ApiResult<Review> {
        self.get(&format!("/reviews/{}", review_id)).await
    }

    /// Submit a new review for moderation
    ///
    /// The form is validated locally first; an invalid form is never sent.
    pub async fn create_review(&self, form: &ReviewForm) -> ApiResult<SavedReview> {
        form.validate()?;
        info!("Creating review for movie: {}", form.movie_title);

        self.post("/reviews", form).await
    }

    /// Replace the text of an existing review
    pub async fn update_review(&self, review_id: i64, form: &ReviewForm) -> ApiResult<SavedReview> {
        form.validate()?;
        info!("Updating review: {}", review_id);

        self.put(&format!("/reviews/{}", review_id), form).await
    }

    /// Delete a review
    pub async fn delete_review(&self, review_id: i64) -> ApiResult<()> {
        info!("Deleting review: {}", review_id);
        self.delete(&format!("/reviews/{}", review_id)).await
    }

    /// Approve a pending review (admin only)
    pub async fn approve_review(&self, review_id: i64) -> ApiResult<()> {
        info!("Approving review: {}", review_id);
        self.post_action(&format!("/reviews/{}/approve", review_id))
            .await
    }

    /// Reject a pending review (admin only)
    pub async fn reject_review(&self, review_id: i64) -> ApiResult<()> {
        info!("Rejecting review: {}", review_id);
        self.post_action(&format!("/reviews/{}/reject", review_id))
            .await
    }

    /// Like or unlike a review, returning the authoritative like state
    pub async fn toggle_like(&self, review_id: i64) -> ApiResult<LikeStatus> {
        self.post_empty(&format!("/reviews/{}/like", review_id))
            .await
    }
}
