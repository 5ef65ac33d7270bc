//! Optimistic like transitions
//!
//! A toggle is applied locally right away as a [`PendingLike`], then
//! [`settle`] turns the tentative state plus the server outcome into the
//! final state: the server's values on success, the previous values on
//! failure.

use api::models::{LikeStatus, Review};
use common::error::ApiResult;

/// Like count and flag of one review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub likes: i64,
    pub is_liked: bool,
}

impl LikeState {
    pub fn of(review: &Review) -> Self {
        Self {
            likes: review.likes,
            is_liked: review.is_liked,
        }
    }

    /// State after the current user toggles their like
    pub fn toggled(self) -> Self {
        if self.is_liked {
            Self {
                likes: self.likes - 1,
                is_liked: false,
            }
        } else {
            Self {
                likes: self.likes + 1,
                is_liked: true,
            }
        }
    }

    pub fn apply_to(self, review: &mut Review) {
        review.likes = self.likes;
        review.is_liked = self.is_liked;
    }
}

impl From<LikeStatus> for LikeState {
    fn from(status: LikeStatus) -> Self {
        Self {
            likes: status.likes,
            is_liked: status.is_liked,
        }
    }
}

/// A like toggle applied locally and awaiting the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLike {
    pub review_id: i64,
    pub previous: LikeState,
    pub tentative: LikeState,
    /// Sequence number of the page the toggle was applied to
    pub page_seq: u64,
}

impl PendingLike {
    pub fn begin(review_id: i64, current: LikeState, page_seq: u64) -> Self {
        Self {
            review_id,
            previous: current,
            tentative: current.toggled(),
            page_seq,
        }
    }
}

/// Final like state for a pending toggle given the server outcome
pub fn settle(pending: &PendingLike, outcome: &ApiResult<LikeState>) -> LikeState {
    match outcome {
        Ok(confirmed) => *confirmed,
        Err(_) => pending.previous,
    }
}
