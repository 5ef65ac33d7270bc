//! Review feed engine
//!
//! [`ReviewFeed`] drives a [`FeedState`] against a [`ReviewSource`]. The
//! state lock is never held across a backend call, so overlapping fetches
//! complete independently and the fetch sequence number decides which one
//! is shown.

use api::ApiClient;
use auth::Session;
use common::error::{ApiError, ApiResult};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::likes::LikeState;
use crate::source::{ApiReviewSource, Listing, ReviewSource};
use crate::state::{FeedOptions, FeedState, SortOption};

/// Paginated, filterable review listing
#[derive(Clone)]
pub struct ReviewFeed<S> {
    source: S,
    state: Arc<Mutex<FeedState>>,
}

impl ReviewFeed<ApiReviewSource> {
    /// Feed over one of the backend listings
    pub fn for_listing(client: ApiClient, listing: Listing, page_size: u32) -> Self {
        Self::new(
            ApiReviewSource::new(client, listing),
            listing.options(page_size),
        )
    }

    /// Approved reviews of a single author, as shown on a profile
    pub fn for_author(client: ApiClient, author_id: i64, page_size: u32) -> Self {
        Self::new(
            ApiReviewSource::new(client, Listing::Public),
            FeedOptions {
                author_id: Some(author_id),
                ..Listing::Public.options(page_size)
            },
        )
    }
}

impl<S: ReviewSource> ReviewFeed<S> {
    pub fn new(source: S, options: FeedOptions) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(FeedState::new(options))),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> FeedState {
        self.state.lock().await.clone()
    }

    /// Fetch the current page. Returns whether the response was applied.
    pub async fn refresh(&self) -> bool {
        let ticket = self.state.lock().await.begin_fetch();

        let result = self.source.list(&ticket.query).await;
        if let Err(e) = &result {
            warn!("Failed to load reviews page {:?}: {}", ticket.query.page, e);
        }

        self.state.lock().await.complete_fetch(ticket.seq, result)
    }

    /// Set search and sort together, then fetch the first page once
    pub async fn reload_with(&self, search: &str, sort: SortOption) -> bool {
        {
            let mut state = self.state.lock().await;
            state.set_search(search);
            state.set_sort(sort);
        }
        self.refresh().await
    }

    pub async fn set_page(&self, page: u32) {
        let changed = self.state.lock().await.set_page(page);
        if changed {
            self.refresh().await;
        }
    }

    pub async fn next_page(&self) {
        let changed = self.state.lock().await.next_page();
        if changed {
            self.refresh().await;
        }
    }

    pub async fn prev_page(&self) {
        let changed = self.state.lock().await.prev_page();
        if changed {
            self.refresh().await;
        }
    }

    pub async fn set_search(&self, text: &str) {
        let changed = self.state.lock().await.set_search(text);
        if changed {
            self.refresh().await;
        }
    }

    pub async fn set_sort(&self, sort: SortOption) {
        let changed = self.state.lock().await.set_sort(sort);
        if changed {
            self.refresh().await;
        }
    }

    /// Like or unlike a review on the current page.
    ///
    /// The change is visible in the feed before the backend answers; it is
    /// then replaced by the backend's values, or rolled back on failure.
    /// Fails with [`ApiError::ActionPending`] while an earlier toggle on the
    /// same review is still waiting.
    pub async fn toggle_like(&self, session: &Session, review_id: i64) -> ApiResult<LikeState> {
        if !session.is_authenticated() {
            return Err(ApiError::Unauthenticated);
        }

        let pending = self.state.lock().await.begin_like(review_id)?;

        let outcome = self
            .source
            .toggle_like(review_id)
            .await
            .map(LikeState::from);

        match &outcome {
            Ok(state) => info!("Review {} now has {} likes", review_id, state.likes),
            Err(e) => warn!("Failed to toggle like on review {}: {}", review_id, e),
        }

        self.state.lock().await.settle_like(&pending, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FeedView;
    use crate::test_support::{ScriptedSource, page_of, review, signed_in, signed_out};
    use api::models::{LikeStatus, SortField};
    use std::time::Duration;

    fn controlled(source: ScriptedSource) -> ReviewFeed<ScriptedSource> {
        ReviewFeed::new(
            source,
            FeedOptions {
                with_controls: true,
                ..FeedOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn test_initial_load() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 2), review(2, 0)], 3)));
        let feed = controlled(source.clone());

        assert!(feed.refresh().await);

        let state = feed.snapshot().await;
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.is_loading());

        let queries = source.queries();
        assert_eq!(queries[0].page, Some(1));
        assert_eq!(queries[0].limit, Some(20));
        assert_eq!(queries[0].sort, Some(SortField::CreatedAt));
    }

    #[tokio::test]
    async fn test_navigation_never_leaves_page_range() {
        let source = ScriptedSource::new();
        for _ in 0..6 {
            source.push_page(Ok(page_of(vec![review(1, 0)], 2)));
        }
        let feed = controlled(source.clone());
        feed.refresh().await;

        feed.prev_page().await;
        feed.next_page().await;
        feed.next_page().await;
        feed.set_page(7).await;
        feed.set_page(0).await;

        let pages: Vec<Option<u32>> = source.queries().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![Some(1), Some(2), Some(1)]);
    }

    #[tokio::test]
    async fn test_search_and_sort_fetch_first_page() {
        let source = ScriptedSource::new();
        for _ in 0..4 {
            source.push_page(Ok(page_of(vec![review(1, 0)], 5)));
        }
        let feed = controlled(source.clone());
        feed.refresh().await;
        feed.set_page(3).await;

        feed.set_search("matrix").await;
        feed.set_sort(SortOption::LikesDesc).await;

        let queries = source.queries();
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[2].page, Some(1));
        assert_eq!(queries[2].search.as_deref(), Some("matrix"));
        assert_eq!(queries[3].page, Some(1));
        assert_eq!(queries[3].sort, Some(SortField::Likes));
    }

    #[tokio::test]
    async fn test_reload_with_sends_one_request() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 0)], 1)));
        let feed = controlled(source.clone());

        assert!(feed.reload_with(" dune ", SortOption::DateAsc).await);

        let queries = source.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search.as_deref(), Some("dune"));
        assert_eq!(queries[0].order, Some(api::models::SortOrder::Asc));
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_error_over_old_items() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 0)], 2)));
        source.push_page(Err(ApiError::Server {
            status: 500,
            message: "Internal Server Error".to_string(),
        }));
        let feed = controlled(source);
        feed.refresh().await;
        feed.next_page().await;

        let state = feed.snapshot().await;
        assert_eq!(state.view(), FeedView::Error("Internal Server Error"));
        assert_eq!(state.items()[0].id, 1);
        assert_eq!(state.page(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_request_wins_over_slower_earlier_one() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 0)], 4)));
        source.push_delayed_page(
            Ok(page_of(vec![review(20, 0)], 4)),
            Duration::from_millis(500),
        );
        source.push_page(Ok(page_of(vec![review(30, 0)], 4)));
        let feed = controlled(source);
        feed.refresh().await;

        tokio::join!(feed.set_page(2), feed.set_page(3));

        let state = feed.snapshot().await;
        assert_eq!(state.page(), 3);
        assert_eq!(state.items()[0].id, 30);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_like_requires_sign_in() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 0)], 1)));
        let feed = controlled(source.clone());
        feed.refresh().await;

        let err = feed.toggle_like(&signed_out(), 1).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthenticated);
        assert_eq!(source.like_calls(), 0);
    }

    #[tokio::test]
    async fn test_like_is_visible_before_server_answers() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 4)], 1)));
        let gate = source.push_gated_like(Ok(LikeStatus {
            likes: 5,
            is_liked: true,
        }));
        let feed = controlled(source);
        feed.refresh().await;
        let session = signed_in().await;

        let toggle = feed.toggle_like(&session, 1);
        let observe = async {
            tokio::task::yield_now().await;
            let state = feed.snapshot().await;
            gate.notify_one();
            (state.items()[0].likes, state.items()[0].is_liked)
        };
        let (settled, optimistic) = tokio::join!(toggle, observe);

        assert_eq!(optimistic, (5, true));
        assert_eq!(
            settled.unwrap(),
            LikeState {
                likes: 5,
                is_liked: true
            }
        );
    }

    #[tokio::test]
    async fn test_like_failure_restores_exact_previous_state() {
        let source = ScriptedSource::new();
        let mut liked = review(1, 7);
        liked.is_liked = true;
        source.push_page(Ok(page_of(vec![liked, review(2, 3)], 1)));
        source.push_like(Err(ApiError::Transport("network down".to_string())));
        let feed = controlled(source);
        feed.refresh().await;
        let before = feed.snapshot().await;

        let err = feed.toggle_like(&signed_in().await, 1).await.unwrap_err();
        assert_eq!(err.ui_message(), "network down");

        let after = feed.snapshot().await;
        assert_eq!(after.items(), before.items());
        assert_eq!(after.like_error().map(|e| e.review_id), Some(1));
    }

    #[tokio::test]
    async fn test_server_like_count_overrides_optimistic_guess() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 7)], 1)));
        source.push_like(Ok(LikeStatus {
            likes: 12,
            is_liked: true,
        }));
        let feed = controlled(source);
        feed.refresh().await;

        feed.toggle_like(&signed_in().await, 1).await.unwrap();

        let state = feed.snapshot().await;
        assert_eq!(state.items()[0].likes, 12);
        assert!(state.items()[0].is_liked);
    }

    #[tokio::test]
    async fn test_like_reorders_page_when_sorted_by_likes() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 5), review(2, 3)], 1)));
        source.push_page(Ok(page_of(
            vec![review(1, 5), review(2, 5), review(3, 5)],
            1,
        )));
        source.push_like(Ok(LikeStatus {
            likes: 6,
            is_liked: true,
        }));
        let feed = controlled(source);
        feed.refresh().await;
        feed.set_sort(SortOption::LikesDesc).await;

        // Ties keep their order
        let ids: Vec<i64> = feed.snapshot().await.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        feed.toggle_like(&signed_in().await, 3).await.unwrap();
        let ids: Vec<i64> = feed.snapshot().await.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_like_keeps_order_for_date_sort() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 5), review(2, 3)], 1)));
        source.push_like(Ok(LikeStatus {
            likes: 9,
            is_liked: true,
        }));
        let feed = controlled(source);
        feed.refresh().await;

        feed.toggle_like(&signed_in().await, 2).await.unwrap();
        let ids: Vec<i64> = feed.snapshot().await.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_overlapping_likes_on_one_review_restore_original() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 3)], 1)));
        let gate = source.push_gated_like(Err(ApiError::Transport("network down".to_string())));
        let feed = controlled(source.clone());
        feed.refresh().await;
        let session = signed_in().await;

        let first = feed.toggle_like(&session, 1);
        let second = async {
            tokio::task::yield_now().await;
            let result = feed.toggle_like(&session, 1).await;
            gate.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_err());
        assert_eq!(second.unwrap_err(), ApiError::ActionPending);
        assert_eq!(source.like_calls(), 1);

        let state = feed.snapshot().await;
        assert_eq!((state.items()[0].likes, state.items()[0].is_liked), (3, false));
    }

    #[tokio::test]
    async fn test_failed_like_keeps_page_fetched_meanwhile() {
        let source = ScriptedSource::new();
        source.push_page(Ok(page_of(vec![review(1, 3)], 1)));
        source.push_page(Ok(page_of(vec![review(1, 10)], 1)));
        let gate = source.push_gated_like(Err(ApiError::Transport("network down".to_string())));
        let feed = controlled(source);
        feed.refresh().await;
        let session = signed_in().await;

        let toggle = feed.toggle_like(&session, 1);
        let reload = async {
            tokio::task::yield_now().await;
            feed.refresh().await;
            gate.notify_one();
        };
        let (result, ()) = tokio::join!(toggle, reload);

        assert!(result.is_err());
        assert_eq!(feed.snapshot().await.items()[0].likes, 10);
    }
}
