//! Feed state machine
//!
//! [`FeedState`] holds the current page of a review listing together with
//! its filters, and records every transition: fetch started, fetch
//! completed, filter changed, like pending, like settled. It performs no
//! I/O; the engine drives it.

use api::models::{Review, ReviewPage, ReviewQuery, SortField, SortOrder};
use common::config::DEFAULT_PAGE_SIZE;
use common::error::{ApiError, ApiResult};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::likes::{LikeState, PendingLike, settle};

/// Sort choices offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Newest first
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Most liked first
    LikesDesc,
}

impl SortOption {
    /// Backend sort field and direction for this option
    pub fn params(self) -> (SortField, SortOrder) {
        match self {
            SortOption::DateDesc => (SortField::CreatedAt, SortOrder::Desc),
            SortOption::DateAsc => (SortField::CreatedAt, SortOrder::Asc),
            SortOption::LikesDesc => (SortField::Likes, SortOrder::Desc),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::DateDesc => "date_desc",
            SortOption::DateAsc => "date_asc",
            SortOption::LikesDesc => "likes_desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort option: {0}")]
pub struct ParseSortError(String);

impl FromStr for SortOption {
    type Err = ParseSortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date_desc" => Ok(SortOption::DateDesc),
            "date_asc" => Ok(SortOption::DateAsc),
            "likes_desc" => Ok(SortOption::LikesDesc),
            other => Err(ParseSortError(other.to_string())),
        }
    }
}

/// Fixed parameters of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    /// Whether search and sort are sent with each request
    pub with_controls: bool,
    /// Restrict the listing to one author
    pub author_id: Option<i64>,
    pub page_size: u32,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            with_controls: false,
            author_id: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A fetch that has been started and not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ReviewQuery,
}

/// What a feed should display, in priority order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedView<'a> {
    Error(&'a str),
    Loading,
    Empty,
    Items(&'a [Review]),
}

/// Like failure shown next to the affected review
#[derive(Debug, Clone, PartialEq)]
pub struct LikeError {
    pub review_id: i64,
    pub message: String,
}

/// State of a paginated review listing
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    options: FeedOptions,
    items: Vec<Review>,
    page: u32,
    total_pages: u32,
    loading: bool,
    error: Option<String>,
    like_error: Option<LikeError>,
    sort: SortOption,
    search: Option<String>,
    latest_seq: u64,
    /// Sequence number of the fetch whose items are shown
    shown_seq: u64,
    pending_likes: BTreeSet<i64>,
}

impl FeedState {
    pub fn new(options: FeedOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            loading: false,
            error: None,
            like_error: None,
            sort: SortOption::default(),
            search: None,
            latest_seq: 0,
            shown_seq: 0,
            pending_likes: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    pub fn items(&self) -> &[Review] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn like_error(&self) -> Option<&LikeError> {
        self.like_error.as_ref()
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Query for the current page and filters
    pub fn query(&self) -> ReviewQuery {
        let mut query = ReviewQuery {
            page: Some(self.page),
            limit: Some(self.options.page_size),
            author_id: self.options.author_id,
            ..ReviewQuery::default()
        };

        if self.options.with_controls {
            let (sort, order) = self.sort.params();
            query.search = self.search.clone();
            query.sort = Some(sort);
            query.order = Some(order);
        }

        query
    }

    /// Start a fetch of the current page
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        self.like_error = None;

        FetchTicket {
            seq: self.latest_seq,
            query: self.query(),
        }
    }

    /// Apply the result of a fetch.
    ///
    /// Returns `false` when a newer fetch has been started since, in which
    /// case the result is dropped. A failed fetch keeps the previous items.
    pub fn complete_fetch(&mut self, seq: u64, result: ApiResult<ReviewPage>) -> bool {
        if seq != self.latest_seq {
            debug!(
                "Discarding stale feed response {} (latest is {})",
                seq, self.latest_seq
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.reviews;
                self.total_pages = page.pagination.total_pages.max(1);
                self.page = self.page.min(self.total_pages);
                self.shown_seq = seq;
            }
            Err(e) => {
                self.error = Some(e.ui_message());
            }
        }

        true
    }

    /// Jump to a page, clamped to the known range. Returns whether the page
    /// changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.total_pages);
        if page == self.page {
            return false;
        }

        self.page = page;
        true
    }

    pub fn can_go_prev(&self) -> bool {
        !self.loading && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.loading && self.page < self.total_pages
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }

        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }

        self.page -= 1;
        true
    }

    /// Change the search text and go back to the first page. Returns
    /// whether anything changed.
    pub fn set_search(&mut self, text: &str) -> bool {
        let text = text.trim();
        let search = (!text.is_empty()).then(|| text.to_string());

        let changed = search != self.search || self.page != 1;
        self.search = search;
        self.page = 1;
        changed
    }

    /// Change the sort order and go back to the first page. Returns
    /// whether anything changed.
    pub fn set_sort(&mut self, sort: SortOption) -> bool {
        let changed = sort != self.sort || self.page != 1;
        self.sort = sort;
        self.page = 1;
        changed
    }

    pub fn view(&self) -> FeedView<'_> {
        if let Some(error) = &self.error {
            FeedView::Error(error)
        } else if self.loading {
            FeedView::Loading
        } else if self.items.is_empty() {
            FeedView::Empty
        } else {
            FeedView::Items(&self.items)
        }
    }

    /// Whether a like toggle on this review is waiting for the server
    pub fn is_like_pending(&self, review_id: i64) -> bool {
        self.pending_likes.contains(&review_id)
    }

    /// Apply the optimistic half of a like toggle.
    ///
    /// At most one toggle per review is in flight; a second one is refused
    /// with [`ApiError::ActionPending`] until the first settles.
    pub fn begin_like(&mut self, review_id: i64) -> ApiResult<PendingLike> {
        if self.pending_likes.contains(&review_id) {
            return Err(ApiError::ActionPending);
        }

        let review = self
            .items
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or_else(|| ApiError::NotFound("Рецензия не найдена".to_string()))?;

        let pending = PendingLike::begin(review_id, LikeState::of(review), self.shown_seq);
        pending.tentative.apply_to(review);
        self.pending_likes.insert(review_id);
        self.like_error = None;

        Ok(pending)
    }

    /// Reconcile a pending like with the server outcome.
    ///
    /// A confirmed change re-sorts the page when sorting by likes; a failed
    /// one restores the values seen before the toggle. If a fetch has
    /// replaced the page since the toggle began, the fetched items are left
    /// as they are.
    pub fn settle_like(
        &mut self,
        pending: &PendingLike,
        outcome: ApiResult<LikeState>,
    ) -> ApiResult<LikeState> {
        self.pending_likes.remove(&pending.review_id);

        let settled = settle(pending, &outcome);
        let same_page = pending.page_seq == self.shown_seq;

        if same_page {
            if let Some(review) = self
                .items
                .iter_mut()
                .find(|review| review.id == pending.review_id)
            {
                settled.apply_to(review);
            }
        } else {
            debug!(
                "Page replaced while like on review {} was pending",
                pending.review_id
            );
        }

        match outcome {
            Ok(_) => {
                if same_page && self.sort == SortOption::LikesDesc {
                    self.items.sort_by(|a, b| b.likes.cmp(&a.likes));
                }
                Ok(settled)
            }
            Err(e) => {
                self.like_error = Some(LikeError {
                    review_id: pending.review_id,
                    message: e.ui_message(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page_of, review};

    fn controlled() -> FeedState {
        FeedState::new(FeedOptions {
            with_controls: true,
            ..FeedOptions::default()
        })
    }

    fn loaded(total_pages: u32) -> FeedState {
        let mut state = controlled();
        let ticket = state.begin_fetch();
        state.complete_fetch(ticket.seq, Ok(page_of(vec![review(1, 5)], total_pages)));
        state
    }

    #[test]
    fn test_sort_table() {
        assert_eq!(
            SortOption::DateDesc.params(),
            (SortField::CreatedAt, SortOrder::Desc)
        );
        assert_eq!(
            SortOption::DateAsc.params(),
            (SortField::CreatedAt, SortOrder::Asc)
        );
        assert_eq!(
            SortOption::LikesDesc.params(),
            (SortField::Likes, SortOrder::Desc)
        );
        assert_eq!("likes_desc".parse::<SortOption>(), Ok(SortOption::LikesDesc));
        assert!("popular".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_query_without_controls_ignores_filters() {
        let mut state = FeedState::new(FeedOptions {
            author_id: Some(4),
            ..FeedOptions::default()
        });
        state.set_search("matrix");
        state.set_sort(SortOption::LikesDesc);

        assert_eq!(
            state.query(),
            ReviewQuery {
                page: Some(1),
                limit: Some(20),
                author_id: Some(4),
                ..ReviewQuery::default()
            }
        );
    }

    #[test]
    fn test_query_with_controls() {
        let mut state = controlled();
        state.set_search("  matrix ");
        state.set_sort(SortOption::DateAsc);

        let query = state.query();
        assert_eq!(query.search.as_deref(), Some("matrix"));
        assert_eq!(query.sort, Some(SortField::CreatedAt));
        assert_eq!(query.order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_fetch_cycle_success() {
        let mut state = controlled();
        let ticket = state.begin_fetch();
        assert!(state.is_loading());
        assert_eq!(state.view(), FeedView::Loading);

        assert!(state.complete_fetch(ticket.seq, Ok(page_of(vec![review(1, 0)], 3))));
        assert!(!state.is_loading());
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn test_fetch_failure_keeps_previous_items() {
        let mut state = loaded(3);
        let ticket = state.begin_fetch();
        state.complete_fetch(
            ticket.seq,
            Err(ApiError::Transport("connection refused".to_string())),
        );

        assert_eq!(state.items().len(), 1);
        assert_eq!(state.error(), Some("connection refused"));
        assert_eq!(state.view(), FeedView::Error("connection refused"));

        // A new fetch clears the error
        state.begin_fetch();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_zero_total_pages_reads_as_one() {
        let state = loaded(0);
        assert_eq!(state.total_pages(), 1);
        assert!(!state.can_go_next());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = controlled();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.complete_fetch(second.seq, Ok(page_of(vec![review(2, 0)], 2))));
        assert!(!state.complete_fetch(first.seq, Ok(page_of(vec![review(1, 0)], 9))));

        assert_eq!(state.items()[0].id, 2);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn test_page_bounds() {
        let mut state = loaded(3);
        assert!(!state.can_go_prev());
        assert!(!state.prev_page());

        assert!(state.set_page(10));
        assert_eq!(state.page(), 3);
        assert!(!state.next_page());

        assert!(state.set_page(0));
        assert_eq!(state.page(), 1);
        assert!(!state.set_page(1));
    }

    #[test]
    fn test_navigation_disabled_while_loading() {
        let mut state = loaded(3);
        state.set_page(2);
        state.begin_fetch();

        assert!(!state.can_go_next());
        assert!(!state.can_go_prev());
        assert!(!state.next_page());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_search_and_sort_reset_page() {
        let mut state = loaded(5);
        state.set_page(4);
        assert!(state.set_search("inception"));
        assert_eq!(state.page(), 1);

        state.set_page(3);
        assert!(state.set_sort(SortOption::LikesDesc));
        assert_eq!(state.page(), 1);

        assert!(!state.set_sort(SortOption::LikesDesc));
        assert!(!state.set_search(" inception "));
        assert!(state.set_search(""));
        assert_eq!(state.search(), None);
    }

    #[test]
    fn test_empty_view() {
        let mut state = controlled();
        let ticket = state.begin_fetch();
        state.complete_fetch(ticket.seq, Ok(page_of(vec![], 1)));
        assert_eq!(state.view(), FeedView::Empty);
    }

    #[test]
    fn test_shrinking_page_count_clamps_current_page() {
        let mut state = loaded(3);
        state.set_page(3);

        let ticket = state.begin_fetch();
        state.complete_fetch(ticket.seq, Ok(page_of(vec![review(1, 0)], 2)));

        assert_eq!(state.page(), 2);
        assert_eq!(state.query().page, Some(2));
        assert!(!state.can_go_next());
    }

    #[test]
    fn test_navigation_clears_like_error() {
        let mut state = loaded(2);
        let pending = state.begin_like(1).unwrap();
        let _ = state.settle_like(
            &pending,
            Err(ApiError::Transport("network down".to_string())),
        );
        assert!(state.like_error().is_some());

        state.next_page();
        state.begin_fetch();
        assert_eq!(state.like_error(), None);
    }

    #[test]
    fn test_second_like_on_same_review_waits_for_first() {
        let mut state = loaded(1);
        let first = state.begin_like(1).unwrap();

        assert!(state.is_like_pending(1));
        assert_eq!(state.begin_like(1), Err(ApiError::ActionPending));

        let _ = state.settle_like(&first, Err(ApiError::Transport("timeout".to_string())));
        assert!(!state.is_like_pending(1));
        assert_eq!(state.items()[0].likes, 5);
        assert!(!state.items()[0].is_liked);
        assert!(state.begin_like(1).is_ok());
    }

    #[test]
    fn test_refetched_page_wins_over_pending_like() {
        let mut state = loaded(1);
        let pending = state.begin_like(1).unwrap();

        let ticket = state.begin_fetch();
        state.complete_fetch(ticket.seq, Ok(page_of(vec![review(1, 10)], 1)));

        let err = state
            .settle_like(&pending, Err(ApiError::Transport("timeout".to_string())))
            .unwrap_err();
        assert_eq!(err.ui_message(), "timeout");
        assert_eq!(state.items()[0].likes, 10);
        assert!(!state.is_like_pending(1));
    }
}
