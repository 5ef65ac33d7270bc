//! Review feeds for the Cinema Reviews client
//!
//! A feed shows one page of a review listing at a time, with optional search
//! and sort controls, and lets a signed-in user like reviews in place.
//!
//! ```no_run
//! use api::ApiClient;
//! use common::config::ClientConfig;
//! use common::storage::MemoryTokenStore;
//! use feed::{Listing, ReviewFeed, SortOption};
//! use std::sync::Arc;
//!
//! # async fn run() -> common::ApiResult<()> {
//! let config = ClientConfig::default();
//! let client = ApiClient::new(&config, Arc::new(MemoryTokenStore::new()))?;
//!
//! let feed = ReviewFeed::for_listing(client, Listing::Public, config.page_size);
//! feed.refresh().await;
//! feed.set_sort(SortOption::LikesDesc).await;
//!
//! for review in feed.snapshot().await.items() {
//!     println!("{} ({} likes)", review.title, review.likes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod likes;
pub mod source;
pub mod state;

pub use engine::ReviewFeed;
pub use likes::{LikeState, PendingLike, settle};
pub use source::{ApiReviewSource, Listing, ReviewSource};
pub use state::{FeedOptions, FeedState, FeedView, LikeError, SortOption};
