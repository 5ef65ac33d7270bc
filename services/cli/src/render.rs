//! Plain-text rendering of reviews and feeds

use api::models::{Review, ReviewStatus, User};
use auth::ReviewViewMode;
use feed::{FeedState, FeedView};

fn status_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => "pending",
        ReviewStatus::Approved => "approved",
        ReviewStatus::Rejected => "rejected",
    }
}

fn date_of(review: &Review) -> String {
    review
        .created_date()
        .unwrap_or_else(|_| review.created_at.clone())
}

fn likes_of(likes: i64, is_liked: bool) -> String {
    if is_liked {
        format!("{} likes, liked by you", likes)
    } else {
        format!("{} likes", likes)
    }
}

pub fn user(user: &User) {
    let role = if user.is_admin() { "admin" } else { "user" };
    println!("{} (id {}, {})", user.username, user.id, role);
}

fn card(review: &Review, show_status: bool) {
    println!("#{} {} [{}]", review.id, review.title, review.movie_title);

    let mut meta = vec![date_of(review), likes_of(review.likes, review.is_liked)];
    if let Some(author) = &review.author {
        meta.insert(0, author.username.clone());
    }
    if show_status {
        meta.push(status_label(review.status).to_string());
    }
    println!("    {}", meta.join(" | "));
}

pub fn feed(state: &FeedState, show_status: bool) {
    match state.view() {
        FeedView::Error(message) => println!("{}", message),
        FeedView::Loading => println!("Loading..."),
        FeedView::Empty => println!("No reviews yet"),
        FeedView::Items(reviews) => {
            for review in reviews {
                card(review, show_status);
            }
        }
    }

    println!();
    println!(
        "Page {} of {}{}",
        state.page(),
        state.total_pages(),
        state
            .search()
            .map(|search| format!(" | search: {}", search))
            .unwrap_or_default()
    );
}

pub fn review_detail(review: &Review, mode: ReviewViewMode) {
    println!("{}", review.title);
    println!("Movie: {}", review.movie_title);
    if let Some(author) = &review.author {
        println!("Author: {} (id {})", author.username, author.id);
    }
    println!("{} | {}", date_of(review), likes_of(review.likes, review.is_liked));
    println!();
    println!("{}", review.content);
    println!();

    match mode {
        ReviewViewMode::Moderation => {
            println!("Status: {}", status_label(review.status));
            println!("Actions: cinema approve {0} | cinema reject {0}", review.id);
        }
        ReviewViewMode::Author => {
            println!("Status: {}", status_label(review.status));
            println!("Actions: cinema edit {0} | cinema delete {0}", review.id);
        }
        ReviewViewMode::Public => {
            println!("Actions: cinema like {}", review.id);
        }
    }
}

pub fn like_status(review_id: i64, likes: i64, is_liked: bool) {
    println!("Review #{}: {}", review_id, likes_of(likes, is_liked));
}
