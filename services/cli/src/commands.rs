//! Command handlers
//!
//! Every handler runs against an initialized session and checks the same
//! guard the matching view would.

use anyhow::{Result, bail};
use api::ApiClient;
use api::models::ReviewForm;
use auth::{GuardDecision, ReviewViewMode, SessionStore, require_admin, require_auth};
use common::config::ClientConfig;
use common::routes;
use common::storage::{FileTokenStore, TokenStore};
use feed::{Listing, ReviewFeed, ReviewSource, SortOption};
use std::sync::Arc;
use tracing::info;

use crate::render;
use crate::{FeedArgs, ReviewArgs};

pub struct App {
    config: ClientConfig,
    client: ApiClient,
    sessions: SessionStore,
}

impl App {
    /// Load configuration and restore the stored session
    pub async fn connect() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));
        let client = ApiClient::new(&config, tokens)?;
        info!("Using API at {}", client.base_url());

        let mut sessions = SessionStore::from_client(client.clone());
        sessions.initialize().await;

        Ok(Self {
            config,
            client,
            sessions,
        })
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Result<()> {
        let user = self.sessions.register(username, password).await?;
        println!("Welcome, {}!", user.username);
        Ok(())
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let user = self.sessions.login(username, password).await?;
        println!("Signed in as {}", user.username);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.sessions.logout();
        println!("Signed out");
        Ok(())
    }

    pub fn whoami(&self) -> Result<()> {
        match self.sessions.session().user() {
            Some(user) => render::user(user),
            None => println!("Not signed in"),
        }
        Ok(())
    }

    pub async fn public_feed(&self, args: &FeedArgs, author: Option<i64>) -> Result<()> {
        let page_size = self.config.page_size;
        let feed = match author {
            Some(author_id) => ReviewFeed::for_author(self.client.clone(), author_id, page_size),
            None => ReviewFeed::for_listing(self.client.clone(), Listing::Public, page_size),
        };
        show_feed(&feed, args.page, &args.search, args.sort, false).await
    }

    pub async fn my_reviews(&self, args: &FeedArgs) -> Result<()> {
        guard(require_auth(self.sessions.session(), routes::my_reviews()))?;

        let feed =
            ReviewFeed::for_listing(self.client.clone(), Listing::Mine, self.config.page_size);
        show_feed(&feed, args.page, &args.search, args.sort, true).await
    }

    pub async fn moderation(&self, page: u32) -> Result<()> {
        guard(require_admin(self.sessions.session(), routes::moderation()))?;

        let feed = ReviewFeed::for_listing(
            self.client.clone(),
            Listing::Moderation,
            self.config.page_size,
        );
        show_feed(&feed, page, "", SortOption::default(), true).await
    }

    pub async fn show(&self, id: &str, moderate: bool) -> Result<()> {
        let review_id = routes::parse_review_id(id)?;
        let target = routes::review(review_id);

        if moderate {
            guard(require_admin(self.sessions.session(), &target))?;
        }

        let review = self.client.get_review(review_id).await?;
        let mode = ReviewViewMode::resolve(self.sessions.session().user(), &review, moderate);
        render::review_detail(&review, mode);
        Ok(())
    }

    /// Toggle a like on a review shown on the given public feed page
    pub async fn like(&self, id: &str, args: &FeedArgs) -> Result<()> {
        let review_id = routes::parse_review_id(id)?;
        guard(require_auth(self.sessions.session(), routes::all_reviews()))?;

        let feed =
            ReviewFeed::for_listing(self.client.clone(), Listing::Public, self.config.page_size);
        load_feed(&feed, args.page, &args.search, args.sort).await?;

        let state = feed.toggle_like(self.sessions.session(), review_id).await?;
        render::like_status(review_id, state.likes, state.is_liked);
        println!();
        render::feed(&feed.snapshot().await, false);
        Ok(())
    }

    pub async fn create(&self, review: &ReviewArgs) -> Result<()> {
        guard(require_auth(self.sessions.session(), routes::new_review()))?;

        let form = ReviewForm::new(&review.title, &review.movie, &review.content);
        let created = self.client.create_review(&form).await?;
        println!("Review #{} submitted for moderation", created.id);
        Ok(())
    }

    pub async fn edit(&self, id: &str, review: &ReviewArgs) -> Result<()> {
        let review_id = self.authored_review(id).await?;

        let form = ReviewForm::new(&review.title, &review.movie, &review.content);
        let updated = self.client.update_review(review_id, &form).await?;
        println!("Review #{} updated", updated.id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let review_id = self.authored_review(id).await?;

        self.client.delete_review(review_id).await?;
        println!("Review #{} deleted", review_id);
        Ok(())
    }

    pub async fn approve(&self, id: &str) -> Result<()> {
        let review_id = routes::parse_review_id(id)?;
        guard(require_admin(
            self.sessions.session(),
            &routes::review(review_id),
        ))?;

        self.client.approve_review(review_id).await?;
        println!("Review #{} approved", review_id);
        Ok(())
    }

    pub async fn reject(&self, id: &str) -> Result<()> {
        let review_id = routes::parse_review_id(id)?;
        guard(require_admin(
            self.sessions.session(),
            &routes::review(review_id),
        ))?;

        self.client.reject_review(review_id).await?;
        println!("Review #{} rejected", review_id);
        Ok(())
    }

    pub async fn user(&self, user_id: i64, args: &FeedArgs) -> Result<()> {
        let profile = self.client.get_user(user_id).await?;
        println!("{} (id {})", profile.username, profile.id);
        println!();

        let feed = ReviewFeed::for_author(self.client.clone(), profile.id, self.config.page_size);
        show_feed(&feed, args.page, &args.search, args.sort, false).await
    }

    /// Resolve a review the signed-in user may edit or delete
    async fn authored_review(&self, id: &str) -> Result<i64> {
        let review_id = routes::parse_review_id(id)?;
        guard(require_auth(
            self.sessions.session(),
            &routes::review(review_id),
        ))?;

        let review = self.client.get_review(review_id).await?;
        if ReviewViewMode::resolve(self.sessions.session().user(), &review, false)
            != ReviewViewMode::Author
        {
            bail!("Only the author can change this review");
        }

        Ok(review_id)
    }
}

/// Turn a guard decision into a command error
fn guard(decision: GuardDecision) -> Result<()> {
    match decision {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Pending => bail!("Session is still loading"),
        GuardDecision::Redirect { to, from: Some(from) } => {
            bail!("Sign in to open {} (go to {})", from, to)
        }
        GuardDecision::Redirect { to, from: None } => {
            bail!("Administrator access required (go to {})", to)
        }
    }
}

async fn load_feed<S: ReviewSource>(
    feed: &ReviewFeed<S>,
    page: u32,
    search: &str,
    sort: SortOption,
) -> Result<()> {
    feed.reload_with(search, sort).await;
    if page > 1 {
        feed.set_page(page).await;
    }

    if let Some(message) = feed.snapshot().await.error() {
        bail!("{}", message);
    }
    Ok(())
}

async fn show_feed<S: ReviewSource>(
    feed: &ReviewFeed<S>,
    page: u32,
    search: &str,
    sort: SortOption,
    show_status: bool,
) -> Result<()> {
    load_feed(feed, page, search, sort).await?;
    render::feed(&feed.snapshot().await, show_status);
    Ok(())
}
