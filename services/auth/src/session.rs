//! Client session management
//!
//! [`SessionStore`] owns the authenticated identity of the client. It is
//! passed explicitly to whatever needs it; there is no global session.

use api::ApiClient;
use api::models::User;
use common::error::ApiResult;
use common::storage::TokenStore;
use common::validation::{validate_sign_in, validate_sign_up};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::AuthBackend;

/// Initialization state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Uninitialized,
    Loading,
    Resolved,
}

/// Snapshot of the client's authenticated identity
///
/// `user` is only ever set together with the `token` it was resolved from.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    pub(crate) fn new(status: SessionStatus) -> Self {
        Self {
            token: None,
            user: None,
            status,
        }
    }

    pub(crate) fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            status: SessionStatus::Resolved,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// True until initialization has finished
    pub fn is_loading(&self) -> bool {
        self.status != SessionStatus::Resolved
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionStatus::Uninitialized)
    }
}

/// Session store for the signed-in user
pub struct SessionStore<B = ApiClient> {
    backend: B,
    tokens: Arc<dyn TokenStore>,
    session: Session,
}

impl SessionStore<ApiClient> {
    /// Create a session store sharing the client's token store
    pub fn from_client(client: ApiClient) -> Self {
        let tokens = client.tokens().clone();
        Self::new(client, tokens)
    }
}

impl<B: AuthBackend> SessionStore<B> {
    /// Create a new session store
    pub fn new(backend: B, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Restore the session from the persisted token.
    ///
    /// Runs once; later calls return the current session unchanged. Any
    /// failure to resolve the profile clears the stored token.
    pub async fn initialize(&mut self) -> &Session {
        if self.session.status != SessionStatus::Uninitialized {
            return &self.session;
        }

        self.session.status = SessionStatus::Loading;

        let Some(token) = self.tokens.get() else {
            info!("No stored session token");
            self.session = Session::new(SessionStatus::Resolved);
            return &self.session;
        };

        match self.backend.current_user().await {
            Ok(user) => {
                info!("Restored session for user: {}", user.username);
                self.session = Session::authenticated(token, user);
            }
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                self.clear_stored_token();
                self.session = Session::new(SessionStatus::Resolved);
            }
        }

        &self.session
    }

    /// Sign in with username and password
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<User> {
        validate_sign_in(username, password)?;

        let token = self.backend.login(username, password).await?;
        self.establish(token).await
    }

    /// Create an account and sign in with it
    pub async fn register(&mut self, username: &str, password: &str) -> ApiResult<User> {
        validate_sign_up(username, password)?;

        let token = self.backend.register(username, password).await?;
        self.establish(token).await
    }

    /// Forget the session. Safe to call when already signed out.
    pub fn logout(&mut self) {
        if self.session.is_authenticated() {
            info!("Signing out");
        }

        self.clear_stored_token();
        self.session = Session::new(SessionStatus::Resolved);
    }

    async fn establish(&mut self, token: String) -> ApiResult<User> {
        self.tokens.set(&token)?;

        // The token stays persisted if this fails; the in-memory session is
        // left as it was.
        let user = self.backend.current_user().await.inspect_err(|e| {
            warn!("Token stored but profile fetch failed: {}", e);
        })?;

        info!("Signed in as: {}", user.username);
        self.session = Session::authenticated(token, user.clone());
        Ok(user)
    }

    fn clear_stored_token(&self) {
        if let Err(e) = self.tokens.remove() {
            warn!("Failed to clear stored token: {}", e);
        }
    }
}
