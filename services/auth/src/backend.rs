//! Backend calls the session store depends on

use api::ApiClient;
use api::models::User;
use async_trait::async_trait;
use common::error::ApiResult;

/// Authentication collaborator of the session store
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token
    async fn login(&self, username: &str, password: &str) -> ApiResult<String>;

    /// Create an account and return its token
    async fn register(&self, username: &str, password: &str) -> ApiResult<String>;

    /// Resolve the profile behind the persisted token
    async fn current_user(&self) -> ApiResult<User>;
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        ApiClient::login(self, username, password).await
    }

    async fn register(&self, username: &str, password: &str) -> ApiResult<String> {
        ApiClient::register(self, username, password).await
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.me().await
    }
}
