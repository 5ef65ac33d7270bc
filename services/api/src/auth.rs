//! Authentication endpoints

use common::error::ApiResult;
use tracing::info;

use crate::client::ApiClient;
use crate::models::{CredentialsRequest, TokenResponse, User};

impl ApiClient {
    /// Register a new account and return the issued access token
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<String> {
        info!("Registering user: {}", username);

        let response: TokenResponse = self
            .post("/auth/register", &credentials(username, password))
            .await?;
        Ok(response.access_token)
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        info!("Login attempt for user: {}", username);

        let response: TokenResponse = self
            .post("/auth/login", &credentials(username, password))
            .await?;
        Ok(response.access_token)
    }

    /// Fetch the profile behind the current token
    pub async fn me(&self) -> ApiResult<User> {
        self.get("/auth/me").await
    }
}

fn credentials(username: &str, password: &str) -> CredentialsRequest {
    CredentialsRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}
