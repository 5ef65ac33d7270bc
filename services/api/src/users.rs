//! User endpoints

use common::error::ApiResult;

use crate::client::ApiClient;
use crate::models::PublicUser;

impl ApiClient {
    /// Get a user's public profile by ID
    pub async fn get_user(&self, user_id: i64) -> ApiResult<PublicUser> {
        self.get(&format!("/users/{}", user_id)).await
    }
}
