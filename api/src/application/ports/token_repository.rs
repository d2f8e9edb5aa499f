use async_trait::async_trait;

use crate::application::ports::user_repository::UserRow;

#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Returns the user's key, creating one on first use. Never re-issues.
    async fn get_or_create(&self, user_id: i64) -> anyhow::Result<String>;
    async fn find_user_by_key(&self, key: &str) -> anyhow::Result<Option<UserRow>>;
}
