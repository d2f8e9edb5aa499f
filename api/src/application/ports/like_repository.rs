use async_trait::async_trait;

use crate::domain::posts::like::{Like, LikeToggle};

#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Like>>;
    /// Flips the (post, user) like atomically. `None` when the post does not exist.
    async fn toggle(&self, post_id: i64, user_id: i64) -> anyhow::Result<Option<LikeToggle>>;
}
