use async_trait::async_trait;

use crate::domain::posts::comment::{Comment, CommentChanges};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Comment>>;
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Comment>>;
    // Returns None if the post does not exist at insert time
    async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> anyhow::Result<Option<Comment>>;
    async fn update(&self, id: i64, changes: &CommentChanges) -> anyhow::Result<Option<Comment>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
