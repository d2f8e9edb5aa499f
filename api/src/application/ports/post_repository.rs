use async_trait::async_trait;

use crate::domain::posts::post::{Post, PostChanges};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>>;
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Post>>;
    async fn exists(&self, id: i64) -> anyhow::Result<bool>;
    async fn create(&self, author_id: i64, title: &str, content: &str) -> anyhow::Result<Post>;
    // Sets author_id unconditionally; only the supplied fields in `changes` are written
    async fn update(
        &self,
        id: i64,
        author_id: i64,
        changes: &PostChanges,
    ) -> anyhow::Result<Option<Post>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
