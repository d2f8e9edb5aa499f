use crate::application::ports::post_repository::PostRepository;

pub struct DeletePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> DeletePost<'a, R> {
    // Any authenticated caller may delete any post; there is no ownership check.
    pub async fn execute(&self, id: i64, caller_id: i64) -> anyhow::Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(post_id = id, caller_id, "post_deleted");
        }
        Ok(deleted)
    }
}
