use crate::application::ports::comment_repository::CommentRepository;

pub struct DeleteComment<'a, R: CommentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CommentRepository + ?Sized> DeleteComment<'a, R> {
    pub async fn execute(&self, id: i64, caller_id: i64) -> anyhow::Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(comment_id = id, caller_id, "comment_deleted");
        }
        Ok(deleted)
    }
}
