use crate::application::ports::like_repository::LikeRepository;
use crate::domain::posts::like::LikeToggle;

pub struct ToggleLike<'a, R: LikeRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: LikeRepository + ?Sized> ToggleLike<'a, R> {
    /// `Ok(None)` when the post does not exist.
    pub async fn execute(&self, post_id: i64, user_id: i64) -> anyhow::Result<Option<LikeToggle>> {
        let outcome = self.repo.toggle(post_id, user_id).await?;
        if let Some(t) = outcome {
            tracing::info!(post_id, user_id, outcome = ?t, "like_toggled");
        }
        Ok(outcome)
    }
}
