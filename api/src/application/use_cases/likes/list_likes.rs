use crate::application::ports::like_repository::LikeRepository;
use crate::domain::posts::like::Like;

pub struct ListLikes<'a, R: LikeRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: LikeRepository + ?Sized> ListLikes<'a, R> {
    pub async fn execute(&self, post_id: i64) -> anyhow::Result<Vec<Like>> {
        self.repo.list_for_post(post_id).await
    }
}
