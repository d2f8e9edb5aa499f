use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

pub struct GetPost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> GetPost<'a, R> {
    pub async fn execute(&self, id: i64) -> anyhow::Result<Option<Post>> {
        self.repo.get_by_id(id).await
    }
}
