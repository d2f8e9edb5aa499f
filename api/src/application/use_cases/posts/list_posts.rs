use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

pub struct ListPosts<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> ListPosts<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Post>> {
        self.repo.list_all().await
    }
}
