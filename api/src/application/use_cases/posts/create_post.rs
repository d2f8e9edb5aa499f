use crate::application::ports::post_repository::PostRepository;
use crate::application::validation::{
    self, FieldErrors, Submitted, TITLE_MAX, TextInput, UseCaseError,
};
use crate::domain::posts::post::Post;

pub struct CreatePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Submitted<TextInput>,
    pub content: Submitted<TextInput>,
}

impl<'a, R: PostRepository + ?Sized> CreatePost<'a, R> {
    /// `author_id` is always the caller; any author named in the body was dropped upstream.
    pub async fn execute(&self, author_id: i64, input: PostInput) -> Result<Post, UseCaseError> {
        let mut errors = FieldErrors::new();
        let title = validation::required_text(&mut errors, "title", input.title, Some(TITLE_MAX));
        let content = validation::required_text(&mut errors, "content", input.content, None);
        let (Some(title), Some(content)) = (title, content) else {
            return Err(UseCaseError::Validation(errors));
        };
        let post = self.repo.create(author_id, &title, &content).await?;
        tracing::info!(post_id = post.id, author_id, "post_created");
        Ok(post)
    }
}
