use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::validation::{self, FieldErrors, Submitted, TextInput, UseCaseError};
use crate::domain::posts::comment::Comment;

pub struct CreateComment<'a, C, P>
where
    C: CommentRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    pub repo: &'a C,
    pub posts: &'a P,
}

impl<'a, C, P> CreateComment<'a, C, P>
where
    C: CommentRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    /// A missing post is reported against the `post` field, not as not-found.
    pub async fn execute(
        &self,
        post_id: i64,
        author_id: i64,
        content: Submitted<TextInput>,
    ) -> Result<Comment, UseCaseError> {
        let mut errors = FieldErrors::new();
        let content = validation::required_text(&mut errors, "content", content, None);
        if !self.posts.exists(post_id).await? {
            errors.add("post", validation::does_not_exist_message(post_id));
        }
        let Some(content) = content else {
            return Err(UseCaseError::Validation(errors));
        };
        errors.finish()?;

        let comment = self
            .repo
            .create(post_id, author_id, &content)
            .await?
            .ok_or_else(|| {
                UseCaseError::Validation(FieldErrors::single(
                    "post",
                    validation::does_not_exist_message(post_id),
                ))
            })?;
        tracing::info!(comment_id = comment.id, post_id, author_id, "comment_created");
        Ok(comment)
    }
}
