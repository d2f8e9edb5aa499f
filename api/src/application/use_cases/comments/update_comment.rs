use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::validation::{
    self, FieldErrors, PkInput, Submitted, TextInput, UseCaseError,
};
use crate::domain::posts::comment::{Comment, CommentChanges};

pub struct UpdateComment<'a, C, P>
where
    C: CommentRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    pub repo: &'a C,
    pub posts: &'a P,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Submitted<TextInput>,
    pub post: Submitted<PkInput>,
}

impl<'a, C, P> UpdateComment<'a, C, P>
where
    C: CommentRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    // No ownership check: any authenticated caller may edit any comment.
    pub async fn execute(
        &self,
        id: i64,
        caller_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, UseCaseError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let mut errors = FieldErrors::new();
        let content = validation::optional_text(&mut errors, "content", patch.content, None);
        let post_id = validation::optional_pk(&mut errors, "post", patch.post);
        if let Some(pid) = post_id {
            if !self.posts.exists(pid).await? {
                errors.add("post", validation::does_not_exist_message(pid));
            }
        }
        errors.finish()?;

        let changes = CommentChanges { content, post_id };
        let comment = self.repo.update(id, &changes).await?;
        if comment.is_some() {
            tracing::info!(comment_id = id, caller_id, "comment_updated");
        }
        Ok(comment)
    }
}
