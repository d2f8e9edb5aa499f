use crate::application::ports::post_repository::PostRepository;
use crate::application::use_cases::posts::create_post::PostInput;
use crate::application::validation::{self, FieldErrors, TITLE_MAX, UseCaseError};
use crate::domain::posts::post::{Post, PostChanges};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every field must be supplied.
    Replace,
    /// Only supplied fields are validated and written.
    Partial,
}

pub struct UpdatePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> UpdatePost<'a, R> {
    /// `Ok(None)` when no post has this id. The post's author becomes `author_id`.
    pub async fn execute(
        &self,
        id: i64,
        author_id: i64,
        input: PostInput,
        mode: UpdateMode,
    ) -> Result<Option<Post>, UseCaseError> {
        if !self.repo.exists(id).await? {
            return Ok(None);
        }

        let mut errors = FieldErrors::new();
        let changes = match mode {
            UpdateMode::Replace => PostChanges {
                title: validation::required_text(&mut errors, "title", input.title, Some(TITLE_MAX)),
                content: validation::required_text(&mut errors, "content", input.content, None),
            },
            UpdateMode::Partial => PostChanges {
                title: validation::optional_text(&mut errors, "title", input.title, Some(TITLE_MAX)),
                content: validation::optional_text(&mut errors, "content", input.content, None),
            },
        };
        errors.finish()?;

        let post = self.repo.update(id, author_id, &changes).await?;
        if let Some(p) = &post {
            tracing::info!(post_id = p.id, author_id, ?mode, "post_updated");
        }
        Ok(post)
    }
}
