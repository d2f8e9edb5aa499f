use axum::{Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::comments::create_comment::CreateComment;
use crate::application::use_cases::comments::delete_comment::DeleteComment;
use crate::application::use_cases::comments::list_comments::ListComments;
use crate::application::use_cases::comments::update_comment::{CommentPatch, UpdateComment};
use crate::application::validation::{PkInput, TextInput};
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::comment::Comment;
use crate::presentation::http::auth::AuthUser;
use crate::presentation::http::envelope::{ApiError, ApiResponse};
use crate::presentation::http::extract::{DoubleOption, JsonBody, Pk, deserialize_double_option};

const COMMENT_NOT_FOUND: &str = "Comment not found";

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub post: i64,
    /// Username of the author.
    pub author: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        CommentResponse {
            id: c.id,
            post: c.post_id,
            author: c.author_username,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

/// `post` and `author` come from the path and the caller; body values for them are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCommentBody {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub content: DoubleOption<TextInput>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchCommentBody {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<String>)]
    pub content: DoubleOption<TextInput>,
    /// Moves the comment to another post.
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<i64>)]
    pub post: DoubleOption<PkInput>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/post/comment/:id",
            get(list_comments)
                .post(create_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/post/comment/{id}", tag = "Comments",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments Fetched", body = [CommentResponse]),
        (status = 404, description = "Comments not found (also when the post has none)")
    ))]
pub async fn list_comments(
    State(ctx): State<AppContext>,
    _user: AuthUser,
    Pk(post_id): Pk,
) -> Result<ApiResponse<Vec<CommentResponse>>, ApiError> {
    let repo = ctx.comment_repo();
    let uc = ListComments {
        repo: repo.as_ref(),
    };
    let comments = uc.execute(post_id).await?;
    // An empty list is reported as not found.
    if comments.is_empty() {
        return Err(ApiError::NotFound("Comments not found"));
    }
    Ok(ApiResponse::ok(
        "Comments Fetched",
        comments.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(post, path = "/post/comment/{id}", tag = "Comments",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = CreateCommentBody,
    responses(
        (status = 201, description = "Comment Created", body = CommentResponse),
        (status = 400, description = "Validation Error, including a post that does not exist")
    ))]
pub async fn create_comment(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Pk(post_id): Pk,
    JsonBody(body): JsonBody<CreateCommentBody>,
) -> Result<ApiResponse<CommentResponse>, ApiError> {
    let repo = ctx.comment_repo();
    let posts = ctx.post_repo();
    let uc = CreateComment {
        repo: repo.as_ref(),
        posts: posts.as_ref(),
    };
    let comment = uc
        .execute(post_id, user.id, body.content.into_submitted())
        .await?;
    Ok(ApiResponse::created("Comment Created", comment.into()))
}

#[utoipa::path(patch, path = "/post/comment/{id}", tag = "Comments",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = PatchCommentBody,
    responses(
        (status = 201, description = "Comment Updated", body = CommentResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Comment not found")
    ))]
pub async fn update_comment(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Pk(id): Pk,
    JsonBody(body): JsonBody<PatchCommentBody>,
) -> Result<ApiResponse<CommentResponse>, ApiError> {
    let repo = ctx.comment_repo();
    let posts = ctx.post_repo();
    let uc = UpdateComment {
        repo: repo.as_ref(),
        posts: posts.as_ref(),
    };
    let patch = CommentPatch {
        content: body.content.into_submitted(),
        post: body.post.into_submitted(),
    };
    let comment = uc
        .execute(id, user.id, patch)
        .await?
        .ok_or(ApiError::NotFound(COMMENT_NOT_FOUND))?;
    Ok(ApiResponse::created("Comment Updated", comment.into()))
}

#[utoipa::path(delete, path = "/post/comment/{id}", tag = "Comments",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment Deleted"),
        (status = 404, description = "Comment not found")
    ))]
pub async fn delete_comment(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Pk(id): Pk,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = ctx.comment_repo();
    let uc = DeleteComment {
        repo: repo.as_ref(),
    };
    if uc.execute(id, user.id).await? {
        Ok(ApiResponse::done("Comment Deleted"))
    } else {
        Err(ApiError::NotFound(COMMENT_NOT_FOUND))
    }
}
