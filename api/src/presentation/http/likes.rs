use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::likes::list_likes::ListLikes;
use crate::application::use_cases::likes::toggle_like::ToggleLike;
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::like::Like;
use crate::presentation::http::auth::AuthUser;
use crate::presentation::http::envelope::{ApiError, ApiResponse};
use crate::presentation::http::extract::Pk;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeResponse {
    pub id: i64,
    pub post: i64,
    /// Username of the user who liked the post.
    pub user: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Like> for LikeResponse {
    fn from(l: Like) -> Self {
        LikeResponse {
            id: l.id,
            post: l.post_id,
            user: l.username,
            created_at: l.created_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/post/like/:id", get(list_likes).post(toggle_like))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/post/like/{id}", tag = "Likes",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like Fetched", body = [LikeResponse]),
        (status = 404, description = "Likes not found (also when the post has none)")
    ))]
pub async fn list_likes(
    State(ctx): State<AppContext>,
    _user: AuthUser,
    Pk(post_id): Pk,
) -> Result<ApiResponse<Vec<LikeResponse>>, ApiError> {
    let repo = ctx.like_repo();
    let uc = ListLikes {
        repo: repo.as_ref(),
    };
    let likes = uc.execute(post_id).await?;
    if likes.is_empty() {
        return Err(ApiError::NotFound("Likes not found"));
    }
    Ok(ApiResponse::ok(
        "Like Fetched",
        likes.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(post, path = "/post/like/{id}", tag = "Likes",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post Liked / Post unliked"),
        (status = 404, description = "Post not found")
    ))]
pub async fn toggle_like(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Pk(post_id): Pk,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = ctx.like_repo();
    let uc = ToggleLike {
        repo: repo.as_ref(),
    };
    let outcome = uc
        .execute(post_id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;
    Ok(ApiResponse::done(outcome.message()))
}
