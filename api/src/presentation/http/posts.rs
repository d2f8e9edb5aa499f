use axum::{
    Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::posts::create_post::{CreatePost, PostInput};
use crate::application::use_cases::posts::delete_post::DeletePost;
use crate::application::use_cases::posts::get_post::GetPost;
use crate::application::use_cases::posts::list_posts::ListPosts;
use crate::application::use_cases::posts::update_post::{UpdateMode, UpdatePost};
use crate::application::validation::{PkInput, TextInput};
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::post::Post;
use crate::presentation::http::auth::AuthUser;
use crate::presentation::http::envelope::{ApiError, ApiResponse};
use crate::presentation::http::extract::{DoubleOption, JsonBody, Pk, deserialize_double_option};

const POST_NOT_FOUND: &str = "Post not found";

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Username of the author.
    pub author: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        PostResponse {
            id: p.id,
            title: p.title,
            content: p.content,
            author: p.author_username,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body for every write on `/post/`. The post being targeted travels in `id`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PostBody {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<i64>)]
    pub id: DoubleOption<PkInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<String>)]
    pub title: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<String>)]
    pub content: DoubleOption<TextInput>,
    /// Ignored: the author is always the caller.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub author: Option<serde_json::Value>,
}

impl PostBody {
    fn target_id(&self) -> Result<i64, ApiError> {
        match &self.id {
            DoubleOption::NotProvided => Err(ApiError::MissingId("Post")),
            DoubleOption::Null => Err(ApiError::NotFound(POST_NOT_FOUND)),
            DoubleOption::Some(raw) => raw.as_pk().ok_or(ApiError::NotFound(POST_NOT_FOUND)),
        }
    }

    fn into_input(self) -> PostInput {
        PostInput {
            title: self.title.into_submitted(),
            content: self.content.into_submitted(),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/post/",
            get(list_posts)
                .post(create_post)
                .put(replace_post)
                .patch(patch_post)
                .delete(delete_post),
        )
        .route("/post-detail/:id", get(get_post))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/post/", tag = "Posts", security(()), responses(
    (status = 200, description = "Fetched all posts", body = [PostResponse])
))]
pub async fn list_posts(
    State(ctx): State<AppContext>,
) -> Result<ApiResponse<Vec<PostResponse>>, ApiError> {
    let repo = ctx.post_repo();
    let uc = ListPosts {
        repo: repo.as_ref(),
    };
    let posts = uc.execute().await?;
    Ok(ApiResponse::ok(
        "Fetched all posts",
        posts.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(post, path = "/post/", tag = "Posts", request_body = PostBody, responses(
    (status = 201, description = "Post Created", body = PostResponse),
    (status = 400, description = "Validation Error"),
    (status = 401, description = "Missing or invalid token")
))]
pub async fn create_post(
    State(ctx): State<AppContext>,
    user: AuthUser,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<PostResponse>, ApiError> {
    let repo = ctx.post_repo();
    let uc = CreatePost {
        repo: repo.as_ref(),
    };
    let post = uc.execute(user.id, body.into_input()).await?;
    Ok(ApiResponse::created("Post Created", post.into()))
}

async fn update_post(
    ctx: AppContext,
    user: AuthUser,
    body: PostBody,
    mode: UpdateMode,
) -> Result<ApiResponse<PostResponse>, ApiError> {
    let id = body.target_id()?;
    let repo = ctx.post_repo();
    let uc = UpdatePost {
        repo: repo.as_ref(),
    };
    let post = uc
        .execute(id, user.id, body.into_input(), mode)
        .await?
        .ok_or(ApiError::NotFound(POST_NOT_FOUND))?;
    // 201 on update is the established contract of this endpoint
    Ok(ApiResponse::created("Post Updated", post.into()))
}

#[utoipa::path(put, path = "/post/", tag = "Posts", request_body = PostBody, responses(
    (status = 201, description = "Post Updated", body = PostResponse),
    (status = 400, description = "Post id is required, or Validation Error"),
    (status = 404, description = "Post not found")
))]
pub async fn replace_post(
    State(ctx): State<AppContext>,
    user: AuthUser,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<PostResponse>, ApiError> {
    update_post(ctx, user, body, UpdateMode::Replace).await
}

#[utoipa::path(patch, path = "/post/", tag = "Posts", request_body = PostBody, responses(
    (status = 201, description = "Post Updated", body = PostResponse),
    (status = 400, description = "Post id is required, or Validation Error"),
    (status = 404, description = "Post not found")
))]
pub async fn patch_post(
    State(ctx): State<AppContext>,
    user: AuthUser,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<PostResponse>, ApiError> {
    update_post(ctx, user, body, UpdateMode::Partial).await
}

#[utoipa::path(delete, path = "/post/", tag = "Posts", request_body = PostBody, responses(
    (status = 200, description = "Post Deleted"),
    (status = 400, description = "Post id is required"),
    (status = 404, description = "Post not found")
))]
pub async fn delete_post(
    State(ctx): State<AppContext>,
    user: AuthUser,
    JsonBody(body): JsonBody<PostBody>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = body.target_id()?;
    let repo = ctx.post_repo();
    let uc = DeletePost {
        repo: repo.as_ref(),
    };
    if uc.execute(id, user.id).await? {
        Ok(ApiResponse::done("Post Deleted"))
    } else {
        Err(ApiError::NotFound(POST_NOT_FOUND))
    }
}

#[utoipa::path(get, path = "/post-detail/{id}", tag = "Posts", security(()),
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post Fetched", body = PostResponse),
        (status = 404, description = "Post not found")
    ))]
pub async fn get_post(
    State(ctx): State<AppContext>,
    Pk(id): Pk,
) -> Result<ApiResponse<PostResponse>, ApiError> {
    let repo = ctx.post_repo();
    let uc = GetPost {
        repo: repo.as_ref(),
    };
    let post = uc
        .execute(id)
        .await?
        .ok_or(ApiError::NotFound(POST_NOT_FOUND))?;
    Ok(ApiResponse::ok("Post Fetched", post.into()))
}
