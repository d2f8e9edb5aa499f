use axum::{
    Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::post,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::validation::TextInput;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::envelope::{
    ApiError, ApiResponse, INACTIVE_USER, INVALID_TOKEN, NOT_AUTHENTICATED,
};
use crate::presentation::http::extract::{DoubleOption, JsonBody, deserialize_double_option};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub first_name: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub last_name: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub username: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub email: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub password: DoubleOption<TextInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub username: DoubleOption<TextInput>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = String)]
    pub password: DoubleOption<TextInput>,
}

/// Submitted credentials echoed back together with the issued token.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub username: String,
    pub password: String,
    pub token: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/register/", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, description = "User Registered", body = RegisterResponse),
    (status = 400, description = "Validation Error")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        first_name: req.first_name.into_submitted(),
        last_name: req.last_name.into_submitted(),
        username: req.username.into_submitted(),
        email: req.email.into_submitted(),
        password: req.password.into_submitted(),
    };
    let registered = uc.execute(dto).await?;
    Ok(ApiResponse::created(
        "User Registered",
        RegisterResponse {
            first_name: registered.first_name,
            last_name: registered.last_name,
            username: registered.user.username,
            email: registered.user.email,
        },
    ))
}

#[utoipa::path(post, path = "/login/", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, description = "User logged in", body = LoginResponse),
    (status = 400, description = "Validation Error or Invalid Credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let repo = ctx.user_repo();
    let tokens = ctx.token_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
        tokens: tokens.as_ref(),
    };
    let dto = LoginDto {
        username: req.username.into_submitted(),
        password: req.password.into_submitted(),
    };
    let outcome = uc.execute(dto).await?.ok_or(ApiError::InvalidCredentials)?;
    Ok(ApiResponse::ok(
        "User logged in",
        LoginResponse {
            username: outcome.username,
            password: outcome.password,
            token: outcome.token,
        },
    ))
}

// --- Token extractor & per-request identity ---

/// Raw key from `Authorization: Token <key>` (or `Bearer <key>`).
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;
        parse_authorization(header)
            .map(|key| Bearer(key.to_string()))
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))
    }
}

fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    let known = scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    // keys never contain spaces
    if !known || key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(key)
}

/// The authenticated caller, resolved once per request and handed to protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Bearer(key) = Bearer::from_request_parts(parts, ctx).await?;
        let tokens = ctx.token_repo();
        let uc = Authenticate {
            tokens: tokens.as_ref(),
        };
        let user = uc
            .execute(&key)
            .await?
            .ok_or(ApiError::Unauthorized(INVALID_TOKEN))?;
        if !user.is_active {
            return Err(ApiError::Unauthorized(INACTIVE_USER));
        }
        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}
