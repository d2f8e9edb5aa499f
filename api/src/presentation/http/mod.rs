pub mod auth;
pub mod comments;
pub mod envelope;
pub mod extract;
pub mod health;
pub mod likes;
pub mod posts;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
};

use crate::bootstrap::app_context::AppContext;
use crate::infrastructure::db::PgPool;
use crate::presentation::http::envelope::ApiError;

/// Full route table. Cross-cutting layers (CORS, tracing, docs) are added by the binary.
pub fn router(ctx: AppContext, pool: Option<PgPool>) -> Router {
    let body_limit = ctx.cfg.body_max_bytes;
    Router::new()
        .merge(health::routes(pool))
        .merge(auth::routes(ctx.clone()))
        .merge(posts::routes(ctx.clone()))
        .merge(comments::routes(ctx.clone()))
        .merge(likes::routes(ctx))
        .fallback(not_found)
        .layer(middleware::map_response(envelope_method_not_allowed))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Routed paths answer unsupported methods with an empty 405; give it the envelope.
async fn envelope_method_not_allowed(res: Response) -> Response {
    if res.status() != StatusCode::METHOD_NOT_ALLOWED {
        return res;
    }
    let allow = res.headers().get(header::ALLOW).cloned();
    let mut wrapped = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        wrapped.headers_mut().insert(header::ALLOW, allow);
    }
    wrapped
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}
