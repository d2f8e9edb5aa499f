use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use social_api::bootstrap::app_context::{AppContext, AppServices};
use social_api::bootstrap::config::{Config, StoreBackend};
use social_api::infrastructure::memory::MemoryStore;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            social_api::presentation::http::auth::register,
            social_api::presentation::http::auth::login,
            social_api::presentation::http::posts::list_posts,
            social_api::presentation::http::posts::create_post,
            social_api::presentation::http::posts::replace_post,
            social_api::presentation::http::posts::patch_post,
            social_api::presentation::http::posts::delete_post,
            social_api::presentation::http::posts::get_post,
            social_api::presentation::http::comments::list_comments,
            social_api::presentation::http::comments::create_comment,
            social_api::presentation::http::comments::update_comment,
            social_api::presentation::http::comments::delete_comment,
            social_api::presentation::http::likes::list_likes,
            social_api::presentation::http::likes::toggle_like,
            social_api::presentation::http::health::health,
        ),
        components(schemas(
            social_api::presentation::http::auth::RegisterRequest,
            social_api::presentation::http::auth::RegisterResponse,
            social_api::presentation::http::auth::LoginRequest,
            social_api::presentation::http::auth::LoginResponse,
            social_api::presentation::http::posts::PostBody,
            social_api::presentation::http::posts::PostResponse,
            social_api::presentation::http::comments::CreateCommentBody,
            social_api::presentation::http::comments::PatchCommentBody,
            social_api::presentation::http::comments::CommentResponse,
            social_api::presentation::http::likes::LikeResponse,
            social_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Registration and token login"),
            (name = "Posts", description = "Posts"),
            (name = "Comments", description = "Comments on posts"),
            (name = "Likes", description = "Post likes"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "social_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting social API");

    let (services, pool) = match cfg.store_backend {
        StoreBackend::Postgres => {
            let pool = social_api::infrastructure::db::connect_pool(
                &cfg.database_url,
                cfg.db_max_connections,
            )
            .await?;
            social_api::infrastructure::db::migrate(&pool).await?;
            (AppServices::postgres(pool.clone()), Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("store_backend_memory_data_is_not_persisted");
            (AppServices::in_memory(Arc::new(MemoryStore::new())), None)
        }
    };

    let ctx = AppContext::new(cfg.clone(), services);

    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        // Production always has a valid origin (checked in Config); anything else is local dev
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
            .allow_methods(methods)
            .allow_headers(headers),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    };

    let app = social_api::presentation::http::router(ctx, pool)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?e, "ctrl_c_handler_failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown_signal_received");
}
