use std::sync::Arc;

use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::like_repository::LikeRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::token_repository::TokenRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::comment_repository_sqlx::SqlxCommentRepository;
use crate::infrastructure::db::repositories::like_repository_sqlx::SqlxLikeRepository;
use crate::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository;
use crate::infrastructure::db::repositories::token_repository_sqlx::SqlxTokenRepository;
use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use crate::infrastructure::memory::MemoryStore;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    token_repo: Arc<dyn TokenRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    like_repo: Arc<dyn LikeRepository>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn TokenRepository>,
        post_repo: Arc<dyn PostRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        like_repo: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            post_repo,
            comment_repo,
            like_repo,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxTokenRepository::new(pool.clone())),
            Arc::new(SqlxPostRepository::new(pool.clone())),
            Arc::new(SqlxCommentRepository::new(pool.clone())),
            Arc::new(SqlxLikeRepository::new(pool)),
        )
    }

    /// Every port shares one store so cascades and the like toggle see a single state.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn token_repo(&self) -> Arc<dyn TokenRepository> {
        self.services.token_repo.clone()
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }

    pub fn comment_repo(&self) -> Arc<dyn CommentRepository> {
        self.services.comment_repo.clone()
    }

    pub fn like_repo(&self) -> Arc<dyn LikeRepository> {
        self.services.like_repo.clone()
    }
}
