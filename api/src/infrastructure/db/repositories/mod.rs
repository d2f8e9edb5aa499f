pub mod comment_repository_sqlx;
pub mod like_repository_sqlx;
pub mod post_repository_sqlx;
pub mod token_repository_sqlx;
pub mod user_repository_sqlx;
