pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod token_repository;
pub mod user_repository;
