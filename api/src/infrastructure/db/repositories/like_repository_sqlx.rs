use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::like_repository::LikeRepository;
use crate::domain::posts::like::{Like, LikeState, LikeToggle};
use crate::infrastructure::db::PgPool;

pub struct SqlxLikeRepository {
    pub pool: PgPool,
}

impl SqlxLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Like>> {
        let rows = sqlx::query(
            r#"SELECT l.id, l.post_id, l.user_id, u.username, l.created_at
               FROM likes l
               JOIN users u ON u.id = l.user_id
               WHERE l.post_id = $1
               ORDER BY l.id ASC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Like {
                id: r.get("id"),
                post_id: r.get("post_id"),
                user_id: r.get("user_id"),
                username: r.get("username"),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    async fn toggle(&self, post_id: i64, user_id: i64) -> anyhow::Result<Option<LikeToggle>> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the post serializes concurrent toggles for it
        let post: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
        if post.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM likes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let state = if existing.is_some() {
            LikeState::Present
        } else {
            LikeState::Absent
        };
        let (_, outcome) = state.toggle();
        match outcome {
            LikeToggle::Liked => {
                sqlx::query(
                    r#"INSERT INTO likes (post_id, user_id) VALUES ($1, $2)
                       ON CONFLICT (post_id, user_id) DO NOTHING"#,
                )
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
            LikeToggle::Unliked => {
                sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
                    .bind(post_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        tx.commit().await?;
        Ok(Some(outcome))
    }
}
