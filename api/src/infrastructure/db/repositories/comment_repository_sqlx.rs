use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::comment_repository::CommentRepository;
use crate::domain::posts::comment::{Comment, CommentChanges};
use crate::infrastructure::db::PgPool;

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn comment_from_row(r: &PgRow) -> Comment {
    Comment {
        id: r.get("id"),
        post_id: r.get("post_id"),
        author_id: r.get("author_id"),
        author_username: r.get("author_username"),
        content: r.get("content"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                      c.content, c.created_at
               FROM comments c
               JOIN users u ON u.id = c.author_id
               WHERE c.post_id = $1
               ORDER BY c.id ASC"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query(
            r#"SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                      c.content, c.created_at
               FROM comments c
               JOIN users u ON u.id = c.author_id
               WHERE c.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                   INSERT INTO comments (post_id, author_id, content)
                   SELECT $1, $2, $3
                   WHERE EXISTS (SELECT 1 FROM posts WHERE id = $1)
                   RETURNING id, post_id, author_id, content, created_at
               )
               SELECT i.id, i.post_id, i.author_id, u.username AS author_username,
                      i.content, i.created_at
               FROM inserted i
               JOIN users u ON u.id = i.author_id"#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn update(&self, id: i64, changes: &CommentChanges) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query(
            r#"WITH updated AS (
                   UPDATE comments SET
                       content = COALESCE($2, content),
                       post_id = COALESCE($3, post_id)
                   WHERE id = $1
                   RETURNING id, post_id, author_id, content, created_at
               )
               SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                      c.content, c.created_at
               FROM updated c
               JOIN users u ON u.id = c.author_id"#,
        )
        .bind(id)
        .bind(changes.content.as_deref())
        .bind(changes.post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
