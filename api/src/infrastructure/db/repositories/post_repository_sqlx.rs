use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::{Post, PostChanges};
use crate::infrastructure::db::PgPool;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn post_from_row(r: &PgRow) -> Post {
    Post {
        id: r.get("id"),
        title: r.get("title"),
        content: r.get("content"),
        author_id: r.get("author_id"),
        author_username: r.get("author_username"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.title, p.content, p.author_id, u.username AS author_username,
                      p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.author_id
               ORDER BY p.id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query(
            r#"SELECT p.id, p.title, p.content, p.author_id, u.username AS author_username,
                      p.created_at, p.updated_at
               FROM posts p
               JOIN users u ON u.id = p.author_id
               WHERE p.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(post_from_row))
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, author_id: i64, title: &str, content: &str) -> anyhow::Result<Post> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                   INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3)
                   RETURNING id, title, content, author_id, created_at, updated_at
               )
               SELECT i.id, i.title, i.content, i.author_id, u.username AS author_username,
                      i.created_at, i.updated_at
               FROM inserted i
               JOIN users u ON u.id = i.author_id"#,
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post_from_row(&row))
    }

    async fn update(
        &self,
        id: i64,
        author_id: i64,
        changes: &PostChanges,
    ) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query(
            r#"WITH updated AS (
                   UPDATE posts SET
                       title = COALESCE($3, title),
                       content = COALESCE($4, content),
                       author_id = $2,
                       updated_at = now()
                   WHERE id = $1
                   RETURNING id, title, content, author_id, created_at, updated_at
               )
               SELECT p.id, p.title, p.content, p.author_id, u.username AS author_username,
                      p.created_at, p.updated_at
               FROM updated p
               JOIN users u ON u.id = p.author_id"#,
        )
        .bind(id)
        .bind(author_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(post_from_row))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        // comments and likes go with it via ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
