use async_trait::async_trait;

use crate::application::ports::token_repository::TokenRepository;
use crate::application::ports::user_repository::UserRow;
use crate::infrastructure::crypto::generate_token_key;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::user_repository_sqlx::user_from_row;

pub struct SqlxTokenRepository {
    pub pool: PgPool,
}

impl SqlxTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqlxTokenRepository {
    async fn get_or_create(&self, user_id: i64) -> anyhow::Result<String> {
        // UNIQUE(user_id) makes concurrent first logins converge on one key
        sqlx::query(
            r#"INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2)
               ON CONFLICT (user_id) DO NOTHING"#,
        )
        .bind(generate_token_key())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        let key: String = sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(key)
    }

    async fn find_user_by_key(&self, key: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.is_active
               FROM auth_tokens t
               JOIN users u ON u.id = t.user_id
               WHERE t.key = $1"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }
}
