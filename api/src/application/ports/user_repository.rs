use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    // Returns None when the username or email is already taken
    async fn create_user(&self, user: &NewUser<'_>) -> anyhow::Result<Option<UserRow>>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>>;
}
