use crate::application::ports::token_repository::TokenRepository;
use crate::application::ports::user_repository::UserRow;

/// Resolves an opaque token key to its owner.
pub struct Authenticate<'a, T: TokenRepository + ?Sized> {
    pub tokens: &'a T,
}

impl<'a, T: TokenRepository + ?Sized> Authenticate<'a, T> {
    pub async fn execute(&self, key: &str) -> anyhow::Result<Option<UserRow>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }
        self.tokens.find_user_by_key(key).await
    }
}
