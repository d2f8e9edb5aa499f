use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::token_repository::TokenRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::validation::{self, FieldErrors, Submitted, TextInput, UseCaseError};

pub struct Login<'a, R, T>
where
    R: UserRepository + ?Sized,
    T: TokenRepository + ?Sized,
{
    pub repo: &'a R,
    pub tokens: &'a T,
}

#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub username: Submitted<TextInput>,
    pub password: Submitted<TextInput>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserRow,
    /// Credentials as submitted, echoed back in the response.
    pub username: String,
    pub password: String,
    pub token: String,
}

impl<'a, R, T> Login<'a, R, T>
where
    R: UserRepository + ?Sized,
    T: TokenRepository + ?Sized,
{
    /// `Ok(None)` means the credentials did not match an active user.
    pub async fn execute(&self, req: LoginRequest) -> Result<Option<LoginOutcome>, UseCaseError> {
        let mut errors = FieldErrors::new();
        let username = validation::required_text(&mut errors, "username", req.username, None);
        let password = validation::required_password(&mut errors, "password", req.password);
        let (Some(username), Some(password)) = (username, password) else {
            return Err(UseCaseError::Validation(errors));
        };

        let row = match self.repo.find_by_username(&username).await? {
            Some(r) if r.is_active => r,
            _ => {
                tracing::debug!(username = %username, "user_login_failed");
                return Ok(None);
            }
        };
        if !verify_password(row.password_hash.as_deref(), &password) {
            tracing::debug!(username = %username, "user_login_failed");
            return Ok(None);
        }

        let token = self.tokens.get_or_create(row.id).await?;
        tracing::info!(user_id = row.id, "token_issued");
        Ok(Some(LoginOutcome {
            user: UserRow {
                password_hash: None,
                ..row
            },
            username,
            password,
            token,
        }))
    }
}

fn verify_password(hash: Option<&str>, password: &str) -> bool {
    let Some(hash) = hash else {
        return false;
    };
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "unusable_password_hash");
            false
        }
    }
}
