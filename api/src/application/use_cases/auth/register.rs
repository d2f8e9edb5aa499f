use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::{NewUser, UserRepository, UserRow};
use crate::application::validation::{
    self, EMAIL_TAKEN, FieldErrors, NAME_MAX, Submitted, TextInput, USERNAME_MAX,
    USERNAME_TAKEN, UseCaseError,
};

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub first_name: Submitted<TextInput>,
    pub last_name: Submitted<TextInput>,
    pub username: Submitted<TextInput>,
    pub email: Submitted<TextInput>,
    pub password: Submitted<TextInput>,
}

/// The accepted registration, minus the password.
#[derive(Debug, Clone)]
pub struct Registered {
    pub user: UserRow,
    pub first_name: String,
    pub last_name: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: RegisterRequest) -> Result<Registered, UseCaseError> {
        let mut errors = FieldErrors::new();
        let first_name =
            validation::required_text(&mut errors, "first_name", req.first_name, Some(NAME_MAX));
        let last_name =
            validation::required_text(&mut errors, "last_name", req.last_name, Some(NAME_MAX));
        let username =
            validation::required_text(&mut errors, "username", req.username, Some(USERNAME_MAX));
        let email = validation::required_email(&mut errors, "email", req.email);
        let password = validation::required_password(&mut errors, "password", req.password);
        let (Some(first_name), Some(last_name), Some(username), Some(email), Some(password)) =
            (first_name, last_name, username, email, password)
        else {
            return Err(UseCaseError::Validation(errors));
        };

        // Uniqueness is checked explicitly so a duplicate never reaches the insert.
        if self.repo.username_exists(&username).await? {
            return Err(UseCaseError::Validation(FieldErrors::non_field(
                USERNAME_TAKEN,
            )));
        }
        if self.repo.email_exists(&email).await? {
            return Err(UseCaseError::Validation(FieldErrors::non_field(EMAIL_TAKEN)));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let created = self
            .repo
            .create_user(&NewUser {
                username: &username,
                email: &email,
                first_name: &first_name,
                last_name: &last_name,
                password_hash: &hash,
            })
            .await?;
        let Some(user) = created else {
            // Lost a race with a concurrent registration.
            let message = if self.repo.username_exists(&username).await? {
                USERNAME_TAKEN
            } else {
                EMAIL_TAKEN
            };
            return Err(UseCaseError::Validation(FieldErrors::non_field(message)));
        };
        tracing::info!(user_id = user.id, username = %user.username, "user_registered");
        Ok(Registered {
            user,
            first_name,
            last_name,
        })
    }
}
