use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo::UserRepository,
        repo_types::User,
    },
    error::{AppError, LoginFailure},
};

/// One `@` with something on both sides. Domains without a dot, such as
/// `localhost`, are accepted.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks `password` against the stored hash for `email`.
pub async fn authenticate(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials(LoginFailure::UnknownEmail));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials(LoginFailure::WrongPassword));
    }

    info!(user_id = user.id, "user logged in");
    Ok(user)
}

/// Creates an account. Uniqueness of the email is left to the repository.
pub async fn register(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email"));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required"));
    }

    let hash = hash_password(password)?;
    let user = users.create(&email, &hash).await.inspect_err(|e| {
        if matches!(e, AppError::DuplicateEmail) {
            warn!(email = %email, "email already registered");
        }
    })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}
