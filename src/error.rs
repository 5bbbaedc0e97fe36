use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::auth::session;

/// Why a login attempt was rejected. The two cases render different
/// messages on the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    UnknownEmail,
    WrongPassword,
}

impl LoginFailure {
    pub fn message(self) -> &'static str {
        match self {
            LoginFailure::UnknownEmail => "Email does not exist.",
            LoginFailure::WrongPassword => "Invalid password",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("invalid credentials: {}", .0.message())]
    InvalidCredentials(LoginFailure),

    #[error("authentication required")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("catalog upstream error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => {
                (session::clear(CookieJar::new()), Redirect::to("/")).into_response()
            }
            AppError::DuplicateEmail => {
                (StatusCode::CONFLICT, "Email already exists").into_response()
            }
            AppError::InvalidCredentials(reason) => {
                (StatusCode::UNAUTHORIZED, reason.message()).into_response()
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Upstream(detail) => {
                error!(error = %detail, "catalog request failed");
                (StatusCode::BAD_GATEWAY, "Game catalog is unavailable").into_response()
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
