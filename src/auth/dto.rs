use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Login and registration form fields.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(rename = "inputEmail", default)]
    pub email: String,
    #[serde(rename = "inputPassword", default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
        }
    }
}

/// View model for the login and registration pages.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub view: &'static str,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<PublicUser>,
}

impl AuthPage {
    pub fn login(current_user: Option<&User>) -> Self {
        Self::new("login", current_user)
    }

    pub fn register(current_user: Option<&User>) -> Self {
        Self::new("register", current_user)
    }

    fn new(view: &'static str, current_user: Option<&User>) -> Self {
        Self {
            view,
            year: current_year(),
            error: None,
            current_user: current_user.map(PublicUser::from),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

pub(crate) fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}
