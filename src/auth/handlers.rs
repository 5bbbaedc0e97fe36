use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthPage, CredentialsForm},
        services,
        session::{self, CurrentUser, MaybeUser, SessionKeys},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
}

#[instrument(skip_all)]
pub async fn login_page(MaybeUser(user): MaybeUser) -> Json<AuthPage> {
    Json(AuthPage::login(user.as_ref()))
}

#[instrument(skip(state, current, jar, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match services::authenticate(state.users.as_ref(), &form.email, &form.password).await {
        Ok(user) => {
            let keys = SessionKeys::from_ref(&state);
            let jar = session::login(&keys, jar, &user)?;
            Ok((jar, Redirect::to("/profile")).into_response())
        }
        Err(AppError::InvalidCredentials(reason)) => {
            let page = AuthPage::login(current.as_ref()).with_error(reason.message());
            Ok(Json(page).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
pub async fn register_page(MaybeUser(user): MaybeUser) -> Json<AuthPage> {
    Json(AuthPage::register(user.as_ref()))
}

#[instrument(skip(state, jar, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match services::register(state.users.as_ref(), &form.email, &form.password).await {
        Ok(user) => {
            let keys = SessionKeys::from_ref(&state);
            let jar = session::login(&keys, jar, &user)?;
            Ok((jar, Redirect::to("/profile")).into_response())
        }
        Err(AppError::DuplicateEmail) => {
            Ok(Json(AuthPage::register(None).with_error("Email already exists")).into_response())
        }
        Err(AppError::BadRequest(msg)) => {
            Ok(Json(AuthPage::register(None).with_error(msg)).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn logout(CurrentUser(user): CurrentUser, jar: CookieJar) -> (CookieJar, Redirect) {
    info!("user logged out");
    (session::clear(jar), Redirect::to("/"))
}
