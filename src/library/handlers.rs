use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProfilePage, SaveQuery, SearchForm, SearchPage};
use crate::{
    auth::{current_year, session::CurrentUser, PublicUser},
    error::AppError,
    state::AppState,
};

pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).post(search_catalog))
        // Saves a cover into the library despite the path name.
        .route("/search", get(save_image))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfilePage>, AppError> {
    let library = state.library.list_for_user(user.id).await?;
    Ok(Json(ProfilePage {
        view: "profile",
        year: current_year(),
        current_user: PublicUser::from(&user),
        library,
    }))
}

#[instrument(skip_all, fields(user_id = user.id, title = %form.title))]
pub async fn search_catalog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage>, AppError> {
    let games = state.catalog.search_by_title(form.title.trim()).await?;
    Ok(Json(SearchPage {
        view: "search",
        year: current_year(),
        results: games.len(),
        games,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn save_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<SaveQuery>,
) -> Result<Redirect, AppError> {
    let img_url = q
        .img
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::BadRequest("img is required"))?;

    let image = state.library.add(user.id, img_url).await?;
    info!(image_id = image.id, "image saved to library");
    Ok(Redirect::to("/profile"))
}
