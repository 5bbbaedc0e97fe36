use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod session;

pub(crate) use dto::{current_year, PublicUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
