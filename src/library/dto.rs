use serde::{Deserialize, Serialize};

use crate::{auth::PublicUser, catalog::GameResult, library::repo::SavedImage};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(rename = "gameTitle", default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveQuery {
    pub img: Option<String>,
}

/// The signed-in user's saved covers.
#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub view: &'static str,
    pub year: i32,
    pub current_user: PublicUser,
    pub library: Vec<SavedImage>,
}

/// Catalog hits for a title search. Nothing here is persisted.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub view: &'static str,
    pub year: i32,
    pub results: usize,
    pub games: Vec<GameResult>,
}
