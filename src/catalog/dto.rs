use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response envelope of the catalog's `/games` endpoint.
#[derive(Debug, Deserialize)]
pub struct GamesEnvelope {
    pub games: Vec<RawGame>,
}

/// A game as the catalog sends it. Fields this service reads are typed; the
/// rest are carried along untouched in `extra`.
#[derive(Debug, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub game_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub moby_url: Option<String>,
    #[serde(default)]
    pub sample_cover: Option<RawImage>,
    #[serde(default)]
    pub sample_screenshots: Vec<RawImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub thumbnail_image: Option<String>,
}

/// A search hit offered to the user, with the image URLs they may save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub game_id: Option<i64>,
    pub name: String,
    pub moby_url: Option<String>,
    pub cover_urls: Vec<String>,
    /// Upstream fields not modelled above, e.g. `platforms` or `genres`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<RawGame> for GameResult {
    fn from(g: RawGame) -> Self {
        let mut cover_urls = Vec::new();
        if let Some(cover) = g.sample_cover {
            cover_urls.extend(cover.image);
            cover_urls.extend(cover.thumbnail_image);
        }
        cover_urls.extend(g.sample_screenshots.into_iter().filter_map(|s| s.image));
        Self {
            game_id: g.game_id,
            name: g.title,
            moby_url: g.moby_url,
            cover_urls,
            extra: g.extra,
        }
    }
}
