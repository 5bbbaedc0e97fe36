use async_trait::async_trait;
use tracing::{debug, instrument};

use super::dto::{GameResult, GamesEnvelope};
use crate::{config::CatalogConfig, error::AppError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed catalog response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

/// Title search against the external game catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search_by_title(&self, title: &str) -> Result<Vec<GameResult>, CatalogError>;
}

/// Client for the MobyGames `/v1/games` endpoint.
#[derive(Clone)]
pub struct MobyGamesClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl MobyGamesClient {
    pub fn new(cfg: &CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[async_trait]
impl CatalogClient for MobyGamesClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn search_by_title(&self, title: &str) -> Result<Vec<GameResult>, CatalogError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str()), ("title", title)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = res.bytes().await?;
        let envelope: GamesEnvelope = serde_json::from_slice(&body)?;
        debug!(count = envelope.games.len(), "catalog search done");
        Ok(envelope.games.into_iter().map(GameResult::from).collect())
    }
}
