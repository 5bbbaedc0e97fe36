use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://api.mobygames.com/v1/games";

/// Session lifetimes are clamped to `1..=MAX_SESSION_TTL_MINUTES` (one year).
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Missing required
    /// variables are an error; everything else falls back to a default.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let session = SessionConfig {
            secret: required("SECRET_KEY")?,
            issuer: lookup("SESSION_ISSUER").unwrap_or_else(|| "game-library".into()),
            audience: lookup("SESSION_AUDIENCE").unwrap_or_else(|| "game-library-web".into()),
            ttl_minutes: lookup("SESSION_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7)
                .clamp(1, MAX_SESSION_TTL_MINUTES),
            cookie_secure: lookup("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        let catalog = CatalogConfig {
            endpoint: lookup("CATALOG_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_CATALOG_ENDPOINT.into()),
            api_key: required("API_KEY")?,
        };
        Ok(Self {
            database_url,
            session,
            catalog,
        })
    }
}
