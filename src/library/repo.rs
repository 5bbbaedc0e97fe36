use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::error::AppError;

/// One saved cover image in a user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SavedImage {
    pub id: i64,
    pub user_id: i64,
    pub img_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Images owned by `user_id`, oldest first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<SavedImage>, AppError>;

    /// Appends `img_url` to the library. Repeated URLs are kept.
    async fn add(&self, user_id: i64, img_url: &str) -> Result<SavedImage, AppError>;
}

#[derive(Clone)]
pub struct PgLibraryRepository {
    db: PgPool,
}

impl PgLibraryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LibraryRepository for PgLibraryRepository {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<SavedImage>, AppError> {
        let rows = sqlx::query_as::<_, SavedImage>(
            r#"
            SELECT id, user_id, img_url, created_at
              FROM images
             WHERE user_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn add(&self, user_id: i64, img_url: &str) -> Result<SavedImage, AppError> {
        let res = sqlx::query_as::<_, SavedImage>(
            r#"
            INSERT INTO images (user_id, img_url)
            VALUES ($1, $2)
            RETURNING id, user_id, img_url, created_at
            "#,
        )
        .bind(user_id)
        .bind(img_url)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(image) => Ok(image),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
