//! In-memory repositories used by the test suite.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    auth::{repo::UserRepository, repo_types::User},
    error::AppError,
    library::repo::{LibraryRepository, SavedImage},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    images: Vec<SavedImage>,
}

/// Both tables behind one lock, so the email check and the insert are atomic
/// the same way a unique constraint is.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<User, AppError> {
        let t = self.tables.lock().await;
        t.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut t = self.tables.lock().await;
        if t.users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User {
            id: t.users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl LibraryRepository for MemoryStore {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<SavedImage>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.images
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add(&self, user_id: i64, img_url: &str) -> Result<SavedImage, AppError> {
        let mut t = self.tables.lock().await;
        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::NotFound);
        }
        let image = SavedImage {
            id: t.images.len() as i64 + 1,
            user_id,
            img_url: img_url.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.images.push(image.clone());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_creates_no_second_record() {
        let store = MemoryStore::default();
        store.create("a@x.com", "h1").await.expect("first create");
        let err = store.create("a@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(store.tables.lock().await.users.len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_reports_missing_user() {
        let store = MemoryStore::default();
        assert!(matches!(store.find_by_id(99).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn libraries_are_isolated_and_ordered() {
        let store = MemoryStore::default();
        let a = store.create("a@x.com", "h").await.unwrap();
        let b = store.create("b@x.com", "h").await.unwrap();

        store.add(a.id, "http://img/1").await.unwrap();
        store.add(b.id, "http://img/2").await.unwrap();
        store.add(a.id, "http://img/1").await.unwrap();

        let first = store.list_for_user(a.id).await.unwrap();
        let urls: Vec<_> = first.iter().map(|i| i.img_url.as_str()).collect();
        assert_eq!(urls, ["http://img/1", "http://img/1"]);
        assert_eq!(store.list_for_user(a.id).await.unwrap(), first);

        let b_urls: Vec<_> = store
            .list_for_user(b.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.img_url)
            .collect();
        assert_eq!(b_urls, ["http://img/2"]);
    }

    #[tokio::test]
    async fn add_requires_existing_owner() {
        let store = MemoryStore::default();
        assert!(matches!(store.add(5, "http://img/1").await, Err(AppError::NotFound)));
    }
}
