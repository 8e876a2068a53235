//! UserStore trait and the in-process implementation.

use async_trait::async_trait;
use dashmap::DashMap;

use super::types::UserRecord;
use crate::error::ExternalError;

/// Trait for user-record backends. Email is the unique key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, ExternalError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, ExternalError>;

    /// Insert a new record. The caller is responsible for the duplicate-email
    /// check; this is a plain insert.
    async fn create(&self, record: UserRecord) -> Result<UserRecord, ExternalError>;
}

/// Concurrent in-memory user store, keyed by id with an email index.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
    email_index: DashMap<String, String>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, ExternalError> {
        let Some(id) = self.email_index.get(email) else {
            return Ok(None);
        };
        Ok(self.users.get(id.value()).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, ExternalError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn create(&self, record: UserRecord) -> Result<UserRecord, ExternalError> {
        self.email_index
            .insert(record.email.clone(), record.id.clone());
        self.users.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, email: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = MemoryUserStore::new();
        store.create(record("u1", "a@example.com")).await.unwrap();

        let by_email = store.find_by_email("a@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, "u1");

        let by_id = store.find_by_id("u1").await.unwrap();
        assert_eq!(by_id.unwrap().email, "a@example.com");

        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
        assert!(store.find_by_id("u2").await.unwrap().is_none());
    }
}
