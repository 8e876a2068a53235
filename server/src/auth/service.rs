//! Registration, login, and request authentication.

use std::sync::Arc;

use super::password::{hash_password, verify_password};
use super::store::UserStore;
use super::token;
use super::types::{AuthError, UserRecord};

pub struct CredentialService {
    store: Arc<dyn UserStore>,
    jwt_secret: String,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Create a new user. Fails with `Conflict` when the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        let created = self.store.create(record).await?;
        tracing::info!("registered user {}", created.id);
        Ok(created)
    }

    /// Check credentials and issue a signed token carrying the user id.
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserRecord, String), AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = token::sign(&user.id, &self.jwt_secret)?;
        Ok((user, token))
    }

    /// Resolve a `Bearer` authorization header to the user it belongs to.
    ///
    /// Missing header, malformed header, bad signature, and vanished user all
    /// collapse into `Unauthenticated`.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<UserRecord, AuthError> {
        let header = authorization.ok_or(AuthError::Unauthenticated)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::Unauthenticated)?;

        let user_id = token::verify(token, &self.jwt_secret)?;
        self.store
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
