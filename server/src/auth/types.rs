//! User records and credential error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ExternalError;

/// Errors that can occur in the credential service
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exist")]
    Conflict,

    // Same message for unknown email and wrong password so the response
    // never reveals which one failed.
    #[error("Email or password is not valid")]
    InvalidCredentials,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token signing failed: {0}")]
    Token(String),

    #[error(transparent)]
    External(#[from] ExternalError),
}

/// A stored user. The password hash never leaves the server: it is skipped
/// during serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}
