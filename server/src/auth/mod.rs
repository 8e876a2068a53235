//! Credential service: registration, login, and bearer-token authentication
//!
//! This module provides:
//! - `UserStore` trait abstracting the user-record backend
//! - `MemoryUserStore` concurrent in-process implementation
//! - `CredentialService` for hashing, comparison, and token issuance
//! - HTTP routes for `/auth/*`

mod password;
pub mod routes;
mod service;
mod store;
mod token;
mod types;

pub use routes::{AuthAppState, auth_routes};
pub use service::CredentialService;
pub use store::{MemoryUserStore, UserStore};
pub use types::{AuthError, UserRecord};
