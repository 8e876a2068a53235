//! sheetdeck Server Library
//!
//! This module exports the server components for use in integration tests
//! and external tooling.

pub mod auth;
pub mod config;
pub mod deck;
pub mod error;
pub mod google;
pub mod sheet;

// Re-export commonly used types
pub use auth::{AuthAppState, CredentialService, MemoryUserStore, UserStore, auth_routes};
pub use deck::{AssetService, BatchOp, DeckAppState, DeckService, Placement, SlideSpec, deck_routes};
pub use error::{ExternalError, advisory};
pub use sheet::{Grid, Row, SheetAppState, SheetService, sheet_routes};
