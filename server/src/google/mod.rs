//! Google REST backends
//!
//! Thin `reqwest`-based clients for the Sheets, Slides, and Drive APIs,
//! implementing the `SheetService`, `DeckService`, and `AssetService` traits.
//! All three share one OAuth2 `TokenProvider` built from the configured
//! client id / secret / refresh token.

mod drive;
mod sheets;
mod slides;
mod token;

pub use drive::GoogleDrive;
pub use sheets::GoogleSheets;
pub use slides::GoogleSlides;
pub use token::TokenProvider;
