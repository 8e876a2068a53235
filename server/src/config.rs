//! Server configuration
//!
//! Configuration is loaded from environment variables.

use std::env;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Secret for signing bearer tokens
    pub jwt_secret: String,
    /// Google OAuth2 credentials for the Sheets/Slides/Drive backends
    pub google: GoogleConfig,
    /// Drive folder that new presentations and uploads land in (optional)
    pub default_slides_folder_id: Option<String>,
    /// Fallback spreadsheet for range reads that omit an id (optional)
    pub default_sheet_id: Option<String>,
}

/// OAuth2 client credentials plus an offline refresh token.
#[derive(Debug, Clone, Default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl GoogleConfig {
    /// Whether all three credential parts are present.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.refresh_token.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8100,
            jwt_secret: "change-me".to_string(),
            google: GoogleConfig::default(),
            default_slides_folder_id: None,
            default_sheet_id: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(secret) = env::var("JWT_SECRET")
            && !secret.is_empty()
        {
            config.jwt_secret = secret;
        }

        if let Ok(id) = env::var("GOOGLE_OAUTH_CLIENT_ID") {
            config.google.client_id = id;
        }
        if let Ok(secret) = env::var("GOOGLE_OAUTH_CLIENT_SECRET") {
            config.google.client_secret = secret;
        }
        if let Ok(token) = env::var("GOOGLE_OAUTH_REFRESH_TOKEN") {
            config.google.refresh_token = token;
        }

        if let Ok(id) = env::var("DEFAULT_SLIDES_FOLDER_ID")
            && !id.is_empty()
        {
            config.default_slides_folder_id = Some(id);
        }
        if let Ok(id) = env::var("DEFAULT_SHEET_ID")
            && !id.is_empty()
        {
            config.default_sheet_id = Some(id);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8100);
        assert!(config.default_slides_folder_id.is_none());
        assert!(!config.google.is_complete());
    }

    #[test]
    fn test_google_config_completeness() {
        let google = GoogleConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            refresh_token: "refresh".into(),
        };
        assert!(google.is_complete());
    }
}
