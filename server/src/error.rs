//! Shared error types for the Google backends and advisory side calls.

use std::future::Future;

use thiserror::Error;

/// Failure reported by one of the external Google services.
///
/// The variants mirror the upstream HTTP status / error body and exist for
/// user-facing messaging only; control flow never branches on them except for
/// `GridTooSmall`, which drives the single resize-and-retry in the tabular
/// export pipeline.
#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("{context}: not found: {message}")]
    NotFound { context: &'static str, message: String },

    #[error("{context}: permission denied: {message}")]
    PermissionDenied { context: &'static str, message: String },

    #[error("{context}: quota exceeded: {message}")]
    QuotaExceeded { context: &'static str, message: String },

    #[error("{context}: exceeds grid limits: {message}")]
    GridTooSmall { context: &'static str, message: String },

    #[error("{context}: {message}")]
    Api { context: &'static str, message: String },

    #[error("{context}: transport error: {message}")]
    Transport { context: &'static str, message: String },
}

impl ExternalError {
    /// Classify a non-success response from a Google API by status and body.
    pub fn classify(context: &'static str, status: u16, body: &str) -> Self {
        let message = body.trim().to_string();
        if body.contains("exceeds grid limits") {
            return Self::GridTooSmall { context, message };
        }
        match status {
            404 => Self::NotFound { context, message },
            401 | 403 => Self::PermissionDenied { context, message },
            429 => Self::QuotaExceeded { context, message },
            _ if body.to_ascii_lowercase().contains("quota") => {
                Self::QuotaExceeded { context, message }
            }
            _ => Self::Api { context, message },
        }
    }

    pub fn transport(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            context,
            message: err.to_string(),
        }
    }

    /// Stable machine-readable code for the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::GridTooSmall { .. } => "grid_too_small",
            Self::Api { .. } => "api_error",
            Self::Transport { .. } => "transport_error",
        }
    }

    pub fn is_grid_too_small(&self) -> bool {
        matches!(self, Self::GridTooSmall { .. })
    }
}

/// Run an advisory operation: a side call whose failure must never interrupt
/// the primary result (folder moves, header formatting, asset cleanup).
///
/// Failures are logged at warn and swallowed; the success value, if any, is
/// returned to the caller.
pub async fn advisory<T, E, F>(name: &str, fut: F) -> Option<T>
where
    E: std::fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("advisory operation '{}' failed: {}", name, e);
            None
        }
    }
}
