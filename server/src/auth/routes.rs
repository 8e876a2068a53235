//! HTTP route handlers for the auth API

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::CredentialService;
use super::types::{AuthError, UserRecord};

/// Application state containing the credential service
#[derive(Clone)]
pub struct AuthAppState {
    pub credentials: Arc<CredentialService>,
}

/// Error response for the auth API
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<AuthError> for AuthErrorResponse {
    fn from(e: AuthError) -> Self {
        let code = match &e {
            AuthError::Validation(_) => "validation",
            AuthError::Conflict => "conflict",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Hash(_) | AuthError::Token(_) => "internal_error",
            AuthError::External(inner) => inner.code(),
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "validation" | "conflict" | "invalid_credentials" => StatusCode::BAD_REQUEST,
            "unauthenticated" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub new_user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserRecord,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserRecord,
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn is_allowed_password_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!@#$%^&*()_+[]{};':\"\\|,.<>/?`~=-".contains(c)
}

fn validate_register(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.name.is_empty() {
        return Err(AuthError::Validation("Name is required.".into()));
    }
    if req.email.is_empty() {
        return Err(AuthError::Validation("Email is required.".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AuthError::Validation("Email must be valid.".into()));
    }
    if req.password.is_empty() {
        return Err(AuthError::Validation("Password is required.".into()));
    }
    if req.password.len() < 6 || req.password.len() > 20 {
        return Err(AuthError::Validation(
            "Password should have length between 6 to 20 characters.".into(),
        ));
    }
    if !req.password.chars().all(is_allowed_password_char) {
        return Err(AuthError::Validation(
            "Password contains invalid characters.".into(),
        ));
    }
    if req.confirm_password.is_empty() {
        return Err(AuthError::Validation("Confirm password is required.".into()));
    }
    if req.confirm_password != req.password {
        return Err(AuthError::Validation("password does not match.".into()));
    }
    Ok(())
}

fn validate_login(req: &LoginRequest) -> Result<(), AuthError> {
    if req.email.is_empty() {
        return Err(AuthError::Validation("email is required.".into()));
    }
    if req.password.is_empty() {
        return Err(AuthError::Validation("Password is required.".into()));
    }
    Ok(())
}

fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()
}

/// POST /auth/register
pub async fn register(
    State(state): State<AuthAppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthErrorResponse> {
    validate_register(&req)?;

    let new_user = state
        .credentials
        .register(&req.name, &req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!("registration failed for {}: {}", req.email, e);
            e
        })?;

    Ok(Json(RegisterResponse {
        message: "Register success".into(),
        new_user,
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AuthAppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthErrorResponse> {
    validate_login(&req)?;

    let (user, token) = state.credentials.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        message: "Login success".into(),
        user,
        token,
    }))
}

/// GET /auth/getme
pub async fn get_me(
    State(state): State<AuthAppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AuthErrorResponse> {
    let user = state
        .credentials
        .authenticate(bearer_header(&headers))
        .await?;
    Ok(Json(MeResponse { user }))
}

/// Build auth API routes
pub fn auth_routes(state: AuthAppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/getme", get(get_me))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> RegisterRequest {
        RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "password1".into(),
            confirm_password: "password1".into(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(validate_register(&base_request()).is_ok());
    }

    #[test]
    fn rejects_missing_name() {
        let mut req = base_request();
        req.name.clear();
        let err = validate_register(&req).unwrap_err();
        assert_eq!(err.to_string(), "Name is required.");
    }

    #[test]
    fn rejects_bad_email() {
        let mut req = base_request();
        req.email = "not-an-email".into();
        assert!(validate_register(&req).is_err());
    }

    #[test]
    fn rejects_out_of_range_password() {
        let mut req = base_request();
        req.password = "short".into();
        req.confirm_password = "short".into();
        let err = validate_register(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password should have length between 6 to 20 characters."
        );
    }

    #[test]
    fn rejects_password_with_forbidden_characters() {
        let mut req = base_request();
        req.password = "pass word1".into();
        req.confirm_password = "pass word1".into();
        let err = validate_register(&req).unwrap_err();
        assert_eq!(err.to_string(), "Password contains invalid characters.");
    }

    #[test]
    fn rejects_confirm_mismatch() {
        let mut req = base_request();
        req.confirm_password = "password2".into();
        let err = validate_register(&req).unwrap_err();
        assert_eq!(err.to_string(), "password does not match.");
    }

    #[test]
    fn email_validation_cases() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a b@c.co"));
    }
}
