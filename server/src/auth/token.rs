//! HS256 bearer tokens carrying the user id.
//!
//! Tokens carry `iat` but no `exp`: sessions do not expire, so verification
//! must not require an expiry claim.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
}

pub fn sign(user_id: &str, secret: &str) -> Result<String, AuthError> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Token(e.to_string()))
}

/// Verify a token's signature and return the user id it carries.
pub fn verify(token: &str, secret: &str) -> Result<String, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims = Default::default();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::Unauthenticated)?;
    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trip() {
        let token = sign("user-42", "secret").unwrap();
        assert_eq!(verify(&token, "secret").unwrap(), "user-42");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign("user-42", "secret").unwrap();
        assert!(matches!(
            verify(&token, "other-secret"),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify("not.a.token", "secret"),
            Err(AuthError::Unauthenticated)
        ));
    }
}
