//! User credentials and token claims

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role granted to administrators by the user backend
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Login request
#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterUser {
    /// Institutional code
    pub code: i64,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Answer of the login and register endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    pub message: Option<String>,
}

/// Claims read from the bearer token issued by the user backend.
///
/// Only the fields the client acts on are decoded; the signature is
/// verified by the backends on every call, never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Decode the claims of a JWT without checking its signature
    pub fn decode_unverified(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(token_data.claims)
    }

    /// True if the token carries an `exp` later than `now` (seconds since epoch)
    pub fn is_valid_at(&self, now: i64) -> bool {
        matches!(self.exp, Some(exp) if exp > now)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .as_ref()
            .map(|roles| roles.iter().any(|r| r == role))
            .unwrap_or(false)
    }
}
