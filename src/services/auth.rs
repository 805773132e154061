//! Authentication against the user backend

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    http::{ApiClient, RequestOptions},
    models::user::{LoginRequest, RegisterUser, TokenClaims, TokenResponse},
    session::Session,
};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Log in and keep the returned token in the session
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let options = RequestOptions::post("login", "/auth/login").body(&request)?;
        let response: Option<TokenResponse> = self.client.send_json(options).await?;
        let token = response
            .and_then(|r| r.token)
            .ok_or_else(|| AppError::Authentication("Login response does not contain a token".to_string()))?;

        self.session().set_token(&token)?;
        tracing::info!("User {} logged in", email);
        Ok(token)
    }

    /// Register a new user. The session is opened when the backend answers with a token.
    pub async fn register(&self, user: &RegisterUser) -> AppResult<Option<String>> {
        user.validate()?;

        let options = RequestOptions::post("register", "/auth/register").body(user)?;
        let response: Option<TokenResponse> = self.client.send_json(options).await?;
        let token = response.and_then(|r| r.token);

        match &token {
            Some(token) => {
                self.session().set_token(token)?;
                tracing::info!("User {} registered and logged in", user.email);
            }
            None => tracing::info!("User {} registered", user.email),
        }
        Ok(token)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.session().logout()
    }

    /// Claims of the stored token, when a valid one is present
    pub fn whoami(&self) -> Option<TokenClaims> {
        let token = self.session().token()?;
        TokenClaims::decode_unverified(&token)
            .ok()
            .filter(|claims| claims.is_valid_at(Utc::now().timestamp()))
    }
}
