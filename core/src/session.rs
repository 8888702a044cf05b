//! Bearer-token session and the login call that fills it.

use crate::client::check_status;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{LoginRequest, LoginResponse};

pub const LOGIN_PATH: &str = "/api/login";

/// In-memory holder for the token obtained from `/api/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    /// Log in and keep the returned token.
    pub fn login<T: Transport>(
        &mut self,
        transport: &mut T,
        base_url: &str,
        credentials: &LoginRequest,
    ) -> Result<(), ApiError> {
        let request = build_login(base_url, credentials)?;
        let response = transport.execute(request)?;
        let login = parse_login(response)?;
        tracing::info!(usuario = %credentials.usuario, "logged in");
        self.token = Some(login.token);
        Ok(())
    }
}

pub fn build_login(base_url: &str, credentials: &LoginRequest) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(credentials).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        path: format!("{}{LOGIN_PATH}", base_url.trim_end_matches('/')),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

pub fn parse_login(response: HttpResponse) -> Result<LoginResponse, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
