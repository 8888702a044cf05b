//! Stateless HTTP request builder and response parser for one REST resource.
//!
//! # Design
//! `ResourceClient` holds a base URL, a resource path and an optional bearer
//! token. `request` turns a (method, payload, id) triple into exactly one
//! `HttpRequest` against `{base_url}{path}[/{id}]`; `parse` turns the
//! matching `HttpResponse` back into the raw JSON body. The caller executes
//! the round-trip in between. Nothing is retried or cached.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Entity, EntityId};

/// Synchronous, stateless client for one REST resource such as `/api/clientes`.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The only state is the optional bearer token, which
/// is attached to every request built after it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceClient {
    base_url: String,
    path: String,
    token: Option<String>,
}

impl ResourceClient {
    pub fn new(base_url: &str, path: &str) -> Self {
        let path = path.trim_end_matches('/');
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn url(&self, id: Option<EntityId>) -> String {
        match id {
            Some(id) => format!("{}{}/{id}", self.base_url, self.path),
            None => format!("{}{}", self.base_url, self.path),
        }
    }

    /// Build the single request for `method`.
    ///
    /// `payload` is required for POST/PUT and ignored otherwise; `id` is
    /// required for PUT/DELETE and optional for GET.
    pub fn request(
        &self,
        method: HttpMethod,
        payload: Option<&Value>,
        id: Option<EntityId>,
    ) -> Result<HttpRequest, ApiError> {
        if method.requires_id() && id.is_none() {
            return Err(ApiError::MissingId(method));
        }
        let id = if method == HttpMethod::Post { None } else { id };

        let body = if method.requires_payload() {
            let payload = payload.ok_or(ApiError::MissingPayload(method))?;
            let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
            Some(body)
        } else {
            None
        };

        let request = self.assemble(method, id, body);
        tracing::debug!(method = %request.method, path = %request.path, "built request");
        Ok(request)
    }

    pub fn build_list(&self) -> HttpRequest {
        self.assemble(HttpMethod::Get, None, None)
    }

    pub fn build_get(&self, id: EntityId) -> HttpRequest {
        self.assemble(HttpMethod::Get, Some(id), None)
    }

    pub fn build_create<T: Serialize>(&self, input: &T) -> Result<HttpRequest, ApiError> {
        let payload = to_payload(input)?;
        self.request(HttpMethod::Post, Some(&payload), None)
    }

    pub fn build_update<T: Serialize>(&self, id: EntityId, input: &T) -> Result<HttpRequest, ApiError> {
        let payload = to_payload(input)?;
        self.request(HttpMethod::Put, Some(&payload), Some(id))
    }

    pub fn build_delete(&self, id: EntityId) -> HttpRequest {
        self.assemble(HttpMethod::Delete, Some(id), None)
    }

    /// Raw JSON body of a 2xx response; an empty body reads as `null`.
    pub fn parse(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Entity>, ApiError> {
        match self.parse(response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    Entity::try_from(item)
                        .map_err(|v| ApiError::DeserializationError(format!("expected object, got {v}")))
                })
                .collect(),
            other => Err(ApiError::DeserializationError(format!("expected array, got {other}"))),
        }
    }

    pub fn parse_entity(&self, response: HttpResponse) -> Result<Entity, ApiError> {
        let value = self.parse(response)?;
        Entity::try_from(value).map_err(|v| ApiError::DeserializationError(format!("expected object, got {v}")))
    }

    /// JSON content type when there is a body, then the bearer header.
    fn assemble(&self, method: HttpMethod, id: Option<EntityId>, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: self.url(id),
            headers,
            body,
        }
    }
}

fn to_payload<T: Serialize>(input: &T) -> Result<Value, ApiError> {
    serde_json::to_value(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        401 | 403 => Err(ApiError::Unauthorized { status: response.status }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
