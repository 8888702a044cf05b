//! Error types for the resource client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because pages react to
//! them differently: a missing row is just reported, an auth failure sends the
//! user back to the login route. Every other non-2xx response lands in
//! `HttpError` with the raw status and body.

use thiserror::Error;

use crate::http::{HttpMethod, TransportError};

/// Errors returned by `ResourceClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401 or 403: token missing, expired or rejected.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The server returned a non-2xx status other than 404/401/403.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `post`/`put` called without a payload.
    #[error("{0} requires a payload")]
    MissingPayload(HttpMethod),

    /// `put`/`delete` called without an entity id.
    #[error("{0} requires an entity id")]
    MissingId(HttpMethod),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}
