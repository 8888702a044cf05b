//! Synchronous REST resource client and CRUD page state.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits
//! `CrudPage`, which keeps one resource's list, draft and notifications and
//! drives create/edit/delete through a host-supplied `Transport`.
//!
//! # Design
//! - `ResourceClient` holds only a base URL, a path and an optional token.
//! - Entities are untyped JSON objects; a `ResourceDef` names the id field
//!   and the fields a draft must fill before it is sent.
//! - Page operations report through `ToastQueue` and `OperationResult`
//!   instead of propagating errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod page;
pub mod session;
pub mod types;

pub use client::ResourceClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use notify::{Severity, Toast, ToastQueue};
pub use page::{CrudPage, PageStatus};
pub use session::Session;
pub use types::{Draft, DraftMode, Entity, EntityId, LoginRequest, LoginResponse, OperationResult, ResourceDef};
