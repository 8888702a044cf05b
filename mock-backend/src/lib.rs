//! In-memory REST backend serving the admin resources under `/api`.
//!
//! Every resource is a collection of JSON objects keyed by a sequential
//! numeric id that is also written into the resource's id field. When auth
//! is enabled, resource routes require a bearer token issued by
//! `/api/login`.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// (resource name, id field) pairs served by default.
pub const DEFAULT_RESOURCES: &[(&str, &str)] = &[
    ("clientes", "idcliente"),
    ("contactos", "idcontacto"),
    ("productos", "idproducto"),
    ("vendedores", "idvendedor"),
    ("ventas", "idventa"),
    ("pagos", "idpago"),
    ("seriales-erp", "idserial"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    pub user: String,
    pub password: String,
    pub require_auth: bool,
    pub resources: Vec<(String, String)>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            password: "admin".to_string(),
            require_auth: false,
            resources: DEFAULT_RESOURCES
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        }
    }
}

impl MockConfig {
    /// Optional: `MOCK_USER`, `MOCK_PASSWORD` (default `admin`/`admin`),
    /// `MOCK_REQUIRE_AUTH` (default `false`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Ok(user) = std::env::var("MOCK_USER") {
            cfg.user = user;
        }
        if let Ok(password) = std::env::var("MOCK_PASSWORD") {
            cfg.password = password;
        }
        if let Ok(raw) = std::env::var("MOCK_REQUIRE_AUTH") {
            cfg.require_auth = parse_bool("MOCK_REQUIRE_AUTH", &raw)?;
        }
        Ok(cfg)
    }

    pub fn with_auth(mut self) -> Self {
        self.require_auth = true;
        self
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw.to_string() }),
    }
}

#[derive(Debug)]
struct Collection {
    id_field: String,
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<MockConfig>,
    store: Arc<RwLock<HashMap<String, Collection>>>,
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    pub fn new(config: MockConfig) -> Self {
        let store = config
            .resources
            .iter()
            .map(|(name, id_field)| {
                let collection = Collection {
                    id_field: id_field.clone(),
                    next_id: 1,
                    rows: BTreeMap::new(),
                };
                (name.clone(), collection)
            })
            .collect();
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(RwLock::new(HashSet::new())),
        }
    }
}

#[derive(Deserialize)]
pub struct Credentials {
    pub usuario: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/{resource}", get(list_entities).post(create_entity))
        .route(
            "/api/{resource}/{id}",
            get(get_entity).put(update_entity).delete(delete_entity),
        )
        .with_state(AppState::new(config))
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn login(State(state): State<AppState>, Json(input): Json<Credentials>) -> Result<Json<TokenBody>, StatusCode> {
    if input.usuario != state.config.user || input.password != state.config.password {
        tracing::warn!(usuario = %input.usuario, "login rejected");
        return Err(StatusCode::UNAUTHORIZED);
    }
    // Issued tokens never expire; the set lives as long as the server.
    let token = Uuid::new_v4().to_string();
    state.tokens.write().await.insert(token.clone());
    tracing::info!(usuario = %input.usuario, "login accepted");
    Ok(Json(TokenBody { token }))
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    if !state.config.require_auth {
        return Ok(());
    }
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if state.tokens.read().await.contains(token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn list_entities(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, StatusCode> {
    authorize(&state, &headers).await?;
    let store = state.store.read().await;
    let collection = store.get(&resource).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(collection.rows.values().cloned().map(Value::Object).collect()))
}

async fn create_entity(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    authorize(&state, &headers).await?;
    let Value::Object(mut fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = state.store.write().await;
    let collection = store.get_mut(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let id = collection.next_id;
    collection.next_id += 1;
    fields.insert(collection.id_field.clone(), Value::from(id));
    collection.rows.insert(id, fields.clone());
    tracing::debug!(%resource, id, "created");
    Ok((StatusCode::CREATED, Json(Value::Object(fields))))
}

async fn get_entity(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers).await?;
    let store = state.store.read().await;
    let collection = store.get(&resource).ok_or(StatusCode::NOT_FOUND)?;
    collection
        .rows
        .get(&id)
        .cloned()
        .map(|row| Json(Value::Object(row)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_entity(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&state, &headers).await?;
    let Value::Object(fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = state.store.write().await;
    let collection = store.get_mut(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let id_field = collection.id_field.clone();
    let row = collection.rows.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in fields {
        if key != id_field {
            row.insert(key, value);
        }
    }
    tracing::debug!(%resource, id, "updated");
    Ok(Json(Value::Object(row.clone())))
}

async fn delete_entity(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers).await?;
    let mut store = state.store.write().await;
    let collection = store.get_mut(&resource).ok_or(StatusCode::NOT_FOUND)?;
    collection
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
