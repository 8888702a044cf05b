//! List/form page state for one resource.
//!
//! # Design
//! `CrudPage` owns the loaded entities, at most one open `Draft`, a pending
//! delete confirmation and its own `ToastQueue`. Every operation goes
//! through the page's `ResourceClient` and a caller-supplied `Transport`,
//! and never returns an error: failures become a toast plus an
//! `OperationResult::Failure`. Validation failures never reach the
//! transport.
//!
//! Status transitions: `Idle -> Loading -> {Idle, Error}` for loads. The
//! dialog stays open on validation or backend failure and closes only on a
//! successful save or an explicit `close_dialog`.

use serde_json::Value;

use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::notify::{Severity, ToastQueue};
use crate::session::Session;
use crate::types::{Draft, DraftMode, Entity, EntityId, OperationResult, ResourceDef};

pub const DEFAULT_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug)]
pub struct CrudPage {
    resource: ResourceDef,
    client: ResourceClient,
    entities: Vec<Entity>,
    status: PageStatus,
    draft: Option<Draft>,
    pending_delete: Option<EntityId>,
    toasts: ToastQueue,
    first: usize,
    rows: usize,
    filter: String,
    login_route: String,
    redirect: Option<String>,
}

impl CrudPage {
    pub fn new(resource: ResourceDef, config: &ClientConfig, session: &Session) -> Self {
        let client = ResourceClient::new(&config.api_base_url, resource.path)
            .with_token(session.token().map(str::to_string));
        Self {
            resource,
            client,
            entities: Vec::new(),
            status: PageStatus::Idle,
            draft: None,
            pending_delete: None,
            toasts: ToastQueue::new(config.toast_life),
            first: 0,
            rows: DEFAULT_ROWS,
            filter: String::new(),
            login_route: config.login_route.clone(),
            redirect: None,
        }
    }

    pub fn resource(&self) -> &ResourceDef {
        &self.resource
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id(self.resource.id_field) == Some(id))
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Route the host should navigate to after an authentication failure.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.client.set_token(token);
        self.redirect = None;
    }

    // --- collection ---------------------------------------------------------

    /// Fetch the whole collection and replace the local list.
    pub fn load<T: Transport>(&mut self, transport: &mut T) -> OperationResult {
        self.status = PageStatus::Loading;
        let request = self.client.build_list();
        let result = transport
            .execute(request)
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_list(response));

        match result {
            Ok(entities) => {
                tracing::debug!(resource = self.resource.path, count = entities.len(), "loaded");
                self.entities = entities;
                self.clamp_page();
                self.status = PageStatus::Idle;
                OperationResult::Success(format!("{} registros", self.entities.len()))
            }
            Err(err) => {
                let message = err.to_string();
                self.status = PageStatus::Error(message.clone());
                self.report_failure(&err);
                OperationResult::Failure(message)
            }
        }
    }

    // --- dialog -------------------------------------------------------------

    pub fn open_new(&mut self) {
        self.draft = Some(Draft::new(self.resource.id_field));
    }

    /// Open an edit dialog on a copy of the loaded entity. Returns `false`
    /// when no such row is loaded.
    pub fn open_edit(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.find(id) else {
            return false;
        };
        self.draft = Some(Draft::from_entity(self.resource.id_field, entity));
        true
    }

    pub fn close_dialog(&mut self) {
        self.draft = None;
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn dialog_mode(&self) -> Option<DraftMode> {
        self.draft.as_ref().map(Draft::mode)
    }

    /// Set a field on the open draft; ignored when no dialog is open.
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.set(field, value);
        }
    }

    /// Validate and persist the open draft, then refresh the list.
    pub fn save<T: Transport>(&mut self, transport: &mut T) -> OperationResult {
        let Some(draft) = self.draft.as_ref() else {
            return OperationResult::Failure("no hay un registro abierto".to_string());
        };

        let missing = draft.missing_fields(self.resource.required);
        if !missing.is_empty() {
            let detail = format!("Campos requeridos: {}", missing.join(", "));
            self.toasts.show(Severity::Warn, "Advertencia", &detail);
            return OperationResult::Failure(detail);
        }

        let mode = draft.mode();
        let payload = draft.to_value();
        let request = match mode {
            DraftMode::Create => self.client.request(HttpMethod::Post, Some(&payload), None),
            DraftMode::Edit(id) => self.client.request(HttpMethod::Put, Some(&payload), Some(id)),
        };

        if let Err(err) = request.and_then(|req| self.send(transport, req)) {
            self.report_failure(&err);
            return OperationResult::Failure(err.to_string());
        }

        let detail = match mode {
            DraftMode::Create => format!("{} creado", self.resource.label),
            DraftMode::Edit(id) => format!("{} {id} actualizado", self.resource.label),
        };
        tracing::info!(resource = self.resource.path, ?mode, "saved");
        self.toasts.show(Severity::Success, "Exitoso", &detail);
        self.draft = None;
        self.load(transport);
        OperationResult::Success(detail)
    }

    // --- delete -------------------------------------------------------------

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: EntityId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the entity awaiting confirmation and drop its row locally.
    pub fn confirm_delete<T: Transport>(&mut self, transport: &mut T) -> OperationResult {
        let Some(id) = self.pending_delete.take() else {
            return OperationResult::Failure("no hay eliminación pendiente".to_string());
        };

        let request = self.client.build_delete(id);
        if let Err(err) = self.send(transport, request) {
            self.report_failure(&err);
            return OperationResult::Failure(err.to_string());
        }

        let id_field = self.resource.id_field;
        self.entities.retain(|e| e.id(id_field) != Some(id));
        self.clamp_page();
        let detail = format!("{} {id} eliminado", self.resource.label);
        tracing::info!(resource = self.resource.path, %id, "deleted");
        self.toasts.show(Severity::Success, "Exitoso", &detail);
        OperationResult::Success(detail)
    }

    // --- table view ---------------------------------------------------------

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.first = 0;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Paginator change: `first` is the index of the first row shown.
    pub fn set_page(&mut self, first: usize, rows: usize) {
        self.rows = rows.max(1);
        self.first = first - first % self.rows;
        self.clamp_page();
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows matching the global filter.
    pub fn total_records(&self) -> usize {
        self.filtered().count()
    }

    /// Rows on the current page after filtering.
    pub fn visible(&self) -> Vec<&Entity> {
        self.filtered().skip(self.first).take(self.rows).collect()
    }

    fn filtered(&self) -> impl Iterator<Item = &Entity> {
        let filter = self.filter.as_str();
        self.entities.iter().filter(move |e| e.matches_filter(filter))
    }

    fn clamp_page(&mut self) {
        let total = self.total_records();
        if self.first >= total {
            self.first = total.saturating_sub(1) / self.rows * self.rows;
        }
    }

    // --- plumbing -----------------------------------------------------------

    fn send<T: Transport>(&self, transport: &mut T, request: HttpRequest) -> Result<Value, ApiError> {
        let response = transport.execute(request)?;
        self.client.parse(response)
    }

    fn report_failure(&mut self, err: &ApiError) {
        if err.is_auth_failure() {
            tracing::warn!(resource = self.resource.path, "session rejected, redirecting to login");
            self.client.set_token(None);
            self.redirect = Some(self.login_route.clone());
            self.toasts.show(Severity::Error, "Sesión expirada", "Inicie sesión nuevamente");
            return;
        }
        tracing::warn!(resource = self.resource.path, error = %err, "operation failed");
        self.toasts.show(Severity::Error, "Error", &err.to_string());
    }
}
