//! Entities, drafts and resource descriptions.
//!
//! # Design
//! Entity shape belongs to the backend, so an `Entity` is an untyped JSON
//! object. The client only needs to know which field carries the identifier,
//! and that knowledge lives in a `ResourceDef`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Numeric entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Read an identifier from a JSON value. Numbers and numeric strings are
    /// accepted; `null`, empty strings and anything else mean "no id".
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(EntityId),
            Value::String(s) => s.trim().parse().ok().map(EntityId),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

/// A backend record. Only the identifier field is interpreted client-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub Map<String, Value>);

impl Entity {
    pub fn id(&self, id_field: &str) -> Option<EntityId> {
        self.0.get(id_field).and_then(EntityId::from_value)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Case-insensitive substring match over scalar fields, the way a table's
    /// global filter searches every visible column.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.0.values().any(|v| {
            let text = match v {
                Value::String(s) => s.to_lowercase(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return false,
            };
            text.contains(&needle)
        })
    }
}

impl TryFrom<Value> for Entity {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Entity(map)),
            other => Err(other),
        }
    }
}

/// Whether saving a draft creates a new entity or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit(EntityId),
}

/// Editable working copy of an entity backing a create/edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    id_field: String,
    fields: Map<String, Value>,
}

impl Draft {
    /// Empty draft with a `null` identifier.
    pub fn new(id_field: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(id_field.to_string(), Value::Null);
        Self {
            id_field: id_field.to_string(),
            fields,
        }
    }

    pub fn from_entity(id_field: &str, entity: &Entity) -> Self {
        Self {
            id_field: id_field.to_string(),
            fields: entity.0.clone(),
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.fields.get(&self.id_field).and_then(EntityId::from_value)
    }

    pub fn mode(&self) -> DraftMode {
        match self.id() {
            Some(id) => DraftMode::Edit(id),
            None => DraftMode::Create,
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Required fields that are absent, `null` or blank strings.
    pub fn missing_fields<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|field| match self.fields.get(*field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Static description of one backend REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    /// Singular label used in notifications.
    pub label: &'static str,
    pub path: &'static str,
    pub id_field: &'static str,
    pub required: &'static [&'static str],
}

pub const CLIENTES: ResourceDef = ResourceDef {
    label: "Cliente",
    path: "/api/clientes",
    id_field: "idcliente",
    required: &["nombres", "email"],
};

pub const CONTACTOS: ResourceDef = ResourceDef {
    label: "Contacto",
    path: "/api/contactos",
    id_field: "idcontacto",
    required: &["nombre", "telefono"],
};

pub const PRODUCTOS: ResourceDef = ResourceDef {
    label: "Producto",
    path: "/api/productos",
    id_field: "idproducto",
    required: &["nombre", "precio"],
};

pub const VENDEDORES: ResourceDef = ResourceDef {
    label: "Vendedor",
    path: "/api/vendedores",
    id_field: "idvendedor",
    required: &["nombre"],
};

pub const VENTAS: ResourceDef = ResourceDef {
    label: "Venta",
    path: "/api/ventas",
    id_field: "idventa",
    required: &["idcliente", "idproducto"],
};

pub const PAGOS: ResourceDef = ResourceDef {
    label: "Pago",
    path: "/api/pagos",
    id_field: "idpago",
    required: &["idventa", "monto"],
};

pub const SERIALES_ERP: ResourceDef = ResourceDef {
    label: "Serial ERP",
    path: "/api/seriales-erp",
    id_field: "idserial",
    required: &["serial"],
};

pub const CATALOG: &[ResourceDef] = &[CLIENTES, CONTACTOS, PRODUCTOS, VENDEDORES, VENTAS, PAGOS, SERIALES_ERP];

/// Look up a catalog resource by its path (`/api/clientes`).
pub fn resource_by_path(path: &str) -> Option<&'static ResourceDef> {
    CATALOG.iter().find(|r| r.path == path)
}

/// Credentials posted to `/api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub password: String,
}

/// Successful login response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
}

/// Outcome of one page operation, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Success(String),
    Failure(String),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            OperationResult::Success(m) | OperationResult::Failure(m) => m,
        }
    }
}
