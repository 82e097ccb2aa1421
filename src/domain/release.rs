//! Release entity, its identifier, and the client-supplied payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Release identifier. Server-generated on create; never rewritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(pub String);

impl ReleaseId {
    /// Create a ReleaseId from a string.
    pub fn new(id: String) -> Self {
        ReleaseId(id)
    }

    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        ReleaseId(Uuid::new_v4().to_string())
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single body field as it will be bound to SQLite.
///
/// No type is enforced: scalars keep their JSON kind, arrays and objects
/// are bound as their JSON text, and the column affinity decides the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<Option<&Value>> for FieldValue {
    fn from(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Null,
            Some(Value::Bool(b)) => FieldValue::Integer(i64::from(*b)),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(other) => FieldValue::Text(other.to_string()),
        }
    }
}

/// Body of a create or update request.
///
/// Holds the five mutable fields ready for binding, plus the body exactly as
/// the client sent it. Fields missing from the body bind as NULL; unknown
/// keys, including `id`, are never written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePayload {
    pub title: FieldValue,
    pub description: FieldValue,
    pub release_date: FieldValue,
    pub platforms: FieldValue,
    pub status: FieldValue,
    raw: Value,
}

impl ReleasePayload {
    /// Build a payload from a parsed JSON body. Non-object bodies carry no fields.
    pub fn from_json(raw: Value) -> Self {
        let field = |name: &str| FieldValue::from(raw.as_object().and_then(|m| m.get(name)));
        ReleasePayload {
            title: field("title"),
            description: field("description"),
            release_date: field("releaseDate"),
            platforms: field("platforms"),
            status: field("status"),
            raw,
        }
    }

    /// The five mutable fields in column order.
    pub fn fields(&self) -> [&FieldValue; 5] {
        [
            &self.title,
            &self.description,
            &self.release_date,
            &self.platforms,
            &self.status,
        ]
    }

    /// The body as submitted.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// A stored release row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: ReleaseId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub platforms: Option<String>,
    pub status: Option<String>,
}
