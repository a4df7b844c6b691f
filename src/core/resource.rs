//! Owned resources and the saved query model

use crate::core::field::{FieldKind, FieldValue};
use crate::core::predicate::{
    EQUALITY_OPERATORS, FieldCapability, ORDERED_OPERATORS, ResourceDescriptor, TEXT_OPERATORS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the user that owns a resource
///
/// Stored as its string form; the owner of a resource never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A resource that is visible to and mutable by a single owner.
///
/// Implementors describe their sortable/filterable columns statically and
/// expose column values by name so stores can evaluate predicates generically.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Static capability table for this resource type
    fn descriptor() -> &'static ResourceDescriptor;

    /// Identity of the row
    fn id(&self) -> i64;

    /// Owner of the row
    fn owner(&self) -> &OwnerId;

    /// Get the value of a column by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// A named query saved by a user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: i64,
    pub user_id: OwnerId,
    pub name: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Capability table for [`SavedQuery`]
pub static SAVED_QUERY_DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    table: "saved_queries",
    owner_column: "user_id",
    key_column: "id",
    fields: &[
        FieldCapability {
            name: "id",
            kind: FieldKind::Integer,
            operators: ORDERED_OPERATORS,
            sortable: true,
        },
        FieldCapability {
            name: "user_id",
            kind: FieldKind::Text,
            operators: EQUALITY_OPERATORS,
            sortable: true,
        },
        FieldCapability {
            name: "name",
            kind: FieldKind::Text,
            operators: TEXT_OPERATORS,
            sortable: true,
        },
        FieldCapability {
            name: "query",
            kind: FieldKind::Text,
            operators: TEXT_OPERATORS,
            sortable: true,
        },
        FieldCapability {
            name: "created_at",
            kind: FieldKind::Timestamp,
            operators: ORDERED_OPERATORS,
            sortable: true,
        },
        FieldCapability {
            name: "updated_at",
            kind: FieldKind::Timestamp,
            operators: ORDERED_OPERATORS,
            sortable: true,
        },
    ],
};

impl Resource for SavedQuery {
    fn descriptor() -> &'static ResourceDescriptor {
        &SAVED_QUERY_DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.user_id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "user_id" => Some(FieldValue::String(self.user_id.to_string())),
            "name" => Some(FieldValue::String(self.name.clone())),
            "query" => Some(FieldValue::String(self.query.clone())),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            "updated_at" => Some(FieldValue::DateTime(self.updated_at)),
            _ => None,
        }
    }
}
