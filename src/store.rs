//! Storage-side view of Tell: tables, schemas and fields as the store enumerates them, plus the
//! transaction hooks the catalog layer consumes. The real transaction protocol lives outside
//! this crate; `memory` provides an in-process implementation.

pub mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};

pub type TableId = i64;
pub type TransactionId = i64;

/// Storage scalar kinds, in storage tag order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    NoType,
    NullType,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Blob,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::NoType,
        FieldType::NullType,
        FieldType::SmallInt,
        FieldType::Int,
        FieldType::BigInt,
        FieldType::Float,
        FieldType::Double,
        FieldType::Text,
        FieldType::Blob,
    ];

    /// Numeric tag as stored by Tell.
    pub fn tag(self) -> u16 {
        self as u16
    }

    pub fn from_tag(tag: u16) -> ConnectorResult<FieldType> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| ConnectorError::invalid_type("unknown_field_tag", format!("field type tag {} is outside the storage enumeration", tag)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::NoType => "NOTYPE",
            FieldType::NullType => "NULLTYPE",
            FieldType::SmallInt => "SMALLINT",
            FieldType::Int => "INT",
            FieldType::BigInt => "BIGINT",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Text => "TEXT",
            FieldType::Blob => "BLOB",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self { name: name.into(), field_type }
    }
}

/// Ordered field list of a table. Declaration order is the column order exposed to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self { Self { fields } }

    pub fn fields(&self) -> &[Field] { &self.fields }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub schema: Schema,
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self { id, name: name.into(), schema: Schema::new(fields) }
    }
}

/// A transaction context handed in by the caller for the duration of one request.
pub trait Transaction: Send + Sync {
    fn transaction_id(&self) -> TransactionId;

    /// Enumerate every table visible to this transaction. May block on the store.
    fn enumerate_tables(&self) -> ConnectorResult<Vec<Table>>;
}

/// Entry point to the store's transaction protocol.
pub trait TransactionManager: Send + Sync {
    fn start_transaction(&self) -> ConnectorResult<Arc<dyn Transaction>>;

    /// Re-attach to a running transaction by id; used when handles are rehydrated.
    fn resume_transaction(&self, id: TransactionId) -> ConnectorResult<Arc<dyn Transaction>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_declaration_order() {
        for (i, ft) in FieldType::ALL.iter().enumerate() {
            assert_eq!(ft.tag() as usize, i);
            assert_eq!(FieldType::from_tag(i as u16).unwrap(), *ft);
        }
    }

    #[test]
    fn tag_outside_enumeration_is_invalid_type() {
        let err = FieldType::from_tag(9).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidType { .. }));
        assert!(FieldType::from_tag(u16::MAX).is_err());
    }

    #[test]
    fn serde_names_match_as_str() {
        for ft in FieldType::ALL {
            let v = serde_json::to_value(ft).unwrap();
            assert_eq!(v, serde_json::Value::String(ft.as_str().to_string()));
        }
    }

    #[test]
    fn schema_lookup_by_name_keeps_order() {
        let schema = Schema::new(vec![
            Field::new("note", FieldType::Text),
            Field::new("id", FieldType::Int),
        ]);
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["note", "id"]);
        assert_eq!(schema.field_by_name("id").map(|f| f.field_type), Some(FieldType::Int));
        assert!(schema.field_by_name("ID").is_none());
    }
}
