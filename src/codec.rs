//! Wire form of Tell handles.
//!
//! Column handles:
//!   {"typeName":"primary"}
//!   {"typeName":"column","fieldString":"<base64 of {"name":..,"type":..}>"}
//! Table handles carry ids only (`{"tableId":..,"transactionId":..}`) and are rehydrated against
//! the catalog on arrival; layouts wrap a table handle and the untouched predicate summary.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::catalog::CatalogCache;
use crate::error::{ConnectorError, ConnectorResult};
use crate::handle::{ColumnHandle, TableHandle, TableLayoutHandle};
use crate::spi::PredicateSummary;
use crate::store::{Field, TransactionManager};

pub const TYPE_NAME: &str = "typeName";
pub const FIELD_STRING: &str = "fieldString";
pub const PRIMARY: &str = "primary";
pub const COLUMN: &str = "column";

const TABLE_ID: &str = "tableId";
const TRANSACTION_ID: &str = "transactionId";
const TABLE: &str = "table";
const DOMAIN: &str = "domain";

/// Serialized form of a field: a self-describing JSON object, as bytes.
pub fn encode_field(field: &Field) -> Vec<u8> {
    json!({ "name": field.name, "type": field.field_type.as_str() }).to_string().into_bytes()
}

pub fn decode_field(bytes: &[u8]) -> ConnectorResult<Field> {
    serde_json::from_slice::<Field>(bytes).map_err(|e| ConnectorError::decode("bad_field", format!("cannot decode field: {}", e)))
}

pub fn encode_column_handle(handle: &ColumnHandle) -> Value {
    let mut obj = Map::new();
    obj.insert(TYPE_NAME.into(), Value::String(handle.type_name().into()));
    if let ColumnHandle::Column(field) = handle {
        obj.insert(FIELD_STRING.into(), Value::String(STANDARD.encode(encode_field(field))));
    }
    Value::Object(obj)
}

pub fn decode_column_handle(value: &Value) -> ConnectorResult<ColumnHandle> {
    let type_name = value
        .get(TYPE_NAME)
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectorError::decode("missing_type_name", format!("column handle has no string {}", TYPE_NAME)))?;
    match type_name {
        PRIMARY => Ok(ColumnHandle::PrimaryKey),
        COLUMN => {
            let encoded = value
                .get(FIELD_STRING)
                .and_then(Value::as_str)
                .ok_or_else(|| ConnectorError::decode("missing_field_string", format!("column handle has no string {}", FIELD_STRING)))?;
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|e| ConnectorError::decode("bad_field_string", format!("{} is not base64: {}", FIELD_STRING, e)))?;
            Ok(ColumnHandle::Column(decode_field(&bytes)?))
        }
        other => {
            debug!(target: "tell::codec", "rejecting column handle with typeName '{}'", other);
            Err(ConnectorError::decode("unknown_type_name", format!("unknown column handle type '{}'", other)))
        }
    }
}

pub fn column_handle_to_json(handle: &ColumnHandle) -> String { encode_column_handle(handle).to_string() }

pub fn column_handle_from_json(text: &str) -> ConnectorResult<ColumnHandle> {
    let value: Value = serde_json::from_str(text).map_err(|e| ConnectorError::decode("bad_json", format!("column handle is not JSON: {}", e)))?;
    decode_column_handle(&value)
}

impl Serialize for ColumnHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_column_handle(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ColumnHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_column_handle(&value).map_err(D::Error::custom)
    }
}

pub fn encode_table_handle(handle: &TableHandle) -> Value {
    let mut obj = Map::new();
    obj.insert(TABLE_ID.into(), Value::from(handle.table_id()));
    obj.insert(TRANSACTION_ID.into(), Value::from(handle.transaction_id()));
    Value::Object(obj)
}

fn id_field(value: &Value, key: &str) -> ConnectorResult<i64> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ConnectorError::decode("missing_id", format!("table handle has no integer {}", key)))
}

/// Rehydrate a table handle: resume its transaction and look the table up by id.
pub fn decode_table_handle(value: &Value, manager: &dyn TransactionManager, cache: &CatalogCache) -> ConnectorResult<TableHandle> {
    let table_id = id_field(value, TABLE_ID)?;
    let transaction_id = id_field(value, TRANSACTION_ID)?;
    TableHandle::resolve(table_id, transaction_id, manager, cache)
}

pub fn encode_layout_handle(handle: &TableLayoutHandle) -> Value {
    let mut obj = Map::new();
    obj.insert(TABLE.into(), encode_table_handle(handle.table()));
    obj.insert(DOMAIN.into(), handle.summary().value().clone());
    Value::Object(obj)
}

pub fn decode_layout_handle(value: &Value, manager: &dyn TransactionManager, cache: &CatalogCache) -> ConnectorResult<TableLayoutHandle> {
    let table = value
        .get(TABLE)
        .ok_or_else(|| ConnectorError::decode("missing_table", "layout handle has no table"))?;
    let domain = value
        .get(DOMAIN)
        .ok_or_else(|| ConnectorError::decode("missing_domain", "layout handle has no domain"))?;
    let summary = PredicateSummary::new(domain.clone());
    Ok(TableLayoutHandle::new(decode_table_handle(table, manager, cache)?, summary))
}
