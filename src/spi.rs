//! Engine-facing catalog abstraction.
//!
//! The engine only sees connector handles as opaque trait objects; a connector recognizes its
//! own handles by downcasting through [`ConnectorTableHandle::as_any`] and friends. Everything
//! else here is plain catalog vocabulary (qualified names, column metadata, layouts).

use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConnectorResult;
use crate::types::EngineType;

pub trait ConnectorTableHandle: Any + Debug + Send + Sync {
    fn connector_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

pub trait ConnectorColumnHandle: Any + Debug + Send + Sync {
    fn connector_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

pub trait ConnectorTableLayoutHandle: Any + Debug + Send + Sync {
    fn connector_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaTableName {
    pub schema_name: String,
    pub table_name: String,
}

impl SchemaTableName {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self { schema_name: schema.into(), table_name: table.into() }
    }
}

impl Display for SchemaTableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema_name, self.table_name)
    }
}

/// Filter used by multi-table column listing. Missing parts match everything; the table part
/// is a literal, case-sensitive name prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaTablePrefix {
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
}

impl SchemaTablePrefix {
    pub fn all() -> Self { Self::default() }
    pub fn schema(schema: impl Into<String>) -> Self { Self { schema_name: Some(schema.into()), table_name: None } }
    pub fn new(schema: impl Into<String>, table_prefix: impl Into<String>) -> Self {
        Self { schema_name: Some(schema.into()), table_name: Some(table_prefix.into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: EngineType,
    pub hidden: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, column_type: EngineType, hidden: bool) -> Self {
        Self { name: name.into(), column_type, hidden }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorTableMetadata {
    pub table: SchemaTableName,
    pub columns: Vec<ColumnMetadata>,
}

/// Engine-side summary of a scan predicate. The connector never interprets it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateSummary(serde_json::Value);

impl PredicateSummary {
    pub fn new(value: serde_json::Value) -> Self { Self(value) }
    pub fn value(&self) -> &serde_json::Value { &self.0 }
}

#[derive(Clone, Debug)]
pub struct TableLayout {
    pub handle: Arc<dyn ConnectorTableLayoutHandle>,
    /// Columns the layout was requested for; never used to prune the scan.
    pub columns: Option<Vec<Arc<dyn ConnectorColumnHandle>>>,
}

#[derive(Clone, Debug)]
pub struct TableLayoutResult {
    pub layout: TableLayout,
    /// Part of the predicate the engine still has to apply itself.
    pub unenforced: PredicateSummary,
}

/// Catalog questions the engine asks a connector while planning a query.
pub trait ConnectorMetadata: Send + Sync {
    fn list_schema_names(&self) -> Vec<String>;

    fn get_table_handle(&self, name: &SchemaTableName) -> ConnectorResult<Arc<dyn ConnectorTableHandle>>;

    fn list_tables(&self, schema_name: Option<&str>) -> ConnectorResult<Vec<SchemaTableName>>;

    fn get_column_handles(&self, table: &dyn ConnectorTableHandle) -> ConnectorResult<IndexMap<String, Arc<dyn ConnectorColumnHandle>>>;

    fn get_column_metadata(&self, table: &dyn ConnectorTableHandle, column: &dyn ConnectorColumnHandle) -> ConnectorResult<ColumnMetadata>;

    fn get_table_metadata(&self, table: &dyn ConnectorTableHandle) -> ConnectorResult<ConnectorTableMetadata>;

    fn list_table_columns(&self, prefix: &SchemaTablePrefix) -> ConnectorResult<IndexMap<SchemaTableName, Vec<ColumnMetadata>>>;

    fn get_table_layouts(
        &self,
        table: &dyn ConnectorTableHandle,
        summary: &PredicateSummary,
        desired_columns: Option<&[Arc<dyn ConnectorColumnHandle>]>,
    ) -> ConnectorResult<Vec<TableLayoutResult>>;

    fn get_table_layout(&self, handle: &dyn ConnectorTableLayoutHandle) -> ConnectorResult<TableLayout>;
}
