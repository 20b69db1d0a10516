//! Per-transaction answers to the engine's catalog questions.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::catalog::CatalogCache;
use crate::error::{ConnectorError, ConnectorResult};
use crate::handle::{ColumnHandle, TableHandle, TableLayoutHandle, DEFAULT_SCHEMA, KEY_COLUMN};
use crate::spi::{
    ColumnMetadata, ConnectorColumnHandle, ConnectorMetadata, ConnectorTableHandle, ConnectorTableLayoutHandle,
    ConnectorTableMetadata, PredicateSummary, SchemaTableName, SchemaTablePrefix, TableLayout, TableLayoutResult,
};
use crate::store::{Table, Transaction};
use crate::types::EngineType;

pub struct TellMetadata {
    transaction: Arc<dyn Transaction>,
    cache: Arc<CatalogCache>,
}

fn tell_table(handle: &dyn ConnectorTableHandle) -> ConnectorResult<&TableHandle> {
    handle.as_any().downcast_ref::<TableHandle>().ok_or_else(|| {
        ConnectorError::type_mismatch("foreign_table_handle", format!("table handle is not from tell (connector is '{}')", handle.connector_name()))
    })
}

fn tell_column(handle: &dyn ConnectorColumnHandle) -> ConnectorResult<&ColumnHandle> {
    handle.as_any().downcast_ref::<ColumnHandle>().ok_or_else(|| {
        ConnectorError::type_mismatch("foreign_column_handle", format!("column handle is not from tell (connector is '{}')", handle.connector_name()))
    })
}

fn tell_layout(handle: &dyn ConnectorTableLayoutHandle) -> ConnectorResult<&TableLayoutHandle> {
    handle.as_any().downcast_ref::<TableLayoutHandle>().ok_or_else(|| {
        ConnectorError::type_mismatch("foreign_layout_handle", format!("layout handle is not from tell (connector is '{}')", handle.connector_name()))
    })
}

fn check_schema(schema: Option<&str>) -> ConnectorResult<()> {
    match schema {
        Some(s) if s != DEFAULT_SCHEMA => Err(ConnectorError::unsupported(
            "multi_schema",
            format!("schemas not supported by tell but {} was given", s),
        )),
        _ => Ok(()),
    }
}

/// Key column first, then every schema field in declaration order.
pub fn column_handles(table: &Table) -> IndexMap<String, ColumnHandle> {
    let mut out = IndexMap::with_capacity(table.schema.len() + 1);
    out.insert(KEY_COLUMN.to_string(), ColumnHandle::PrimaryKey);
    for field in table.schema.fields() {
        out.insert(field.name.clone(), ColumnHandle::Column(field.clone()));
    }
    out
}

pub fn column_metadata(handle: &ColumnHandle) -> ConnectorResult<ColumnMetadata> {
    match handle {
        ColumnHandle::PrimaryKey => Ok(ColumnMetadata::new(KEY_COLUMN, EngineType::Bigint, true)),
        ColumnHandle::Column(field) => Ok(ColumnMetadata::new(field.name.clone(), field.engine_type()?, false)),
    }
}

pub fn table_columns(table: &Table) -> ConnectorResult<Vec<ColumnMetadata>> {
    column_handles(table).values().map(column_metadata).collect()
}

impl TellMetadata {
    pub fn new(transaction: Arc<dyn Transaction>, cache: Arc<CatalogCache>) -> Self {
        Self { transaction, cache }
    }

    pub fn transaction(&self) -> &dyn Transaction { self.transaction.as_ref() }

    fn layout(&self, handle: &TableLayoutHandle, columns: Vec<Arc<dyn ConnectorColumnHandle>>) -> TableLayout {
        TableLayout { handle: Arc::new(handle.clone()), columns: Some(columns) }
    }

    fn all_columns(table: &TableHandle) -> Vec<Arc<dyn ConnectorColumnHandle>> {
        column_handles(table.table())
            .into_values()
            .map(|c| Arc::new(c) as Arc<dyn ConnectorColumnHandle>)
            .collect()
    }
}

impl ConnectorMetadata for TellMetadata {
    fn list_schema_names(&self) -> Vec<String> {
        vec![DEFAULT_SCHEMA.to_string()]
    }

    fn get_table_handle(&self, name: &SchemaTableName) -> ConnectorResult<Arc<dyn ConnectorTableHandle>> {
        if name.schema_name != DEFAULT_SCHEMA {
            return Err(ConnectorError::not_found("table_not_found", format!("table {} does not exist", name)));
        }
        let table = self.cache.open_table(self.transaction(), &name.table_name)?;
        Ok(Arc::new(TableHandle::new(table, self.transaction.transaction_id())))
    }

    fn list_tables(&self, schema_name: Option<&str>) -> ConnectorResult<Vec<SchemaTableName>> {
        check_schema(schema_name)?;
        Ok(self
            .cache
            .table_names(self.transaction())?
            .into_iter()
            .map(|t| SchemaTableName::new(DEFAULT_SCHEMA, t))
            .collect())
    }

    fn get_column_handles(&self, table: &dyn ConnectorTableHandle) -> ConnectorResult<IndexMap<String, Arc<dyn ConnectorColumnHandle>>> {
        let table = tell_table(table)?;
        Ok(column_handles(table.table())
            .into_iter()
            .map(|(name, c)| (name, Arc::new(c) as Arc<dyn ConnectorColumnHandle>))
            .collect())
    }

    fn get_column_metadata(&self, table: &dyn ConnectorTableHandle, column: &dyn ConnectorColumnHandle) -> ConnectorResult<ColumnMetadata> {
        tell_table(table)?;
        column_metadata(tell_column(column)?)
    }

    fn get_table_metadata(&self, table: &dyn ConnectorTableHandle) -> ConnectorResult<ConnectorTableMetadata> {
        let table = tell_table(table)?;
        Ok(ConnectorTableMetadata {
            table: SchemaTableName::new(DEFAULT_SCHEMA, table.table_name()),
            columns: table_columns(table.table())?,
        })
    }

    fn list_table_columns(&self, prefix: &SchemaTablePrefix) -> ConnectorResult<IndexMap<SchemaTableName, Vec<ColumnMetadata>>> {
        check_schema(prefix.schema_name.as_deref())?;
        let table_prefix = prefix.table_name.as_deref().unwrap_or("");
        let mut out = IndexMap::new();
        for (name, table) in self.cache.tables(self.transaction())? {
            if name.starts_with(table_prefix) {
                out.insert(SchemaTableName::new(DEFAULT_SCHEMA, name.clone()), table_columns(table)?);
            }
        }
        debug!(target: "tell::metadata", "list_table_columns prefix='{}' matched={}", table_prefix, out.len());
        Ok(out)
    }

    fn get_table_layouts(
        &self,
        table: &dyn ConnectorTableHandle,
        summary: &PredicateSummary,
        desired_columns: Option<&[Arc<dyn ConnectorColumnHandle>]>,
    ) -> ConnectorResult<Vec<TableLayoutResult>> {
        let table = tell_table(table)?;
        // No pushdown: the layout always exposes every column, whatever was asked for.
        if let Some(cols) = desired_columns {
            debug!(target: "tell::metadata", "ignoring {} desired columns for {}", cols.len(), table.table_name());
        }
        let handle = TableLayoutHandle::new(table.clone(), summary.clone());
        Ok(vec![TableLayoutResult { layout: self.layout(&handle, Self::all_columns(table)), unenforced: summary.clone() }])
    }

    fn get_table_layout(&self, handle: &dyn ConnectorTableLayoutHandle) -> ConnectorResult<TableLayout> {
        let handle = tell_layout(handle)?;
        Ok(self.layout(handle, Self::all_columns(handle.table())))
    }
}
