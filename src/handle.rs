//! Handles Tell hands to the engine: tables, scan layouts and columns.

use std::any::Any;
use std::sync::Arc;

use crate::catalog::CatalogCache;
use crate::error::ConnectorResult;
use crate::spi::{ConnectorColumnHandle, ConnectorTableHandle, ConnectorTableLayoutHandle, PredicateSummary};
use crate::store::{Field, Table, TableId, TransactionId, TransactionManager};

/// Name every connector handle reports to the engine.
pub const CONNECTOR_NAME: &str = "tell";
/// The only schema Tell exposes.
pub const DEFAULT_SCHEMA: &str = "default";
/// Hidden column carrying the row key.
pub const KEY_COLUMN: &str = "__key";

#[derive(Clone, Debug, PartialEq)]
pub struct TableHandle {
    table: Arc<Table>,
    transaction_id: TransactionId,
}

impl TableHandle {
    pub fn new(table: Arc<Table>, transaction_id: TransactionId) -> Self {
        Self { table, transaction_id }
    }

    /// Rebuild a handle on the far side of a plan hand-off: resume the transaction it was
    /// resolved under and look the table up by id.
    pub fn resolve(
        table_id: TableId,
        transaction_id: TransactionId,
        manager: &dyn TransactionManager,
        cache: &CatalogCache,
    ) -> ConnectorResult<Self> {
        let txn = manager.resume_transaction(transaction_id)?;
        let table = cache.open_table_by_id(txn.as_ref(), table_id)?;
        Ok(Self::new(table, transaction_id))
    }

    pub fn table(&self) -> &Table { &self.table }
    pub fn table_id(&self) -> TableId { self.table.id }
    pub fn table_name(&self) -> &str { &self.table.name }
    pub fn transaction_id(&self) -> TransactionId { self.transaction_id }
}

impl ConnectorTableHandle for TableHandle {
    fn connector_name(&self) -> &str { CONNECTOR_NAME }
    fn as_any(&self) -> &dyn Any { self }
}

/// A table handle plus the predicate the engine planned the scan with, carried verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayoutHandle {
    table: TableHandle,
    summary: PredicateSummary,
}

impl TableLayoutHandle {
    pub fn new(table: TableHandle, summary: PredicateSummary) -> Self { Self { table, summary } }
    pub fn table(&self) -> &TableHandle { &self.table }
    pub fn summary(&self) -> &PredicateSummary { &self.summary }
}

impl ConnectorTableLayoutHandle for TableLayoutHandle {
    fn connector_name(&self) -> &str { CONNECTOR_NAME }
    fn as_any(&self) -> &dyn Any { self }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnHandle {
    /// The synthetic `__key` column.
    PrimaryKey,
    Column(Field),
}

impl ColumnHandle {
    pub fn name(&self) -> &str {
        match self {
            ColumnHandle::PrimaryKey => KEY_COLUMN,
            ColumnHandle::Column(field) => &field.name,
        }
    }

    pub fn field(&self) -> Option<&Field> {
        match self {
            ColumnHandle::PrimaryKey => None,
            ColumnHandle::Column(field) => Some(field),
        }
    }

    /// Wire discriminator, see [`crate::codec`].
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnHandle::PrimaryKey => crate::codec::PRIMARY,
            ColumnHandle::Column(_) => crate::codec::COLUMN,
        }
    }
}

impl ConnectorColumnHandle for ColumnHandle {
    fn connector_name(&self) -> &str { CONNECTOR_NAME }
    fn as_any(&self) -> &dyn Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::FieldType;

    #[test]
    fn column_handle_names() {
        assert_eq!(ColumnHandle::PrimaryKey.name(), KEY_COLUMN);
        let c = ColumnHandle::Column(Field::new("amount", FieldType::Double));
        assert_eq!(c.name(), "amount");
        assert_eq!(c.type_name(), "column");
        assert_eq!(ColumnHandle::PrimaryKey.type_name(), "primary");
        assert!(ColumnHandle::PrimaryKey.field().is_none());
    }

    #[test]
    fn resolve_rehydrates_from_ids() {
        let store = MemoryStore::new();
        let id = store.create_table("orders", vec![Field::new("id", FieldType::Int)]);
        let cache = CatalogCache::new();
        let txn = crate::store::TransactionManager::start_transaction(&store).unwrap();
        let handle = TableHandle::resolve(id, txn.transaction_id(), &store, &cache).unwrap();
        assert_eq!(handle.table_name(), "orders");
        assert_eq!(handle.transaction_id(), txn.transaction_id());
    }

    #[test]
    fn resolve_unknown_transaction_fails() {
        let store = MemoryStore::new();
        let id = store.create_table("orders", vec![]);
        let cache = CatalogCache::new();
        assert!(TableHandle::resolve(id, 999, &store, &cache).is_err());
        assert!(!cache.is_populated());
    }
}
