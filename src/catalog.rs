//! Process-scoped cache of every Tell table.
//!
//! The first request (from any transaction) enumerates the store once and publishes an
//! immutable [`CatalogSnapshot`]; every later request reads that snapshot without locking.
//! The snapshot is never refreshed: tables created after population stay invisible until the
//! cache is rebuilt, i.e. until the connector is recreated.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{ConnectorError, ConnectorResult};
use crate::handle::KEY_COLUMN;
use crate::store::{Table, TableId, Transaction};

#[derive(Debug)]
pub struct CatalogSnapshot {
    by_name: IndexMap<String, Arc<Table>>,
    by_id: HashMap<TableId, Arc<Table>>,
}

impl CatalogSnapshot {
    /// Index an enumeration. Names, ids and per-table column names must be unique, and no table
    /// may declare the key column.
    pub fn build(tables: Vec<Table>) -> ConnectorResult<Self> {
        let mut by_name: IndexMap<String, Arc<Table>> = IndexMap::with_capacity(tables.len());
        let mut by_id: HashMap<TableId, Arc<Table>> = HashMap::with_capacity(tables.len());
        for table in tables {
            if table.schema.field_by_name(KEY_COLUMN).is_some() {
                return Err(ConnectorError::storage(
                    "reserved_column",
                    format!("table {} declares reserved column {}", table.name, KEY_COLUMN),
                ));
            }
            {
                let mut seen = HashSet::with_capacity(table.schema.len());
                if let Some(dup) = table.schema.field_names().find(|n| !seen.insert(*n)) {
                    return Err(ConnectorError::storage(
                        "duplicate_column",
                        format!("table {} declares column {} twice", table.name, dup),
                    ));
                }
            }
            let table = Arc::new(table);
            if by_name.insert(table.name.clone(), table.clone()).is_some() {
                return Err(ConnectorError::storage("duplicate_table_name", format!("table name {} enumerated twice", table.name)));
            }
            if by_id.insert(table.id, table.clone()).is_some() {
                return Err(ConnectorError::storage("duplicate_table_id", format!("table id {} enumerated twice", table.id)));
            }
        }
        Ok(Self { by_name, by_id })
    }

    pub fn table(&self, name: &str) -> Option<&Arc<Table>> { self.by_name.get(name) }
    pub fn table_by_id(&self, id: TableId) -> Option<&Arc<Table>> { self.by_id.get(&id) }
    /// Tables keyed by name, in enumeration order.
    pub fn tables(&self) -> &IndexMap<String, Arc<Table>> { &self.by_name }
    pub fn len(&self) -> usize { self.by_name.len() }
    pub fn is_empty(&self) -> bool { self.by_name.is_empty() }
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    snapshot: OnceCell<Arc<CatalogSnapshot>>,
}

impl CatalogCache {
    pub fn new() -> Self { Self::default() }

    pub fn is_populated(&self) -> bool { self.snapshot.get().is_some() }

    /// The published snapshot, enumerating through `txn` if nothing is published yet.
    /// Concurrent first callers wait for the single initializer; a failed enumeration
    /// publishes nothing and leaves the next caller to retry.
    pub fn snapshot(&self, txn: &dyn Transaction) -> ConnectorResult<&Arc<CatalogSnapshot>> {
        self.snapshot.get_or_try_init(|| {
            debug!(target: "tell::catalog", "populating catalog under transaction {}", txn.transaction_id());
            let snapshot = CatalogSnapshot::build(txn.enumerate_tables()?)?;
            info!(target: "tell::catalog", "catalog populated: tables={} transaction={}", snapshot.len(), txn.transaction_id());
            Ok(Arc::new(snapshot))
        })
    }

    pub fn open_table(&self, txn: &dyn Transaction, name: &str) -> ConnectorResult<Arc<Table>> {
        self.snapshot(txn)?
            .table(name)
            .cloned()
            .ok_or_else(|| ConnectorError::not_found("table_not_found", format!("table {} does not exist", name)))
    }

    pub fn open_table_by_id(&self, txn: &dyn Transaction, id: TableId) -> ConnectorResult<Arc<Table>> {
        self.snapshot(txn)?
            .table_by_id(id)
            .cloned()
            .ok_or_else(|| ConnectorError::not_found("table_not_found", format!("table {} does not exist", id)))
    }

    pub fn table_names(&self, txn: &dyn Transaction) -> ConnectorResult<Vec<String>> {
        Ok(self.snapshot(txn)?.tables().keys().cloned().collect())
    }

    pub fn tables(&self, txn: &dyn Transaction) -> ConnectorResult<&IndexMap<String, Arc<Table>>> {
        Ok(self.snapshot(txn)?.tables())
    }
}
