//! In-process Tell store used by the inspector binary, tests and benches.
//! Tables live behind a `parking_lot::RwLock`; every issued transaction id is remembered so it
//! can be resumed later, mirroring how handles are rehydrated against the real store.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{ConnectorError, ConnectorResult};
use crate::store::{Field, Table, TableId, Transaction, TransactionId, TransactionManager};

struct Inner {
    tables: RwLock<Vec<Table>>,
    issued: RwLock<HashSet<TransactionId>>,
    next_txn: AtomicI64,
    next_table: AtomicI64,
    enumerations: AtomicUsize,
}

#[derive(Clone)]
pub struct MemoryStore(Arc<Inner>);

impl Default for MemoryStore {
    fn default() -> Self { Self::new() }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self(Arc::new(Inner {
            tables: RwLock::new(Vec::new()),
            issued: RwLock::new(HashSet::new()),
            next_txn: AtomicI64::new(1),
            next_table: AtomicI64::new(1),
            enumerations: AtomicUsize::new(0),
        }))
    }

    /// Seed the store with fully specified tables (ids included).
    pub fn with_tables(tables: Vec<Table>) -> Self {
        let store = Self::new();
        let next = tables.iter().map(|t| t.id).max().unwrap_or(0).saturating_add(1);
        store.0.next_table.store(next, Ordering::SeqCst);
        *store.0.tables.write() = tables;
        store
    }

    /// Load a JSON array of `{ "id", "name", "schema": [{ "name", "type" }] }` objects.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConnectorError::storage("catalog_file_unreadable", format!("cannot read {}: {}", path.display(), e)))?;
        let tables: Vec<Table> = serde_json::from_str(&text)
            .map_err(|e| ConnectorError::storage("catalog_file_invalid", format!("cannot parse {}: {}", path.display(), e)))?;
        debug!(target: "tell::store", "loaded {} tables from {}", tables.len(), path.display());
        Ok(Self::with_tables(tables))
    }

    /// Create a table with the next free id.
    pub fn create_table(&self, name: impl Into<String>, fields: Vec<Field>) -> TableId {
        let id = self.0.next_table.fetch_add(1, Ordering::SeqCst);
        self.0.tables.write().push(Table::new(id, name, fields));
        id
    }

    /// Number of `enumerate_tables` calls served so far, across all transactions.
    pub fn enumeration_count(&self) -> usize {
        self.0.enumerations.load(Ordering::SeqCst)
    }

    fn issue(&self, id: TransactionId) -> Arc<dyn Transaction> {
        Arc::new(MemoryTransaction { id, store: self.0.clone() })
    }
}

impl TransactionManager for MemoryStore {
    fn start_transaction(&self) -> ConnectorResult<Arc<dyn Transaction>> {
        let id = self.0.next_txn.fetch_add(1, Ordering::SeqCst);
        self.0.issued.write().insert(id);
        Ok(self.issue(id))
    }

    fn resume_transaction(&self, id: TransactionId) -> ConnectorResult<Arc<dyn Transaction>> {
        if !self.0.issued.read().contains(&id) {
            return Err(ConnectorError::not_found("transaction_not_found", format!("transaction {} does not exist", id)));
        }
        Ok(self.issue(id))
    }
}

struct MemoryTransaction {
    id: TransactionId,
    store: Arc<Inner>,
}

impl Transaction for MemoryTransaction {
    fn transaction_id(&self) -> TransactionId { self.id }

    fn enumerate_tables(&self) -> ConnectorResult<Vec<Table>> {
        self.store.enumerations.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.tables.read().clone())
    }
}
