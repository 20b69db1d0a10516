//! Process-scoped connector: owns the catalog cache and the transaction manager, hands out
//! per-transaction metadata and rehydrates handles that crossed an execution boundary.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::CatalogCache;
use crate::codec;
use crate::config::ConnectorConfig;
use crate::error::ConnectorResult;
use crate::handle::{ColumnHandle, TableHandle, TableLayoutHandle};
use crate::metadata::TellMetadata;
use crate::store::{TableId, Transaction, TransactionId, TransactionManager};

pub struct TellConnector {
    config: ConnectorConfig,
    manager: Arc<dyn TransactionManager>,
    cache: Arc<CatalogCache>,
}

impl TellConnector {
    pub fn new(config: ConnectorConfig, manager: Arc<dyn TransactionManager>) -> Self {
        info!(target: "tell::connector", "connector '{}' created", config.connector_id);
        Self { config, manager, cache: Arc::new(CatalogCache::new()) }
    }

    pub fn config(&self) -> &ConnectorConfig { &self.config }
    pub fn cache(&self) -> &Arc<CatalogCache> { &self.cache }
    pub fn transaction_manager(&self) -> &dyn TransactionManager { self.manager.as_ref() }

    /// Metadata bound to a caller-supplied transaction.
    pub fn metadata(&self, transaction: Arc<dyn Transaction>) -> TellMetadata {
        debug!(target: "tell::connector", "[{}] metadata for transaction {}", self.config.connector_id, transaction.transaction_id());
        TellMetadata::new(transaction, self.cache.clone())
    }

    /// Start a fresh transaction and bind metadata to it.
    pub fn begin(&self) -> ConnectorResult<TellMetadata> {
        Ok(self.metadata(self.manager.start_transaction()?))
    }

    pub fn resolve_table(&self, table_id: TableId, transaction_id: TransactionId) -> ConnectorResult<TableHandle> {
        TableHandle::resolve(table_id, transaction_id, self.manager.as_ref(), &self.cache)
    }

    pub fn decode_table_handle(&self, value: &Value) -> ConnectorResult<TableHandle> {
        codec::decode_table_handle(value, self.manager.as_ref(), &self.cache)
    }

    pub fn decode_layout_handle(&self, value: &Value) -> ConnectorResult<TableLayoutHandle> {
        codec::decode_layout_handle(value, self.manager.as_ref(), &self.cache)
    }

    pub fn decode_column_handle(&self, value: &Value) -> ConnectorResult<ColumnHandle> {
        codec::decode_column_handle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::ConnectorMetadata;
    use crate::store::memory::MemoryStore;
    use crate::store::{Field, FieldType};

    #[test]
    fn metadata_instances_share_one_cache() {
        let store = MemoryStore::new();
        store.create_table("orders", vec![Field::new("id", FieldType::Int)]);
        let connector = TellConnector::new(ConnectorConfig::default(), Arc::new(store.clone()));
        for _ in 0..3 {
            let md = connector.begin().unwrap();
            assert_eq!(md.list_tables(None).unwrap().len(), 1);
        }
        assert_eq!(store.enumeration_count(), 1);
        assert!(connector.cache().is_populated());
    }

    #[test]
    fn resolve_table_by_ids() {
        let store = MemoryStore::new();
        let id = store.create_table("orders", vec![]);
        let connector = TellConnector::new(ConnectorConfig::default(), Arc::new(store));
        let md = connector.begin().unwrap();
        let handle = connector.resolve_table(id, md.transaction().transaction_id()).unwrap();
        assert_eq!(handle.table_name(), "orders");
        assert!(connector.resolve_table(id + 1, md.transaction().transaction_id()).is_err());
    }
}
