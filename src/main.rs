use std::sync::Arc;

use anyhow::Context;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tell_presto::codec::encode_column_handle;
use tell_presto::config::ConnectorConfig;
use tell_presto::handle::DEFAULT_SCHEMA;
use tell_presto::spi::{ConnectorMetadata, SchemaTableName, SchemaTablePrefix};
use tell_presto::store::memory::MemoryStore;
use tell_presto::TellConnector;

/// Usage: tell-presto [catalog.json] [table-prefix]
/// Prints column metadata and wire-encoded column handles for every matching table.
fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args = std::env::args().skip(1);
    let mut config = ConnectorConfig::from_env();
    if let Some(path) = args.next() {
        config.catalog_file = Some(path.into());
    }
    let prefix = args.next().unwrap_or_default();
    let path = config
        .catalog_file
        .clone()
        .context("no catalog file: pass one as the first argument or set TELL_CATALOG_FILE")?;
    info!(target: "tell", "tell-presto inspecting '{}' as connector '{}', prefix='{}'", path.display(), config.connector_id, prefix);

    let store = MemoryStore::from_json_file(&path)?;
    let connector = TellConnector::new(config, Arc::new(store));
    let metadata = connector.begin()?;

    let mut tables: Vec<Value> = Vec::new();
    for (name, columns) in metadata.list_table_columns(&SchemaTablePrefix::new(DEFAULT_SCHEMA, prefix))? {
        let handle = metadata.get_table_handle(&SchemaTableName::new(DEFAULT_SCHEMA, name.table_name.clone()))?;
        let wire: Vec<Value> = metadata
            .get_column_handles(handle.as_ref())?
            .values()
            .filter_map(|h| h.as_any().downcast_ref::<tell_presto::ColumnHandle>())
            .map(encode_column_handle)
            .collect();
        tables.push(json!({ "table": name.to_string(), "columns": columns, "handles": wire }));
    }
    println!("{}", serde_json::to_string_pretty(&tables)?);
    Ok(())
}
