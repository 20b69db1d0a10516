//! Connector settings. Defaults, overridden by catalog properties, overridden by environment.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECTOR_ID: &str = "tell";

pub const PROP_CONNECTOR_NAME: &str = "connector.name";
pub const PROP_CATALOG_FILE: &str = "tell.catalog-file";

pub const ENV_CONNECTOR_ID: &str = "TELL_CONNECTOR_ID";
pub const ENV_CATALOG_FILE: &str = "TELL_CATALOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Name of this catalog instance; used in logs.
    pub connector_id: String,
    /// JSON table list used by the in-memory store (inspector binary, local runs).
    pub catalog_file: Option<PathBuf>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self { connector_id: DEFAULT_CONNECTOR_ID.to_string(), catalog_file: None }
    }
}

impl ConnectorConfig {
    /// Build from a catalog properties map (`connector.name`, `tell.catalog-file`).
    pub fn from_properties(props: &HashMap<String, String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = props.get(PROP_CONNECTOR_NAME).filter(|v| !v.trim().is_empty()) {
            cfg.connector_id = v.trim().to_string();
        }
        if let Some(v) = props.get(PROP_CATALOG_FILE).filter(|v| !v.trim().is_empty()) {
            cfg.catalog_file = Some(PathBuf::from(v.trim()));
        }
        cfg
    }

    /// Apply `TELL_CONNECTOR_ID` / `TELL_CATALOG_FILE` on top of `self`.
    pub fn with_env(self) -> Self {
        self.with_vars(|k| std::env::var(k).ok())
    }

    pub fn from_env() -> Self { Self::default().with_env() }

    fn with_vars(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = get(ENV_CONNECTOR_ID).filter(|v| !v.trim().is_empty()) {
            self.connector_id = v.trim().to_string();
        }
        if let Some(v) = get(ENV_CATALOG_FILE).filter(|v| !v.trim().is_empty()) {
            self.catalog_file = Some(PathBuf::from(v.trim()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ConnectorConfig::default();
        assert_eq!(cfg.connector_id, "tell");
        assert!(cfg.catalog_file.is_none());
    }

    #[test]
    fn serializes_and_fills_missing_keys_with_defaults() {
        let cfg: ConnectorConfig = serde_json::from_str(r#"{"catalog_file": "/tmp/c.json"}"#).unwrap();
        assert_eq!(cfg.connector_id, DEFAULT_CONNECTOR_ID);
        assert_eq!(cfg.catalog_file, Some(PathBuf::from("/tmp/c.json")));
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["connector_id"], "tell");
    }

    #[test]
    fn properties_override_defaults() {
        let mut props = HashMap::new();
        props.insert(PROP_CONNECTOR_NAME.to_string(), " tell_prod ".to_string());
        props.insert(PROP_CATALOG_FILE.to_string(), "/etc/tell/catalog.json".to_string());
        props.insert("unrelated".to_string(), "x".to_string());
        let cfg = ConnectorConfig::from_properties(&props);
        assert_eq!(cfg.connector_id, "tell_prod");
        assert_eq!(cfg.catalog_file, Some(PathBuf::from("/etc/tell/catalog.json")));
    }

    #[test]
    fn env_overrides_properties_and_blank_is_ignored() {
        let mut props = HashMap::new();
        props.insert(PROP_CONNECTOR_NAME.to_string(), "from_props".to_string());
        let vars: HashMap<&str, &str> = [(ENV_CONNECTOR_ID, "from_env"), (ENV_CATALOG_FILE, "  ")].into_iter().collect();
        let cfg = ConnectorConfig::from_properties(&props).with_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.connector_id, "from_env");
        assert!(cfg.catalog_file.is_none());
    }
}
