//! mongocache.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::descriptor::{DEFAULT_SERVER, ResourceDescriptor};
use crate::options::ConnectionOptions;

/// Resources declared up front, keyed by identifier.
///
/// ```toml
/// [resources.default]
/// server = "mongodb://localhost:27017"
/// database = "zend"
/// collection = "cache"
///
/// [resources.default.connection_options]
/// connectTimeoutMS = 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDescriptor>,
}

impl ManagerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ManagerConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config with a single local resource.
    pub fn scaffold(id: &str, database: &str, collection: &str) -> Self {
        let descriptor = ResourceDescriptor::new()
            .with_server(DEFAULT_SERVER)
            .with_database(database)
            .with_collection(collection)
            .with_connection_options(ConnectionOptions::new().with("connectTimeoutMS", 500u32));
        Self {
            resources: BTreeMap::from([(id.to_string(), descriptor)]),
        }
    }
}
