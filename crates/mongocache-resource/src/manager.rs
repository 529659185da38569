//! Resource manager: identifier-keyed, lazily connected collection handles.
//!
//! Each identifier maps to an entry holding a connection descriptor and, once
//! realized, a shared collection handle.
//!
//! ```text
//! set_*(id, ..)          → entry created/updated (Descriptor-only)
//! set_resource(id, h)    → entry replaced (Realized, handle supplied)
//! get_resource(id)
//!   → handle cached      → return it
//!   → descriptor only    → connector.connect(descriptor) → cache → return
//!   → no entry           → NotFound
//! ```
//!
//! Changing any descriptor field of a realized entry drops the cached
//! handle; the next `get_resource` connects again with the new values. A
//! failed connection leaves the entry unrealized so the lookup can be
//! retried.

use std::collections::HashMap;
use std::sync::Arc;

use mongocache_core::{ConnectionOptions, ManagerConfig, ResourceDescriptor};

use crate::connector::{CollectionConnector, CollectionHandle, ResolvedDescriptor};
use crate::error::{ResourceError, ResourceResult};
use crate::mongo::MongoConnector;

/// Value accepted by [`MongoDbResourceManager::set_resource`].
#[derive(Debug)]
pub enum ResourceSource<H> {
    /// An already connected handle, used as-is.
    Realized(Arc<H>),
    /// Connection parameters to materialize a handle from on first access.
    Descriptor(ResourceDescriptor),
}

impl<H> ResourceSource<H> {
    /// Wrap an owned handle.
    pub fn handle(handle: H) -> Self {
        ResourceSource::Realized(Arc::new(handle))
    }
}

impl<H> From<Arc<H>> for ResourceSource<H> {
    fn from(handle: Arc<H>) -> Self {
        ResourceSource::Realized(handle)
    }
}

impl<H> From<ResourceDescriptor> for ResourceSource<H> {
    fn from(descriptor: ResourceDescriptor) -> Self {
        ResourceSource::Descriptor(descriptor)
    }
}

/// Per-identifier record.
#[derive(Debug)]
struct ResourceEntry<H> {
    descriptor: ResourceDescriptor,
    /// Set once realized; cleared whenever the descriptor changes.
    handle: Option<Arc<H>>,
}

impl<H> Default for ResourceEntry<H> {
    fn default() -> Self {
        Self {
            descriptor: ResourceDescriptor::default(),
            handle: None,
        }
    }
}

impl<H> ResourceEntry<H> {
    /// Drop a cached handle made stale by a descriptor change.
    fn invalidate(&mut self, id: &str) {
        if self.handle.take().is_some() {
            tracing::debug!(id = id, "descriptor changed, dropped cached handle");
        }
    }
}

/// Counts of configured and realized resources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Entries present, realized or not.
    pub configured: usize,
    /// Entries currently holding a handle.
    pub realized: usize,
}

/// Maps identifiers to MongoDB collection handles, connecting lazily.
///
/// Not internally synchronized: mutations take `&mut self`, and a manager
/// shared between threads must be wrapped in a `Mutex` by the caller.
/// Handles are shared as `Arc`s, so every caller of [`get_resource`] for the
/// same identifier observes the same instance until the entry changes.
///
/// [`get_resource`]: MongoDbResourceManager::get_resource
pub struct MongoDbResourceManager<C: CollectionConnector = MongoConnector> {
    resources: HashMap<String, ResourceEntry<C::Handle>>,
    connector: C,
}

impl MongoDbResourceManager<MongoConnector> {
    /// Create an empty manager that connects with [`MongoConnector`].
    pub fn new() -> Self {
        Self::with_connector(MongoConnector::default())
    }
}

impl Default for MongoDbResourceManager<MongoConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CollectionConnector> MongoDbResourceManager<C> {
    /// Create an empty manager with the given connector.
    pub fn with_connector(connector: C) -> Self {
        Self {
            resources: HashMap::new(),
            connector,
        }
    }

    /// Create a manager pre-populated with the resources declared in `config`.
    pub fn from_config(config: &ManagerConfig, connector: C) -> Self {
        let mut manager = Self::with_connector(connector);
        for (id, descriptor) in &config.resources {
            manager.set_resource(id.as_str(), descriptor.clone());
        }
        manager
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Check whether an entry exists for `id`, realized or not.
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Create or replace the entry for `id`.
    ///
    /// A supplied handle is cached as-is and its namespace seeds the entry's
    /// database and collection. A descriptor replaces any previous entry and
    /// is materialized on the next [`get_resource`](Self::get_resource).
    pub fn set_resource(&mut self, id: impl Into<String>, source: impl Into<ResourceSource<C::Handle>>) {
        let id = id.into();
        let entry = match source.into() {
            ResourceSource::Realized(handle) => {
                let ns = handle.namespace();
                tracing::debug!(
                    id = %id,
                    database = %ns.database,
                    collection = %ns.collection,
                    "resource set from handle"
                );
                ResourceEntry {
                    descriptor: ResourceDescriptor::new()
                        .with_database(ns.database)
                        .with_collection(ns.collection),
                    handle: Some(handle),
                }
            }
            ResourceSource::Descriptor(descriptor) => {
                tracing::debug!(id = %id, server = ?descriptor.server, "resource set from descriptor");
                ResourceEntry {
                    descriptor,
                    handle: None,
                }
            }
        };
        self.resources.insert(id, entry);
    }

    /// Create or replace the entry for `id` from a loosely typed mapping.
    ///
    /// Recognized keys are `server`, `connectionOptions`
    /// (`connection_options`), `database` (`db`) and `collection`; anything
    /// else is ignored. Fails without touching existing state when `value`
    /// is not an object or a recognized key holds the wrong type.
    pub fn set_resource_value(&mut self, id: &str, value: &serde_json::Value) -> ResourceResult<()> {
        if !value.is_object() {
            return Err(ResourceError::InvalidArgument {
                id: id.to_string(),
                reason: format!(
                    "expected a collection handle or a descriptor mapping, got {}",
                    json_type_name(value)
                ),
            });
        }
        let descriptor: ResourceDescriptor =
            serde_json::from_value(value.clone()).map_err(|e| ResourceError::InvalidArgument {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        self.set_resource(id, descriptor);
        Ok(())
    }

    /// Return the handle for `id`, connecting on first access.
    ///
    /// Repeated calls return the same `Arc` until the entry is changed.
    pub fn get_resource(&mut self, id: &str) -> ResourceResult<Arc<C::Handle>> {
        let entry = self
            .resources
            .get_mut(id)
            .ok_or_else(|| ResourceError::NotFound(id.to_string()))?;

        if let Some(handle) = &entry.handle {
            return Ok(Arc::clone(handle));
        }

        let descriptor = &entry.descriptor;
        let database = descriptor
            .database
            .as_deref()
            .ok_or_else(|| ResourceError::MissingDatabase(id.to_string()))?;
        let collection = descriptor
            .collection
            .as_deref()
            .ok_or_else(|| ResourceError::MissingCollection(id.to_string()))?;
        let target = ResolvedDescriptor {
            id,
            server: descriptor.server_or_default(),
            connection_options: &descriptor.connection_options,
            database,
            collection,
        };

        let handle = match self.connector.connect(&target) {
            Ok(handle) => Arc::new(handle),
            Err(source) => {
                tracing::warn!(
                    id = id,
                    server = target.server,
                    error = %source,
                    "failed to materialize resource"
                );
                return Err(ResourceError::Connect {
                    id: id.to_string(),
                    source,
                });
            }
        };

        tracing::debug!(id = id, "resource materialized");
        entry.handle = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Remove the entry for `id`. Returns true if it existed.
    pub fn remove_resource(&mut self, id: &str) -> bool {
        let existed = self.resources.remove(id).is_some();
        if existed {
            tracing::debug!(id = id, "resource removed");
        }
        existed
    }

    /// Identifiers of all configured entries, in no particular order.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    // ── Descriptor accessors ───────────────────────────────────────

    pub fn server(&self, id: &str) -> ResourceResult<Option<&str>> {
        Ok(self.entry(id)?.descriptor.server.as_deref())
    }

    pub fn set_server(&mut self, id: &str, server: impl Into<String>) {
        let entry = self.entry_mut(id);
        entry.descriptor.server = Some(server.into());
        entry.invalidate(id);
    }

    pub fn connection_options(&self, id: &str) -> ResourceResult<&ConnectionOptions> {
        Ok(&self.entry(id)?.descriptor.connection_options)
    }

    pub fn set_connection_options(&mut self, id: &str, options: ConnectionOptions) {
        let entry = self.entry_mut(id);
        entry.descriptor.connection_options = options;
        entry.invalidate(id);
    }

    pub fn database(&self, id: &str) -> ResourceResult<Option<&str>> {
        Ok(self.entry(id)?.descriptor.database.as_deref())
    }

    pub fn set_database(&mut self, id: &str, database: impl Into<String>) {
        let entry = self.entry_mut(id);
        entry.descriptor.database = Some(database.into());
        entry.invalidate(id);
    }

    pub fn collection(&self, id: &str) -> ResourceResult<Option<&str>> {
        Ok(self.entry(id)?.descriptor.collection.as_deref())
    }

    pub fn set_collection(&mut self, id: &str, collection: impl Into<String>) {
        let entry = self.entry_mut(id);
        entry.descriptor.collection = Some(collection.into());
        entry.invalidate(id);
    }

    /// The full descriptor for `id`.
    pub fn descriptor(&self, id: &str) -> ResourceResult<&ResourceDescriptor> {
        Ok(&self.entry(id)?.descriptor)
    }

    // ── Statistics ─────────────────────────────────────────────────

    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            configured: self.resources.len(),
            realized: self.resources.values().filter(|e| e.handle.is_some()).count(),
        }
    }

    /// Log per-entry state at `tracing::info` level.
    pub fn log_stats(&self) {
        for (id, entry) in &self.resources {
            tracing::info!(
                id = %id,
                server = entry.descriptor.server_or_default(),
                database = ?entry.descriptor.database,
                collection = ?entry.descriptor.collection,
                realized = entry.handle.is_some(),
                "resource state"
            );
        }
        let stats = self.stats();
        tracing::info!(
            configured = stats.configured,
            realized = stats.realized,
            "resource manager statistics"
        );
    }

    fn entry(&self, id: &str) -> ResourceResult<&ResourceEntry<C::Handle>> {
        self.resources
            .get(id)
            .ok_or_else(|| ResourceError::NotFound(id.to_string()))
    }

    fn entry_mut(&mut self, id: &str) -> &mut ResourceEntry<C::Handle> {
        self.resources.entry(id.to_string()).or_default()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ── Debug impl (handles need not be Debug) ──────────────────────────

impl<C: CollectionConnector> std::fmt::Debug for MongoDbResourceManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoDbResourceManager")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
