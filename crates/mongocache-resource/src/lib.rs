//! mongocache-resource: MongoDB collection handles for cache storage adapters.
//!
//! A [`MongoDbResourceManager`] maps caller-chosen identifiers to collection
//! handles. An identifier is configured either with a ready handle or with a
//! descriptor (server, connection options, database, collection); descriptors
//! are connected on first [`get_resource`](MongoDbResourceManager::get_resource)
//! and the handle is cached from then on.
//!
//! - **manager**: entries, lazy materialization, invalidation
//! - **connector**: the `CollectionConnector` seam and connection-string assembly
//! - **mongo**: the production connector on top of the `mongodb` driver
//! - **error**: configuration vs. resource errors

pub mod connector;
pub mod error;
pub mod manager;
pub mod mongo;

pub use connector::{
    CollectionConnector, CollectionHandle, CollectionNamespace, ResolvedDescriptor,
    connection_string,
};
pub use error::{ConnectError, ErrorKind, ResourceError, ResourceResult};
pub use manager::{ManagerStats, MongoDbResourceManager, ResourceSource};
pub use mongo::{EXPIRES_FIELD, MongoConnector};

pub use mongocache_core::{
    ConnectionOptions, DEFAULT_SERVER, ManagerConfig, OptionValue, ResourceDescriptor,
};
