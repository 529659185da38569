//! MongoDB connector backed by the `mongodb` crate's blocking API.

use std::time::Duration;

use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::sync::{Client, Collection};

use crate::connector::{
    CollectionConnector, CollectionHandle, CollectionNamespace, ResolvedDescriptor,
    connection_string,
};
use crate::error::ConnectError;

/// Field holding an item's absolute expiry time in cache documents.
pub const EXPIRES_FIELD: &str = "expires";

impl<T: Send + Sync> CollectionHandle for Collection<T> {
    fn namespace(&self) -> CollectionNamespace {
        let ns = Collection::<T>::namespace(self);
        CollectionNamespace {
            database: ns.db,
            collection: ns.coll,
        }
    }
}

/// Creates `Collection<Document>` handles.
///
/// Each materialization builds its own client from the descriptor's server
/// and options. By default a TTL index on [`EXPIRES_FIELD`] is ensured so
/// the server drops expired cache items on its own; the index round-trip
/// doubles as the reachability check. With the index disabled a `ping`
/// command is sent instead.
#[derive(Clone, Debug)]
pub struct MongoConnector {
    ttl_index: bool,
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self { ttl_index: true }
    }
}

impl MongoConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: toggle TTL index creation.
    pub fn with_ttl_index(self, ttl_index: bool) -> Self {
        Self { ttl_index }
    }

    pub fn ttl_index(&self) -> bool {
        self.ttl_index
    }
}

impl CollectionConnector for MongoConnector {
    type Handle = Collection<Document>;

    fn connect(&self, target: &ResolvedDescriptor<'_>) -> Result<Self::Handle, ConnectError> {
        let uri = connection_string(target.server, target.connection_options)?;
        let client = Client::with_uri_str(&uri)?;
        let database = client.database(target.database);
        let collection = database.collection::<Document>(target.collection);

        if self.ttl_index {
            let mut keys = Document::new();
            keys.insert(EXPIRES_FIELD, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().expire_after(Duration::ZERO).build())
                .build();
            collection.create_index(index).run()?;
        } else {
            database.run_command(doc! { "ping": 1 }).run()?;
        }

        tracing::debug!(
            id = target.id,
            database = target.database,
            collection = target.collection,
            ttl_index = self.ttl_index,
            "connected collection"
        );
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_index_enabled_by_default() {
        assert!(MongoConnector::new().ttl_index());
        assert!(!MongoConnector::new().with_ttl_index(false).ttl_index());
    }

    #[test]
    fn handle_reports_namespace() {
        // Building a client does not contact the server.
        let client = Client::with_uri_str("mongodb://localhost:27017").unwrap();
        let collection = client.database("zend").collection::<Document>("cache");

        assert_eq!(
            CollectionHandle::namespace(&collection),
            CollectionNamespace {
                database: "zend".into(),
                collection: "cache".into(),
            }
        );
    }

    #[test]
    fn invalid_option_fails_before_connecting() {
        let options = mongocache_core::ConnectionOptions::new().with("appName", "a b");
        let target = ResolvedDescriptor {
            id: "foo",
            server: "mongodb://localhost:27017",
            connection_options: &options,
            database: "zend",
            collection: "cache",
        };
        let err = MongoConnector::new().connect(&target).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidOption(_)));
    }
}
