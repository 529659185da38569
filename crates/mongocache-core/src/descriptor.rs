//! Connection descriptor for a single cache collection.

use serde::{Deserialize, Serialize};

use crate::options::ConnectionOptions;

/// Server used when a descriptor does not name one.
pub const DEFAULT_SERVER: &str = "mongodb://localhost:27017";

/// Everything needed to connect to and select one collection.
///
/// Every field is optional: a descriptor may be assembled piecemeal through
/// individual setters. Database and collection must be present by the time
/// a handle is materialized; the server falls back to [`DEFAULT_SERVER`].
///
/// Deserializes from both snake_case (`connection_options`) and the
/// camelCase / short forms (`connectionOptions`, `db`) found in adapter
/// option arrays. Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(
        default,
        alias = "connectionOptions",
        skip_serializing_if = "ConnectionOptions::is_empty"
    )]
    pub connection_options: ConnectionOptions,
    #[serde(default, alias = "db", skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl ResourceDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the server connection string.
    pub fn with_server(self, server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            ..self
        }
    }

    /// Builder method: set the driver connection options.
    pub fn with_connection_options(self, connection_options: ConnectionOptions) -> Self {
        Self {
            connection_options,
            ..self
        }
    }

    /// Builder method: set the database name.
    pub fn with_database(self, database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..self
        }
    }

    /// Builder method: set the collection name.
    pub fn with_collection(self, collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            ..self
        }
    }

    /// Server to connect to, defaulted.
    pub fn server_or_default(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}
