//! Error types for the resource manager.

use thiserror::Error;

/// Result type alias for resource manager operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Broad classification of a [`ResourceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed over an unusable value. Reported synchronously by setters.
    Configuration,
    /// A resource could not be looked up or materialized.
    Resource,
}

/// Errors that can occur while configuring or resolving a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid resource '{id}': {reason}")]
    InvalidArgument { id: String, reason: String },

    #[error("no resource with id '{0}'")]
    NotFound(String),

    #[error("database not set for resource '{0}'")]
    MissingDatabase(String),

    #[error("collection not set for resource '{0}'")]
    MissingCollection(String),

    #[error("failed to connect resource '{id}': {source}")]
    Connect {
        id: String,
        #[source]
        source: ConnectError,
    },
}

impl ResourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::InvalidArgument { .. } => ErrorKind::Configuration,
            ResourceError::NotFound(_)
            | ResourceError::MissingDatabase(_)
            | ResourceError::MissingCollection(_)
            | ResourceError::Connect { .. } => ErrorKind::Resource,
        }
    }
}

/// Errors raised by a [`CollectionConnector`](crate::CollectionConnector).
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid connection option: {0}")]
    InvalidOption(String),

    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("{0}")]
    Other(String),
}
