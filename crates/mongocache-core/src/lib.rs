//! mongocache-core: shared types for the mongocache workspace.
//!
//! - **options**: opaque driver connection options (`connectTimeoutMS`, ...)
//! - **descriptor**: the connection parameters a collection handle is built from
//! - **config**: `mongocache.toml` parsing

pub mod config;
pub mod descriptor;
pub mod options;

pub use config::ManagerConfig;
pub use descriptor::{DEFAULT_SERVER, ResourceDescriptor};
pub use options::{ConnectionOptions, OptionValue};
