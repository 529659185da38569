//! The seam between the resource manager and a database driver.
//!
//! The manager never talks to MongoDB directly. It hands a fully resolved
//! descriptor to a [`CollectionConnector`] and caches whatever handle comes
//! back. [`MongoConnector`](crate::MongoConnector) is the production
//! implementation; tests inject mocks.

use mongocache_core::ConnectionOptions;

use crate::error::ConnectError;

/// Database and collection a handle is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionNamespace {
    pub database: String,
    pub collection: String,
}

/// A connected, selected collection.
pub trait CollectionHandle {
    fn namespace(&self) -> CollectionNamespace;
}

/// A descriptor with every field required for connecting filled in.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedDescriptor<'a> {
    /// Identifier of the entry being materialized.
    pub id: &'a str,
    pub server: &'a str,
    pub connection_options: &'a ConnectionOptions,
    pub database: &'a str,
    pub collection: &'a str,
}

/// Factory for collection handles, injected so tests can run without a server.
pub trait CollectionConnector {
    type Handle: CollectionHandle;

    /// Connect to `target.server` and select `target.database` / `target.collection`.
    ///
    /// Must fail if the server cannot be reached; the manager relies on this
    /// to report connection problems at lookup time rather than on first use.
    fn connect(&self, target: &ResolvedDescriptor<'_>) -> Result<Self::Handle, ConnectError>;
}

/// Merge connection options into `server`'s query string.
///
/// `mongodb://host:27017` with `{connectTimeoutMS: 5}` becomes
/// `mongodb://host:27017/?connectTimeoutMS=5`. A `/` is inserted before the
/// query when the server has none. The driver rejects repeated options, so a
/// server query parameter that is also set in `options` is dropped; names
/// compare case-insensitively, as the driver treats them.
pub fn connection_string(
    server: &str,
    options: &ConnectionOptions,
) -> Result<String, ConnectError> {
    if options.is_empty() {
        return Ok(server.to_string());
    }

    let (scheme, rest) = match server.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, server),
    };
    let (location, query) = rest
        .split_once('?')
        .map_or((rest, None), |(location, query)| (location, Some(query)));

    let mut uri = match scheme {
        Some(scheme) => format!("{scheme}://{location}"),
        None => location.to_string(),
    };
    if !location.contains('/') {
        uri.push('/');
    }

    let overridden = |param: &str| {
        let key = param.split_once('=').map_or(param, |(key, _)| key);
        options.iter().any(|(name, _)| name.eq_ignore_ascii_case(key))
    };
    let mut params: Vec<String> = query
        .into_iter()
        .flat_map(|query| query.split('&'))
        .filter(|param| !param.is_empty() && !overridden(*param))
        .map(str::to_string)
        .collect();

    for (name, value) in options.iter() {
        let value = value.to_string();
        check_component(name)?;
        check_component(&value)?;
        params.push(format!("{name}={value}"));
    }

    uri.push('?');
    uri.push_str(&params.join("&"));
    Ok(uri)
}

fn check_component(component: &str) -> Result<(), ConnectError> {
    if component.is_empty() {
        return Err(ConnectError::InvalidOption("empty option name or value".to_string()));
    }
    let reserved = |c: char| matches!(c, '&' | '=' | '?' | '#' | '/') || c.is_whitespace();
    if let Some(c) = component.chars().find(|&c| reserved(c)) {
        return Err(ConnectError::InvalidOption(format!(
            "{component:?} contains reserved character {c:?}"
        )));
    }
    Ok(())
}
