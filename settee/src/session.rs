// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session bootstrap.

use std::sync::Arc;

use settee_sql::{Catalog, plan_query};
use settee_store::{Connector, DocumentStore};
use tracing::{debug, info};

use crate::{ConfigError, ConnectorOptions, DataFrame, DataFrameReader, Error, Options, Result};

#[derive(Debug)]
struct SessionInner {
    options: Options,
    resolved: ConnectorOptions,
    connector: Arc<dyn Connector>,
    store: Arc<dyn DocumentStore>,
    catalog: Catalog,
}

/// A live connection context.
///
/// Holds the session options, the connector, the store opened for the session endpoint, and
/// the view catalog used by [`Session::sql`]. Clones share all of it.
#[derive(Clone, Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

/// Builds a [`Session`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    options: Options,
    connector: Option<Arc<dyn Connector>>,
}

impl SessionBuilder {
    /// Sets a session option.
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }

    /// Sets the connector used to open endpoints.
    pub fn connector(mut self, connector: impl Connector + 'static) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Validates the options and opens the session endpoint.
    pub fn connect(self) -> Result<Session> {
        let connector = self.connector.ok_or(ConfigError::MissingConnector)?;
        let resolved = ConnectorOptions::resolve(&self.options)?;
        let store = open(connector.as_ref(), &resolved)?;
        info!(url = %resolved.endpoint.url(), mode = ?resolved.mode, "session connected");
        Ok(Session {
            inner: Arc::new(SessionInner {
                options: self.options,
                resolved,
                connector,
                store,
                catalog: Catalog::new(),
            }),
        })
    }
}

fn open(connector: &dyn Connector, options: &ConnectorOptions) -> Result<Arc<dyn DocumentStore>> {
    connector
        .connect(&options.endpoint)
        .map_err(|source| Error::Connection {
            host: options.endpoint.host.clone(),
            source,
        })
}

impl Session {
    /// Starts building a session.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Session options as configured.
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Validated session options.
    pub fn connector_options(&self) -> &ConnectorOptions {
        &self.inner.resolved
    }

    /// The store opened for the session endpoint.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    /// Logical views registered with [`DataFrame::create_or_replace_temp_view`].
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Starts a load.
    pub fn read(&self) -> DataFrameReader {
        DataFrameReader::new(self.clone())
    }

    /// Plans a query over the registered views.
    ///
    /// No rows are read until the result is inspected, collected, or written.
    pub fn sql(&self, query: &str) -> Result<DataFrame> {
        let table = plan_query(query, &self.inner.catalog)?;
        Ok(DataFrame::new(self.clone(), table))
    }

    /// Resolves `overrides` on top of the session options and returns a store for the result.
    pub(crate) fn open(
        &self,
        overrides: &Options,
    ) -> Result<(ConnectorOptions, Arc<dyn DocumentStore>)> {
        let resolved = self.resolve(overrides)?;
        let store = self.store_for(&resolved)?;
        Ok((resolved, store))
    }

    /// Validates `overrides` on top of the session options without connecting.
    pub(crate) fn resolve(&self, overrides: &Options) -> Result<ConnectorOptions> {
        Ok(ConnectorOptions::resolve(&self.inner.options.overlay(overrides))?)
    }

    /// Returns a store for `resolved`, reusing the session store when the endpoint is unchanged.
    pub(crate) fn store_for(&self, resolved: &ConnectorOptions) -> Result<Arc<dyn DocumentStore>> {
        if resolved.endpoint == self.inner.resolved.endpoint {
            return Ok(self.inner.store.clone());
        }
        debug!(url = %resolved.endpoint.url(), "opening endpoint for operation overrides");
        open(self.inner.connector.as_ref(), resolved)
    }
}

#[cfg(test)]
mod tests {
    use settee_store::{Credentials, MemoryCluster, StoreError};

    use super::*;
    use crate::ErrorKind;
    use crate::config::{HOST, PASSWORD, USERNAME};

    #[test]
    fn connect_validates_host_and_credentials() {
        let cluster = MemoryCluster::new();
        cluster.add_account("locked.example", Some(Credentials::new("u", "p")), false);

        let err = Session::builder()
            .connector(cluster.clone())
            .connect()
            .unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::MissingOption(HOST)));

        let err = Session::builder()
            .config(HOST, "nowhere.example")
            .connector(cluster.clone())
            .connect()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(matches!(
            err,
            Error::Connection {
                source: StoreError::UnknownHost(_),
                ..
            }
        ));

        let err = Session::builder()
            .config(HOST, "locked.example")
            .config(USERNAME, "u")
            .config(PASSWORD, "wrong")
            .connector(cluster.clone())
            .connect()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);

        let session = Session::builder()
            .config(HOST, "locked.example")
            .config(USERNAME, "u")
            .config(PASSWORD, "p")
            .connector(cluster)
            .connect()
            .unwrap();
        assert_eq!(session.store().host(), "locked.example");
    }

    #[test]
    fn missing_connector_is_a_configuration_error() {
        let err = Session::builder()
            .config(HOST, "h.example")
            .connect()
            .unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::MissingConnector));
    }

    #[test]
    fn unknown_views_fail_at_planning() {
        let cluster = MemoryCluster::new();
        cluster.add_account("h.example", None, true);
        let session = Session::builder()
            .config(HOST, "h.example")
            .connector(cluster)
            .connect()
            .unwrap();
        let err = session.sql("SELECT * FROM sales_table").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadOrQuery);
    }
}
