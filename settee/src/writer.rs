// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisting data frames to a collection.

use settee_store::StoreError;
use tracing::{debug, info};

use crate::config::USERNAME;
use crate::{ConfigError, DataFrame, Error, Options, Result};

/// Outcome of a successful save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteSummary {
    /// Destination collection.
    pub database: String,
    /// Documents written.
    pub documents: usize,
    /// Bulk requests sent.
    pub batches: usize,
    /// Whether the destination was created by this save.
    pub created: bool,
}

/// Configures and runs a write. Created by [`DataFrame::write`].
#[derive(Debug)]
pub struct DataFrameWriter {
    frame: DataFrame,
    options: Options,
}

impl DataFrameWriter {
    pub(crate) fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            options: Options::new(),
        }
    }

    /// Overrides a session option for this write.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }

    /// Writes every row of the frame to `database`.
    ///
    /// Rows become JSON documents with null cells omitted; an `_id` column names the document.
    /// Documents are sent in batches of `bulkSize`, and the first rejected batch fails the save.
    pub fn save(&self, database: &str) -> Result<WriteSummary> {
        let session = self.frame.session();
        let options = session.resolve(&self.options)?;
        if options.endpoint.credentials.is_none() {
            // Partial credentials were already rejected while resolving.
            return Err(ConfigError::MissingOption(USERNAME).into());
        }
        let store = session.store_for(&options).map_err(|err| match err {
            // Unreachable destinations fail the write, not the session.
            Error::Connection { source, .. } => Error::write(database)(source),
            other => other,
        })?;

        let exists = store
            .database_exists(database)
            .map_err(Error::write(database))?;
        let created = if exists {
            false
        } else if options.create_db_on_save {
            store
                .create_database(database)
                .map_err(Error::write(database))?;
            info!(database, "created destination database");
            true
        } else {
            return Err(Error::write(database)(StoreError::DatabaseNotFound(
                database.to_owned(),
            )));
        };

        let schema = self.frame.schema().clone();
        let docs: Vec<_> = self
            .frame
            .lazy_table()
            .rows()
            .map(|row| row.to_document(&schema))
            .collect();

        let mut batches = 0;
        for batch in docs.chunks(options.bulk_size) {
            let written = store
                .bulk_docs(database, batch.to_vec())
                .map_err(Error::write(database))?;
            batches += 1;
            debug!(database, batch = batches, documents = written.len(), "wrote batch");
        }

        let summary = WriteSummary {
            database: database.to_owned(),
            documents: docs.len(),
            batches,
            created,
        };
        info!(
            database,
            documents = summary.documents,
            batches = summary.batches,
            created = summary.created,
            "saved data frame"
        );
        Ok(summary)
    }
}
