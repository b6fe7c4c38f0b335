// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector traits.
//!
//! The pipeline never talks to a database directly. A [`Connector`] opens an [`Endpoint`] and
//! hands back a [`DocumentStore`]; everything past that point (transport, partitioning,
//! durability) belongs to the store implementation.

use core::fmt::Debug;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::{ChangesPage, ChangesRequest, DocResult, Document, Endpoint, StoreError};

/// Opens document stores.
pub trait Connector: Debug + Send + Sync {
    /// Connects to `endpoint`, validating reachability and credentials.
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn DocumentStore>, StoreError>;
}

/// Access to the databases of one account.
pub trait DocumentStore: Debug + Send + Sync {
    /// Host this store is connected to.
    fn host(&self) -> &str;

    /// Returns whether the database exists.
    fn database_exists(&self, db: &str) -> Result<bool, StoreError>;

    /// Creates an empty database.
    fn create_database(&self, db: &str) -> Result<(), StoreError>;

    /// Returns every current document, ordered by id.
    fn all_docs(&self, db: &str) -> Result<Vec<Document>, StoreError>;

    /// Returns one page of the change feed.
    fn changes(&self, db: &str, request: &ChangesRequest) -> Result<ChangesPage, StoreError>;

    /// Writes a batch of documents.
    ///
    /// Documents may carry `_id` (generated when absent), `_rev` (required to update an
    /// existing document), and `_deleted`. The batch is applied all-or-nothing.
    fn bulk_docs(
        &self,
        db: &str,
        docs: Vec<Map<String, JsonValue>>,
    ) -> Result<Vec<DocResult>, StoreError>;
}
