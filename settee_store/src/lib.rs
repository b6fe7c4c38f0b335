// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document store connector seam.
//!
//! The pipeline reads and writes remote document collections only through the
//! [`Connector`] and [`DocumentStore`] traits defined here. [`MemoryCluster`] is an
//! in-process implementation that honors the same contract (reachability, credentials,
//! revisions, change feed) and backs the demo and the tests.

mod document;
mod error;
mod memory;
mod selector;
mod store;

pub use document::{
    Change, ChangesPage, ChangesRequest, Credentials, DESIGN_PREFIX, DocResult, Document,
    Endpoint, Protocol,
};
pub use error::StoreError;
pub use memory::{MemoryCluster, MemoryStore};
pub use selector::Selector;
pub use store::{Connector, DocumentStore};
