// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading collections into tables.
//!
//! A snapshot load reads every current document in one request. A change-feed load replays
//! the feed from sequence `0` in pages of `bulkSize`, folding each change into the document
//! set: later revisions replace earlier ones and deletions remove the document. Both end in
//! the same table for the same collection state.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};
use settee_core::{Row, Schema, Table, infer_schema};
use settee_store::{ChangesPage, ChangesRequest, Document, DocumentStore};
use settee_transforms::LazyTable;
use tracing::{debug, info, warn};

use crate::config::LoadMode;
use crate::{ConnectorOptions, DataFrame, Error, Options, Result, Session};

/// Statistics of one load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// How the collection was read.
    pub mode: LoadMode,
    /// Data documents loaded (design documents excluded).
    pub documents: usize,
    /// Requests made to the store.
    pub pages: usize,
    /// Change-feed pages still held when the load finished.
    pub retained_pages: usize,
    /// Documents the schema was inferred from.
    pub sampled: usize,
    /// Columns in the inferred schema.
    pub columns: usize,
}

/// Configures and runs a load. Created by [`Session::read`].
#[derive(Debug)]
pub struct DataFrameReader {
    session: Session,
    options: Options,
}

impl DataFrameReader {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            options: Options::new(),
        }
    }

    /// Overrides a session option for this load.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }

    /// Loads `database` into a data frame.
    pub fn load(&self, database: &str) -> Result<DataFrame> {
        self.load_with_report(database).map(|(df, _)| df)
    }

    /// Loads `database` and reports what the load did.
    pub fn load_with_report(&self, database: &str) -> Result<(DataFrame, LoadReport)> {
        let (options, store) = self.session.open(&self.options)?;
        let (documents, pages, retained_pages): (Vec<Document>, usize, usize) = match options.mode {
            LoadMode::Snapshot => {
                if options.selector.is_some() {
                    warn!(database, "selector only applies to change-feed loads; ignoring it");
                }
                let docs = store.all_docs(database).map_err(Error::load(database))?;
                (docs.into_iter().filter(|d| !d.is_design()).collect(), 1, 0)
            }
            LoadMode::ChangeFeed => {
                let feed = fold_changes(store.as_ref(), database, &options)?;
                (feed.documents, feed.pages, feed.retained.len())
            }
        };

        let records: Vec<Map<String, JsonValue>> =
            documents.iter().map(Document::to_record).collect();
        let sampled = options
            .schema_sample_size
            .map_or(records.len(), |n| n.min(records.len()));
        let schema = infer_schema(records.iter().take(sampled));
        let table = build_table(schema, &records);

        let report = LoadReport {
            mode: options.mode,
            documents: records.len(),
            pages,
            retained_pages,
            sampled,
            columns: table.schema().len(),
        };
        info!(
            database,
            mode = ?report.mode,
            documents = report.documents,
            pages = report.pages,
            retained_pages = report.retained_pages,
            columns = report.columns,
            "loaded collection"
        );
        let frame = DataFrame::new(self.session.clone(), LazyTable::scan(table));
        Ok((frame, report))
    }
}

fn build_table(schema: Schema, records: &[Map<String, JsonValue>]) -> Table {
    let rows = records
        .iter()
        .map(|r| Row::from_document(r, &schema))
        .collect();
    Table::new(schema, rows)
}

struct FoldedFeed {
    documents: Vec<Document>,
    pages: usize,
    retained: Vec<ChangesPage>,
}

fn fold_changes(
    store: &dyn DocumentStore,
    database: &str,
    options: &ConnectorOptions,
) -> Result<FoldedFeed> {
    let mut current: BTreeMap<String, Document> = BTreeMap::new();
    let mut retained = Vec::new();
    let mut pages = 0;
    let mut since = 0;
    loop {
        let request = ChangesRequest {
            since,
            limit: options.bulk_size,
            selector: options.selector.clone(),
        };
        let page = store
            .changes(database, &request)
            .map_err(Error::load(database))?;
        pages += 1;
        for change in &page.results {
            match &change.doc {
                Some(doc) if !change.deleted => {
                    current.insert(change.id.clone(), doc.clone());
                }
                _ => {
                    current.remove(&change.id);
                }
            }
        }
        debug!(
            database,
            page = pages,
            changes = page.results.len(),
            pending = page.pending,
            "folded change-feed page"
        );
        since = page.last_seq;
        let done = page.pending == 0 || page.results.is_empty();
        if !options.unpersist {
            retained.push(page);
        }
        if done {
            break;
        }
    }
    Ok(FoldedFeed {
        documents: current.into_values().filter(|d| !d.is_design()).collect(),
        pages,
        retained,
    })
}
