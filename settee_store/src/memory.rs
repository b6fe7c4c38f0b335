// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-process document cluster.
//!
//! [`MemoryCluster`] stands in for a set of remote accounts. It enforces the parts of the
//! remote contract the pipeline depends on: host reachability, credential checks, read-only
//! anonymous access, database existence, revision conflicts, and an ordered change feed.

use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;
use uuid::Uuid;

use crate::{
    Change, ChangesPage, ChangesRequest, Connector, Credentials, DocResult, Document,
    DocumentStore, Endpoint, StoreError,
};

#[derive(Debug)]
struct Account {
    credentials: Option<Credentials>,
    public_read: bool,
    databases: HashMap<String, Database>,
}

#[derive(Debug, Default)]
struct Database {
    docs: BTreeMap<String, Document>,
    log: Vec<Change>,
    latest: HashMap<String, u64>,
    seq: u64,
}

struct PlannedWrite {
    id: String,
    generation: u64,
    deleted: bool,
    body: Map<String, JsonValue>,
}

impl Database {
    fn apply(&mut self, docs: Vec<Map<String, JsonValue>>) -> Result<Vec<DocResult>, StoreError> {
        let mut planned = Vec::with_capacity(docs.len());
        let mut seen = HashSet::new();
        for mut body in docs {
            let id = match body.remove("_id") {
                Some(JsonValue::String(id)) if !id.is_empty() => id,
                Some(other) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "`_id` must be a non-empty string, got `{other}`"
                    )));
                }
                None => Uuid::new_v4().simple().to_string(),
            };
            let rev = match body.remove("_rev") {
                Some(JsonValue::String(rev)) => Some(rev),
                Some(other) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "`_rev` must be a string, got `{other}`"
                    )));
                }
                None => None,
            };
            let deleted = matches!(body.remove("_deleted"), Some(JsonValue::Bool(true)));
            if let Some(key) = body.keys().find(|k| k.starts_with('_')) {
                return Err(StoreError::InvalidDocument(format!(
                    "bad special document member `{key}` in `{id}`"
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(StoreError::Conflict { id });
            }
            let current = self.docs.get(&id);
            let accepted = match (current, &rev) {
                (Some(current), Some(rev)) => current.rev == *rev,
                (None, None) => !deleted,
                _ => false,
            };
            if !accepted {
                return Err(StoreError::Conflict { id });
            }
            let generation = current.map_or(0, |d| revision_generation(&d.rev)) + 1;
            planned.push(PlannedWrite {
                id,
                generation,
                deleted,
                body,
            });
        }

        let mut results = Vec::with_capacity(planned.len());
        for write in planned {
            self.seq += 1;
            let rev = format!("{}-{}", write.generation, Uuid::new_v4().simple());
            let change = if write.deleted {
                self.docs.remove(&write.id);
                Change {
                    seq: self.seq,
                    id: write.id.clone(),
                    deleted: true,
                    doc: None,
                }
            } else {
                let doc = Document {
                    id: write.id.clone(),
                    rev: rev.clone(),
                    body: write.body,
                };
                self.docs.insert(write.id.clone(), doc.clone());
                Change {
                    seq: self.seq,
                    id: write.id.clone(),
                    deleted: false,
                    doc: Some(doc),
                }
            };
            self.log.push(change);
            self.latest.insert(write.id.clone(), self.seq);
            results.push(DocResult { id: write.id, rev });
        }
        Ok(results)
    }

    fn changes(&self, request: &ChangesRequest) -> ChangesPage {
        // Only the newest change of each document is visible, as in a compacted feed.
        let visible: Vec<&Change> = self
            .log
            .iter()
            .filter(|c| c.seq > request.since && self.latest.get(&c.id) == Some(&c.seq))
            .filter(|c| match (&request.selector, &c.doc) {
                (Some(selector), Some(doc)) => selector.matches(&doc.to_record()),
                _ => true,
            })
            .collect();
        let limit = if request.limit == 0 {
            visible.len()
        } else {
            request.limit
        };
        let results: Vec<Change> = visible.iter().take(limit).map(|c| (*c).clone()).collect();
        let last_seq = results.last().map_or(request.since, |c| c.seq);
        ChangesPage {
            pending: visible.len() - results.len(),
            results,
            last_seq,
        }
    }
}

fn revision_generation(rev: &str) -> u64 {
    rev.split_once('-')
        .and_then(|(n, _)| n.parse().ok())
        .unwrap_or(0)
}

fn validate_database_name(db: &str) -> Result<(), StoreError> {
    let mut chars = db.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        });
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidDatabaseName(db.to_owned()))
    }
}

/// A set of in-process accounts, keyed by host.
///
/// Cloning is cheap; clones share the same accounts.
#[derive(Clone, Debug, Default)]
pub struct MemoryCluster {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryCluster {
    /// Creates an empty cluster. No host is reachable until an account is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the account served at `host`.
    ///
    /// With `credentials == None` the account accepts any caller for reads and writes.
    /// Otherwise callers presenting the credentials may write, and anonymous callers may read
    /// only when `public_read` is set.
    pub fn add_account(&self, host: &str, credentials: Option<Credentials>, public_read: bool) {
        self.accounts.write().insert(
            host.to_owned(),
            Account {
                credentials,
                public_read,
                databases: HashMap::new(),
            },
        );
    }

    /// Creates a database without going through a connection.
    pub fn create_database(&self, host: &str, db: &str) -> Result<(), StoreError> {
        self.with_account_mut(host, |account| create_database(account, db))
    }

    /// Writes documents without going through a connection.
    ///
    /// Each value must be a JSON object.
    pub fn insert_documents(
        &self,
        host: &str,
        db: &str,
        docs: impl IntoIterator<Item = JsonValue>,
    ) -> Result<Vec<DocResult>, StoreError> {
        let docs = docs
            .into_iter()
            .map(|doc| match doc {
                JsonValue::Object(map) => Ok(map),
                other => Err(StoreError::InvalidDocument(format!(
                    "expected a JSON object, got `{other}`"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.with_account_mut(host, |account| database_mut(account, db)?.apply(docs))
    }

    /// Returns every current document of a database, ordered by id.
    pub fn documents(&self, host: &str, db: &str) -> Result<Vec<Document>, StoreError> {
        self.with_account(host, |account| {
            Ok(database(account, db)?.docs.values().cloned().collect())
        })
    }

    fn with_account<R>(
        &self,
        host: &str,
        f: impl FnOnce(&Account) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_owned()))?;
        f(account)
    }

    fn with_account_mut<R>(
        &self,
        host: &str,
        f: impl FnOnce(&mut Account) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(host)
            .ok_or_else(|| StoreError::UnknownHost(host.to_owned()))?;
        f(account)
    }
}

fn database<'a>(account: &'a Account, db: &str) -> Result<&'a Database, StoreError> {
    account
        .databases
        .get(db)
        .ok_or_else(|| StoreError::DatabaseNotFound(db.to_owned()))
}

fn database_mut<'a>(account: &'a mut Account, db: &str) -> Result<&'a mut Database, StoreError> {
    account
        .databases
        .get_mut(db)
        .ok_or_else(|| StoreError::DatabaseNotFound(db.to_owned()))
}

fn create_database(account: &mut Account, db: &str) -> Result<(), StoreError> {
    validate_database_name(db)?;
    if account.databases.contains_key(db) {
        return Err(StoreError::DatabaseExists(db.to_owned()));
    }
    account.databases.insert(db.to_owned(), Database::default());
    Ok(())
}

impl Connector for MemoryCluster {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let writable = self.with_account(&endpoint.host, |account| {
            match (&account.credentials, &endpoint.credentials) {
                (None, _) => Ok(true),
                (Some(expected), Some(given)) if expected == given => Ok(true),
                (Some(_), None) if account.public_read => Ok(false),
                _ => Err(StoreError::Unauthorized {
                    host: endpoint.host.clone(),
                }),
            }
        })?;
        debug!(url = %endpoint.url(), writable, "connected to in-process account");
        Ok(Arc::new(MemoryStore {
            cluster: self.clone(),
            host: endpoint.host.clone(),
            writable,
        }))
    }
}

/// A connection to one [`MemoryCluster`] account.
#[derive(Debug)]
pub struct MemoryStore {
    cluster: MemoryCluster,
    host: String,
    writable: bool,
}

impl MemoryStore {
    fn check_writable(&self) -> Result<(), StoreError> {
        if self.writable {
            Ok(())
        } else {
            Err(StoreError::ReadOnly {
                host: self.host.clone(),
            })
        }
    }
}

impl DocumentStore for MemoryStore {
    fn host(&self) -> &str {
        &self.host
    }

    fn database_exists(&self, db: &str) -> Result<bool, StoreError> {
        self.cluster
            .with_account(&self.host, |account| Ok(account.databases.contains_key(db)))
    }

    fn create_database(&self, db: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.cluster
            .with_account_mut(&self.host, |account| create_database(account, db))
    }

    fn all_docs(&self, db: &str) -> Result<Vec<Document>, StoreError> {
        self.cluster.documents(&self.host, db)
    }

    fn changes(&self, db: &str, request: &ChangesRequest) -> Result<ChangesPage, StoreError> {
        self.cluster
            .with_account(&self.host, |account| Ok(database(account, db)?.changes(request)))
    }

    fn bulk_docs(
        &self,
        db: &str,
        docs: Vec<Map<String, JsonValue>>,
    ) -> Result<Vec<DocResult>, StoreError> {
        self.check_writable()?;
        let count = docs.len();
        let results = self
            .cluster
            .with_account_mut(&self.host, |account| database_mut(account, db)?.apply(docs))?;
        debug!(db, count, "bulk write applied");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::Selector;

    const HOST: &str = "acme.example.com";

    fn cluster() -> MemoryCluster {
        let cluster = MemoryCluster::new();
        cluster.add_account(HOST, Some(Credentials::new("acme", "pw")), true);
        cluster.create_database(HOST, "sales").unwrap();
        cluster
    }

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn connect_checks_host_and_credentials() {
        let cluster = cluster();
        assert_eq!(
            cluster.connect(&Endpoint::new("nowhere")).unwrap_err(),
            StoreError::UnknownHost("nowhere".into())
        );
        let bad = Endpoint::new(HOST).with_credentials(Credentials::new("acme", "nope"));
        assert!(matches!(
            cluster.connect(&bad),
            Err(StoreError::Unauthorized { .. })
        ));

        let anonymous = cluster.connect(&Endpoint::new(HOST)).unwrap();
        assert!(anonymous.database_exists("sales").unwrap());
        assert!(matches!(
            anonymous.bulk_docs("sales", vec![object(json!({"a": 1}))]),
            Err(StoreError::ReadOnly { .. })
        ));
    }

    #[test]
    fn private_accounts_reject_anonymous_reads() {
        let cluster = MemoryCluster::new();
        cluster.add_account(HOST, Some(Credentials::new("acme", "pw")), false);
        assert!(matches!(
            cluster.connect(&Endpoint::new(HOST)),
            Err(StoreError::Unauthorized { .. })
        ));
    }

    #[test]
    fn batches_are_all_or_nothing() {
        let cluster = cluster();
        cluster
            .insert_documents(HOST, "sales", [json!({"_id": "a", "amount": 1})])
            .unwrap();
        let err = cluster
            .insert_documents(
                HOST,
                "sales",
                [json!({"_id": "b", "amount": 2}), json!({"_id": "a", "amount": 3})],
            )
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict { id: "a".into() });
        let ids: Vec<_> = cluster
            .documents(HOST, "sales")
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a".to_owned()]);
    }

    #[test]
    fn updates_need_the_current_revision() {
        let cluster = cluster();
        let first = cluster
            .insert_documents(HOST, "sales", [json!({"_id": "a", "amount": 1})])
            .unwrap();
        let rev = first[0].rev.clone();
        assert!(rev.starts_with("1-"));
        let second = cluster
            .insert_documents(HOST, "sales", [json!({"_id": "a", "_rev": rev, "amount": 2})])
            .unwrap();
        assert!(second[0].rev.starts_with("2-"));
        assert!(
            cluster
                .insert_documents(HOST, "sales", [json!({"_id": "a", "_rev": "1-x"})])
                .is_err()
        );
    }

    #[test]
    fn change_feed_shows_latest_change_per_document() {
        let cluster = cluster();
        let written = cluster
            .insert_documents(
                HOST,
                "sales",
                [
                    json!({"_id": "a", "rep": "Ben"}),
                    json!({"_id": "b", "rep": "Ann"}),
                    json!({"_id": "c", "rep": "Ben"}),
                ],
            )
            .unwrap();
        cluster
            .insert_documents(
                HOST,
                "sales",
                [
                    json!({"_id": "a", "_rev": written[0].rev, "rep": "Ann"}),
                    json!({"_id": "b", "_rev": written[1].rev, "_deleted": true}),
                ],
            )
            .unwrap();

        let store = cluster.connect(&Endpoint::new(HOST)).unwrap();
        let page = store
            .changes(
                "sales",
                &ChangesRequest {
                    since: 0,
                    limit: 2,
                    selector: None,
                },
            )
            .unwrap();
        let ids: Vec<_> = page.results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(page.pending, 1);

        let rest = store
            .changes(
                "sales",
                &ChangesRequest {
                    since: page.last_seq,
                    limit: 2,
                    selector: None,
                },
            )
            .unwrap();
        assert_eq!(rest.results.len(), 1);
        assert!(rest.results[0].deleted);

        let selected = store
            .changes(
                "sales",
                &ChangesRequest {
                    since: 0,
                    limit: 0,
                    selector: Some(Selector::parse(&json!({"rep": "Ben"})).unwrap()),
                },
            )
            .unwrap();
        let ids: Vec<_> = selected.results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn database_names_are_validated() {
        let cluster = cluster();
        assert!(matches!(
            cluster.create_database(HOST, "Sales"),
            Err(StoreError::InvalidDatabaseName(_))
        ));
        assert_eq!(
            cluster.create_database(HOST, "sales"),
            Err(StoreError::DatabaseExists("sales".into()))
        );
    }

    #[test]
    fn special_members_are_rejected() {
        let cluster = cluster();
        assert!(matches!(
            cluster.insert_documents(HOST, "sales", [json!({"_attachments": {}})]),
            Err(StoreError::InvalidDocument(_))
        ));
        assert!(matches!(
            cluster.insert_documents(HOST, "sales", [json!(3)]),
            Err(StoreError::InvalidDocument(_))
        ));
    }
}
