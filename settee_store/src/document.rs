// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Documents, change-feed entries, and connection endpoints.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::selector::Selector;

/// Prefix of design document ids. Design documents hold indexes and views, not data.
pub const DESIGN_PREFIX: &str = "_design/";

/// A stored JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Current revision.
    #[serde(rename = "_rev")]
    pub rev: String,
    /// Remaining fields.
    #[serde(flatten)]
    pub body: Map<String, JsonValue>,
}

impl Document {
    /// Returns `true` for design documents.
    pub fn is_design(&self) -> bool {
        self.id.starts_with(DESIGN_PREFIX)
    }

    /// Returns the body with `_id` added and `_rev` left out.
    pub fn to_record(&self) -> Map<String, JsonValue> {
        let mut record = self.body.clone();
        record.insert("_id".to_owned(), JsonValue::String(self.id.clone()));
        record
    }
}

/// One entry of a change feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Sequence number of this change.
    pub seq: u64,
    /// Id of the changed document.
    pub id: String,
    /// Whether the document was deleted.
    #[serde(default)]
    pub deleted: bool,
    /// The document as of this change; `None` for deletions.
    pub doc: Option<Document>,
}

/// Parameters of a change-feed read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangesRequest {
    /// Only changes after this sequence are returned (`0` reads from inception).
    pub since: u64,
    /// Maximum number of changes in the page.
    pub limit: usize,
    /// Optional document filter.
    pub selector: Option<Selector>,
}

/// One page of a change feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangesPage {
    /// Changes in sequence order.
    pub results: Vec<Change>,
    /// Sequence to resume from.
    pub last_seq: u64,
    /// Changes remaining after this page.
    pub pending: usize,
}

/// Outcome of one accepted document write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocResult {
    /// Document id.
    pub id: String,
    /// New revision.
    pub rev: String,
}

/// Account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Transport protocol of an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// TLS.
    #[default]
    Https,
    /// Plain text.
    Http,
}

impl Protocol {
    /// Returns the URL scheme.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Where and as whom to connect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Transport protocol.
    pub protocol: Protocol,
    /// Account host name.
    pub host: String,
    /// Optional credentials; anonymous when `None`.
    pub credentials: Option<Credentials>,
}

impl Endpoint {
    /// Creates an anonymous HTTPS endpoint.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            protocol: Protocol::Https,
            host: host.into(),
            credentials: None,
        }
    }

    /// Sets the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Returns the base URL of the endpoint.
    pub fn url(&self) -> String {
        format!("{}://{}", self.protocol.scheme(), self.host)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_serializes_with_reserved_fields() {
        let doc: Document = serde_json::from_value(json!({
            "_id": "a", "_rev": "1-x", "rep": "Ben"
        }))
        .unwrap();
        assert_eq!(doc.id, "a");
        assert_eq!(doc.body.get("rep"), Some(&json!("Ben")));
        assert_eq!(
            JsonValue::Object(doc.to_record()),
            json!({"_id": "a", "rep": "Ben"})
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let text = format!("{:?}", Credentials::new("me", "secret"));
        assert!(!text.contains("secret"), "{text}");
    }
}
