// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors reported by a document store or connector.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No account is reachable at the host.
    #[error("host `{0}` is unreachable")]
    UnknownHost(String),

    /// Credentials were missing or rejected.
    #[error("unauthorized: credentials rejected by `{host}`")]
    Unauthorized {
        /// Host that rejected the credentials.
        host: String,
    },

    /// The session may read but not write.
    #[error("forbidden: `{host}` granted read-only access")]
    ReadOnly {
        /// Host that granted read-only access.
        host: String,
    },

    /// The named database does not exist.
    #[error("database `{0}` does not exist")]
    DatabaseNotFound(String),

    /// The named database already exists.
    #[error("database `{0}` already exists")]
    DatabaseExists(String),

    /// The database name is not allowed.
    #[error("illegal database name `{0}`")]
    InvalidDatabaseName(String),

    /// A write collided with the current revision of a document.
    #[error("document update conflict for `{id}`")]
    Conflict {
        /// Document id.
        id: String,
    },

    /// A document could not be accepted.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A change-feed selector could not be parsed.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}
