// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use settee_core::DataType;
use settee_sql::SqlError;
use settee_store::StoreError;
use settee_transforms::TransformError;

use crate::ConfigError;

/// Result type alias for pipeline operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The failure classes a caller can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad options, unreachable hosts, rejected credentials.
    Connection,
    /// A load or query could not be completed.
    LoadOrQuery,
    /// A write could not be completed.
    Write,
}

/// Errors raised by the pipeline.
///
/// Nothing is retried; each variant carries the underlying diagnostic.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The option set is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The connector refused the endpoint.
    #[error("cannot connect to `{host}`: {source}")]
    Connection {
        /// Host the session tried to open.
        host: String,
        /// Store diagnostic.
        source: StoreError,
    },

    /// A collection could not be read.
    #[error("cannot load `{database}`: {source}")]
    Load {
        /// Collection name.
        database: String,
        /// Store diagnostic.
        source: StoreError,
    },

    /// A query, predicate, or projection could not be planned.
    #[error("query error: {0}")]
    Query(#[from] SqlError),

    /// A column cannot be plotted as a value.
    #[error("column `{column}` has type {data_type} and cannot be plotted as a value")]
    NotNumeric {
        /// Column name.
        column: String,
        /// Its type.
        data_type: DataType,
    },

    /// A collection could not be written.
    #[error("cannot write `{database}`: {source}")]
    Write {
        /// Collection name.
        database: String,
        /// Store diagnostic.
        source: StoreError,
    },
}

impl Error {
    /// Returns the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Connection { .. } => ErrorKind::Connection,
            Self::Load { .. } | Self::Query(_) | Self::NotNumeric { .. } => {
                ErrorKind::LoadOrQuery
            }
            Self::Write { .. } => ErrorKind::Write,
        }
    }

    pub(crate) fn load(database: &str) -> impl FnOnce(StoreError) -> Self + '_ {
        move |source| Self::Load {
            database: database.to_owned(),
            source,
        }
    }

    pub(crate) fn write(database: &str) -> impl FnOnce(StoreError) -> Self + '_ {
        move |source| Self::Write {
            database: database.to_owned(),
            source,
        }
    }
}

impl From<TransformError> for Error {
    fn from(err: TransformError) -> Self {
        Self::Query(SqlError::Transform(err))
    }
}
