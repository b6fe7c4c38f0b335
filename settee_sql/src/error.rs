// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use settee_transforms::TransformError;
use sqlparser::parser::ParserError;

/// Errors raised while planning a query or predicate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SqlError {
    /// The text is not valid SQL.
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),
    /// No view is registered under the name.
    #[error("table or view not found: `{0}`")]
    UnknownTable(String),
    /// A column reference does not resolve against the input schema.
    #[error("cannot resolve column `{name}` given input columns: [{available}]")]
    UnknownColumn {
        /// Name as written.
        name: String,
        /// Comma-separated input column names.
        available: String,
    },
    /// A column is used outside an aggregate without appearing in `GROUP BY`.
    #[error("`{0}` is neither present in the GROUP BY nor wrapped in an aggregate function")]
    NotGrouped(String),
    /// The query uses a construct this planner does not lower.
    #[error("unsupported query construct: {0}")]
    Unsupported(String),
    /// `LIMIT` is not a non-negative integer literal.
    #[error("invalid LIMIT `{0}`")]
    InvalidLimit(String),
    /// The lowered program failed validation.
    #[error(transparent)]
    Transform(#[from] TransformError),
}
