// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SQL over lazy tables.
//!
//! Queries are parsed with `sqlparser` and lowered to a [`settee_transforms::Program`]
//! appended to the view's [`LazyTable`](settee_transforms::LazyTable). Planning resolves every
//! name up front, so a bad column or view is reported before any row is read.
//!
//! Supported: a single-view `SELECT` with `WHERE`, `GROUP BY`, `HAVING`, `ORDER BY`, and
//! `LIMIT`, over comparisons, boolean logic, arithmetic, `IS NULL`, `IN`, `BETWEEN`, `LIKE`,
//! and the `COUNT`/`SUM`/`MIN`/`MAX`/`AVG` aggregates.

mod catalog;
mod error;
mod plan;

pub use catalog::Catalog;
pub use error::SqlError;
pub use plan::{parse_predicate, plan_query};
