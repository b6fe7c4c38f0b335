// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row transforms and lazy tables.
//!
//! This crate provides:
//! - a scalar expression IR ([`Expr`]) evaluated with SQL null semantics,
//! - a small transform IR ([`Transform`]) chained into a [`Program`], and
//! - [`LazyTable`], a materialized source paired with a pending program.
//!
//! Column references are positional. Callers resolve names against a schema before building
//! expressions.

mod expr;
mod frame;
mod program;
mod transform;

#[cfg(test)]
mod proptests;

pub use expr::{ArithmeticOp, CompareOp, Expr, like_match};
pub use frame::LazyTable;
pub use program::{Program, Rows, TransformError};
pub use transform::{AggregateField, AggregateOp, NamedExpr, SortKey, SortOrder, Transform};
