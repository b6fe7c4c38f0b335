// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data model for settee datasets.
//!
//! This crate provides:
//! - [`Value`] cells and the [`DataType`]/[`Schema`] type system,
//! - schema inference over JSON documents ([`SchemaInference`]),
//! - [`Row`] and materialized [`Table`] containers, and
//! - text previews of rows ([`format_rows`]).
//!
//! Nothing here performs I/O; loading and evaluation live in downstream crates.

mod format;
mod infer;
mod schema;
mod table;
mod value;

pub use format::{DEFAULT_PREVIEW_ROWS, DEFAULT_TRUNCATE, format_rows};
pub use infer::{ID_FIELD, SchemaInference, infer_schema, infer_type, merge_types};
pub use schema::{DataType, Field, Schema};
pub use table::{Row, Table};
pub use value::Value;
