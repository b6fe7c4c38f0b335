// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load document collections into lazy tables, query them with SQL, chart and export them.
//!
//! The pipeline runs in stages, each consuming the previous stage's output:
//!
//! 1. [`Session::builder`] validates options and opens the account through a
//!    [`Connector`](settee_store::Connector).
//! 2. [`Session::read`] loads a collection into a [`DataFrame`], either from a snapshot or by
//!    replaying the change feed, and infers its schema.
//! 3. [`DataFrame::print_schema`], [`DataFrame::count`], and [`DataFrame::show`] inspect it.
//! 4. [`DataFrame::create_or_replace_temp_view`] and [`Session::sql`] run aggregate queries.
//! 5. [`DataFrame::to_plot_buffer`] feeds a result into
//!    [`HBarChartSpec`](settee_charts::HBarChartSpec).
//! 6. [`DataFrame::filter`], [`DataFrame::select`], and [`DataFrame::write`] export a subset.
//!
//! ```
//! use settee::{Session, config};
//! use settee_store::MemoryCluster;
//! use serde_json::json;
//!
//! let cluster = MemoryCluster::new();
//! cluster.add_account("examples.cloudant.com", None, true);
//! cluster.create_database("examples.cloudant.com", "spark_sales")?;
//! cluster.insert_documents(
//!     "examples.cloudant.com",
//!     "spark_sales",
//!     [json!({"rep": "Ben", "month": "May", "amount": 30})],
//! )?;
//!
//! let session = Session::builder()
//!     .config(config::HOST, "examples.cloudant.com")
//!     .connector(cluster)
//!     .connect()?;
//! let sales = session.read().load("spark_sales")?;
//! assert_eq!(sales.count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
mod dataframe;
mod error;
mod reader;
mod session;
mod writer;


pub use config::{ConfigError, ConnectorOptions, LoadMode, Options};
pub use dataframe::DataFrame;
pub use error::{Error, ErrorKind, Result};
pub use reader::{DataFrameReader, LoadReport};
pub use session::{Session, SessionBuilder};
pub use writer::{DataFrameWriter, WriteSummary};
