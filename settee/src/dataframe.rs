// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data frames: lazy tables bound to a session.

use std::sync::Arc;

use settee_charts::PlotBuffer;
use settee_core::{DEFAULT_PREVIEW_ROWS, DEFAULT_TRUNCATE, Row, Schema, format_rows};
use settee_sql::{SqlError, parse_predicate};
use settee_transforms::{Expr, LazyTable, NamedExpr, Transform};
use tracing::debug;

use crate::{DataFrameWriter, Error, Result, Session};

/// A lazily evaluated table.
///
/// Transformations (`select`, `filter`, `limit`) return new frames and read nothing. Actions
/// (`count`, `show`, `collect`, `write`) evaluate the pending transforms against the loaded
/// source every time they run, unless the frame was [cached](DataFrame::cache).
#[derive(Clone, Debug)]
pub struct DataFrame {
    session: Session,
    table: LazyTable,
}

impl DataFrame {
    pub(crate) fn new(session: Session, table: LazyTable) -> Self {
        Self { session, table }
    }

    /// The session this frame belongs to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying lazy table.
    pub fn lazy_table(&self) -> &LazyTable {
        &self.table
    }

    /// Output schema. Fixed when the frame is created.
    pub fn schema(&self) -> &Arc<Schema> {
        self.table.schema()
    }

    /// The schema as an indented tree.
    pub fn schema_string(&self) -> String {
        self.schema().tree_string()
    }

    /// Prints [`DataFrame::schema_string`] to standard output.
    pub fn print_schema(&self) {
        print!("{}", self.schema_string());
    }

    /// Counts rows, evaluating every pending transform.
    pub fn count(&self) -> usize {
        self.table.count()
    }

    /// Renders the first `n` rows as a text grid. `truncate` limits cell width; `0` disables
    /// truncation.
    pub fn show_string(&self, n: usize, truncate: usize) -> String {
        let (rows, has_more) = self.table.head(n);
        format_rows(self.schema(), &rows, has_more, truncate)
    }

    /// Prints the first 20 rows.
    pub fn show(&self) {
        self.show_n(DEFAULT_PREVIEW_ROWS);
    }

    /// Prints the first `n` rows.
    pub fn show_n(&self, n: usize) {
        print!("{}", self.show_string(n, DEFAULT_TRUNCATE));
    }

    /// Keeps only the named columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Self> {
        let schema = self.schema();
        let columns = columns
            .iter()
            .map(|name| {
                let index = resolve(schema, name)?;
                let field = &schema.fields()[index];
                Ok(NamedExpr::new(Expr::col(index), field.name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.then(Transform::Project { columns })
    }

    /// Keeps rows for which the SQL predicate `condition` is true.
    ///
    /// Rows where the predicate is unknown (for example, comparisons with null) are dropped.
    pub fn filter(&self, condition: &str) -> Result<Self> {
        let predicate = parse_predicate(condition, self.schema())?;
        debug!(condition, "filter planned");
        self.then(Transform::Filter { predicate })
    }

    /// Keeps at most `n` rows.
    pub fn limit(&self, n: usize) -> Result<Self> {
        self.then(Transform::Limit { count: n })
    }

    /// Evaluates the pending transforms once and returns a frame over the result.
    pub fn cache(&self) -> Self {
        Self::new(self.session.clone(), self.table.materialize())
    }

    /// Registers this frame as a view for [`Session::sql`], replacing any view of that name.
    pub fn create_or_replace_temp_view(&self, name: &str) {
        let replaced = self.session.catalog().register(name, self.table.clone());
        debug!(view = name, replaced, "registered view");
    }

    /// Evaluates every row.
    pub fn collect(&self) -> Vec<Row> {
        self.table.collect()
    }

    /// Collects a label column and a numeric value column for charting.
    ///
    /// Labels use their preview text; null values plot as zero.
    pub fn to_plot_buffer(&self, label: &str, value: &str) -> Result<PlotBuffer> {
        let schema = self.schema();
        let label_index = resolve(schema, label)?;
        let value_index = resolve(schema, value)?;
        let value_field = &schema.fields()[value_index];
        if !value_field.data_type.is_numeric() {
            return Err(Error::NotNumeric {
                column: value_field.name.clone(),
                data_type: value_field.data_type.clone(),
            });
        }
        Ok(self
            .table
            .rows()
            .map(|row| {
                (
                    row.get(label_index).to_string(),
                    row.get(value_index).as_f64().unwrap_or(0.0),
                )
            })
            .collect())
    }

    /// Starts a write of this frame.
    pub fn write(&self) -> DataFrameWriter {
        DataFrameWriter::new(self.clone())
    }

    fn then(&self, transform: Transform) -> Result<Self> {
        Ok(Self::new(self.session.clone(), self.table.then(transform)?))
    }
}

fn resolve(schema: &Schema, name: &str) -> Result<usize> {
    schema.index_of(name).ok_or_else(|| {
        Error::Query(SqlError::UnknownColumn {
            name: name.to_owned(),
            available: schema.names().collect::<Vec<_>>().join(", "),
        })
    })
}
