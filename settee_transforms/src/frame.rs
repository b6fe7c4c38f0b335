// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily evaluated tables.

use std::sync::Arc;

use settee_core::{Row, Schema, Table};

use crate::{Program, Transform, TransformError};

/// A materialized source plus a pending [`Program`].
///
/// Nothing is computed until rows are requested. Every request replays the program over the
/// source, so repeated actions on the same table return identical results.
#[derive(Debug, Clone)]
pub struct LazyTable {
    source: Arc<Table>,
    program: Program,
    schema: Arc<Schema>,
}

impl LazyTable {
    /// Wraps a materialized table with an empty program.
    pub fn scan(source: impl Into<Arc<Table>>) -> Self {
        let source = source.into();
        let schema = source.schema().clone();
        Self {
            source,
            program: Program::new(),
            schema,
        }
    }

    /// Returns a new table with `transform` appended to the program.
    pub fn then(&self, transform: Transform) -> Result<Self, TransformError> {
        let mut program = self.program.clone();
        program.push(transform);
        let schema = program.validate(self.source.schema())?;
        Ok(Self {
            source: self.source.clone(),
            program,
            schema: Arc::new(schema),
        })
    }

    /// Output schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Pending program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Source table.
    pub fn source(&self) -> &Arc<Table> {
        &self.source
    }

    /// Streams output rows.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.program.stream(
            self.source.schema(),
            Box::new(self.source.rows().iter().cloned()),
        )
    }

    /// Counts output rows.
    pub fn count(&self) -> usize {
        if self.program.is_empty() {
            return self.source.row_count();
        }
        self.rows().count()
    }

    /// Returns up to `n` rows and whether more rows exist.
    pub fn head(&self, n: usize) -> (Vec<Row>, bool) {
        let mut rows = self.rows();
        let head: Vec<Row> = rows.by_ref().take(n).collect();
        let has_more = rows.next().is_some();
        (head, has_more)
    }

    /// Computes every output row.
    pub fn collect(&self) -> Vec<Row> {
        self.rows().collect()
    }

    /// Computes the output into a new source with an empty program.
    pub fn materialize(&self) -> Self {
        if self.program.is_empty() {
            return self.clone();
        }
        Self::scan(Table::new(self.schema.clone(), self.collect()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use settee_core::{DataType, Field, Value};

    use super::*;
    use crate::{CompareOp, Expr, NamedExpr, SortKey, SortOrder};

    fn numbers(n: i64) -> LazyTable {
        let schema = Schema::new(vec![Field::new("n", DataType::Long, false)]);
        let rows = (0..n).map(|i| Row::new(vec![Value::Long(i)])).collect();
        LazyTable::scan(Table::new(schema, rows))
    }

    #[test]
    fn head_reports_remaining_rows() {
        let t = numbers(5);
        let (rows, more) = t.head(3);
        assert_eq!(rows.len(), 3);
        assert!(more);
        let (rows, more) = t.head(5);
        assert_eq!(rows.len(), 5);
        assert!(!more);
    }

    #[test]
    fn transforms_are_deferred_and_repeatable() {
        let t = numbers(10)
            .then(Transform::Filter {
                predicate: Expr::col(0).compare(CompareOp::Ge, Expr::lit(4_i64)),
            })
            .unwrap()
            .then(Transform::Sort {
                keys: vec![SortKey::new(Expr::col(0), SortOrder::Desc)],
            })
            .unwrap();
        assert_eq!(t.count(), 6);
        assert_eq!(t.collect(), t.collect());
        assert_eq!(t.collect()[0], Row::new(vec![Value::Long(9)]));
        assert_eq!(t.source().row_count(), 10);
    }

    #[test]
    fn then_rejects_out_of_range_columns() {
        let err = numbers(1)
            .then(Transform::Project {
                columns: vec![NamedExpr::new(Expr::col(3), "x")],
            })
            .unwrap_err();
        assert_eq!(err, TransformError::ColumnOutOfRange { index: 3, width: 1 });
    }

    #[test]
    fn materialize_resets_the_program() {
        let t = numbers(4)
            .then(Transform::Limit { count: 2 })
            .unwrap()
            .materialize();
        assert!(t.program().is_empty());
        assert_eq!(t.count(), 2);
    }
}
