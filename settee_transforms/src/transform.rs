// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform IR types.

use settee_core::{DataType, Field, Schema};

use crate::Expr;

/// Aggregation operation for [`Transform::Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Count rows, or non-null inputs when an input is given.
    Count,
    /// Sum values (skips nulls and non-numeric values).
    Sum,
    /// Minimum value (skips nulls).
    Min,
    /// Maximum value (skips nulls).
    Max,
    /// Mean value (skips nulls and non-numeric values).
    Mean,
}

impl AggregateOp {
    /// Looks up an operation by its SQL function name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "count" => Self::Count,
            "sum" => Self::Sum,
            "min" => Self::Min,
            "max" => Self::Max,
            "avg" | "mean" => Self::Mean,
            _ => return None,
        })
    }

    /// Result type for an input of type `input`.
    pub fn output_type(self, input: &DataType) -> DataType {
        match self {
            Self::Count => DataType::Long,
            Self::Sum if *input == DataType::Long => DataType::Long,
            Self::Sum | Self::Mean => DataType::Double,
            Self::Min | Self::Max => input.clone(),
        }
    }
}

/// A single aggregated output field.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateField {
    /// Operation to apply.
    pub op: AggregateOp,
    /// Input expression; `None` counts rows (`COUNT(*)`).
    pub input: Option<Expr>,
    /// Output column name.
    pub name: String,
}

/// Sorting order for [`Transform::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Key expression.
    pub expr: Expr,
    /// Sort order.
    pub order: SortOrder,
    /// Place nulls before non-null values.
    pub nulls_first: bool,
}

impl SortKey {
    /// Creates a key with the default null placement: first when ascending, last when
    /// descending.
    pub fn new(expr: Expr, order: SortOrder) -> Self {
        Self {
            expr,
            order,
            nulls_first: order == SortOrder::Asc,
        }
    }
}

/// An expression with an output column name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpr {
    /// Expression to evaluate.
    pub expr: Expr,
    /// Output column name.
    pub name: String,
}

impl NamedExpr {
    /// Creates a named expression.
    pub fn new(expr: Expr, name: impl Into<String>) -> Self {
        Self {
            expr,
            name: name.into(),
        }
    }
}

/// A row-stream operator.
///
/// Transforms are chained in a [`Program`](crate::Program); each one consumes the rows
/// produced by the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Keep only rows for which the predicate is `true`.
    Filter {
        /// Predicate to apply per row.
        predicate: Expr,
    },
    /// Compute a new set of columns.
    Project {
        /// Output columns, in order.
        columns: Vec<NamedExpr>,
    },
    /// Reorder rows. The sort is stable.
    Sort {
        /// Keys, most significant first.
        keys: Vec<SortKey>,
    },
    /// Group rows and compute aggregates.
    ///
    /// Output columns are `group_by` (in order) followed by the `fields` outputs (in order).
    /// Groups appear in the order their first row was seen. With no `group_by` keys the
    /// output is exactly one row, even for empty input.
    Aggregate {
        /// Group-by key expressions.
        group_by: Vec<NamedExpr>,
        /// Aggregated fields.
        fields: Vec<AggregateField>,
    },
    /// Keep at most `count` rows.
    Limit {
        /// Maximum row count.
        count: usize,
    },
}

impl Transform {
    /// Schema of the rows this transform produces from rows of `input`.
    pub fn output_schema(&self, input: &Schema) -> Schema {
        match self {
            Self::Filter { .. } | Self::Sort { .. } | Self::Limit { .. } => input.clone(),
            Self::Project { columns } => Schema::new(
                columns
                    .iter()
                    .map(|c| Field::new(c.name.clone(), c.expr.data_type(input), true))
                    .collect(),
            ),
            Self::Aggregate { group_by, fields } => {
                let keys = group_by
                    .iter()
                    .map(|c| Field::new(c.name.clone(), c.expr.data_type(input), true));
                let aggregates = fields.iter().map(|f| {
                    let in_type = f
                        .input
                        .as_ref()
                        .map_or(DataType::Long, |e| e.data_type(input));
                    Field::new(
                        f.name.clone(),
                        f.op.output_type(&in_type),
                        f.op != AggregateOp::Count,
                    )
                });
                Schema::new(keys.chain(aggregates).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Schema {
        Schema::new(vec![
            Field::new("_id", DataType::String, true),
            Field::new("amount", DataType::Long, true),
            Field::new("month", DataType::String, true),
        ])
    }

    #[test]
    fn aggregate_output_types() {
        let t = Transform::Aggregate {
            group_by: vec![NamedExpr::new(Expr::col(2), "month")],
            fields: vec![
                AggregateField {
                    op: AggregateOp::Sum,
                    input: Some(Expr::col(1)),
                    name: "sum(amount)".into(),
                },
                AggregateField {
                    op: AggregateOp::Mean,
                    input: Some(Expr::col(1)),
                    name: "avg(amount)".into(),
                },
                AggregateField {
                    op: AggregateOp::Count,
                    input: None,
                    name: "count(1)".into(),
                },
            ],
        };
        let out = t.output_schema(&sales());
        let types: Vec<_> = out.fields().iter().map(|f| f.data_type.clone()).collect();
        assert_eq!(
            types,
            vec![
                DataType::String,
                DataType::Long,
                DataType::Double,
                DataType::Long
            ]
        );
        assert!(!out.fields()[3].nullable);
    }

    #[test]
    fn default_null_placement_follows_order() {
        assert!(SortKey::new(Expr::col(0), SortOrder::Asc).nulls_first);
        assert!(!SortKey::new(Expr::col(0), SortOrder::Desc).nulls_first);
    }

    #[test]
    fn aggregate_names_are_case_insensitive() {
        assert_eq!(AggregateOp::from_name("SUM"), Some(AggregateOp::Sum));
        assert_eq!(AggregateOp::from_name("avg"), Some(AggregateOp::Mean));
        assert_eq!(AggregateOp::from_name("median"), None);
    }
}
