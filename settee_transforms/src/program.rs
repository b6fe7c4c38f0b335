// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform program execution.
//!
//! A [`Program`] is a linear chain of [`Transform`]s. Execution is pull-based: filters,
//! projections, and limits stream row by row, while sorts and aggregates buffer their input
//! the first time a row is requested from them.

use core::cmp::Ordering;
use core::iter;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use settee_core::{DataType, Row, Schema, Value};
use smallvec::SmallVec;

use crate::{AggregateField, AggregateOp, Expr, NamedExpr, SortKey, SortOrder, Transform};

/// A boxed row stream.
pub type Rows<'a> = Box<dyn Iterator<Item = Row> + 'a>;

type GroupKey = SmallVec<[Value; 2]>;

/// Errors raised while validating a program against its input schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// An expression referenced a column the input does not have.
    #[error("column {index} is out of range for an input with {width} columns")]
    ColumnOutOfRange {
        /// Referenced column position.
        index: usize,
        /// Number of input columns.
        width: usize,
    },
    /// A non-count aggregate was declared without an input expression.
    #[error("aggregate `{name}` needs an input expression")]
    MissingAggregateInput {
        /// Output column name of the aggregate.
        name: String,
    },
}

/// An ordered chain of transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    transforms: Vec<Transform>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Returns the transforms in execution order.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Returns `true` if the program has no transforms.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Schema of the program's output for rows of `input`.
    pub fn output_schema(&self, input: &Schema) -> Schema {
        self.transforms
            .iter()
            .fold(input.clone(), |schema, t| t.output_schema(&schema))
    }

    /// Checks every column reference against the schema it will see and returns the output
    /// schema.
    pub fn validate(&self, input: &Schema) -> Result<Schema, TransformError> {
        let mut schema = input.clone();
        for t in &self.transforms {
            validate_transform(t, &schema)?;
            schema = t.output_schema(&schema);
        }
        Ok(schema)
    }

    /// Lazily runs the program over `rows`, which must match `input`.
    pub fn stream<'a>(&'a self, input: &Schema, rows: Rows<'a>) -> Rows<'a> {
        let mut schema = input.clone();
        let mut rows = rows;
        for t in &self.transforms {
            rows = match t {
                Transform::Filter { predicate } => {
                    Box::new(rows.filter(move |row| predicate.matches(row)))
                }
                Transform::Project { columns } => {
                    Box::new(rows.map(move |row| project(columns, &row)))
                }
                Transform::Limit { count } => Box::new(rows.take(*count)),
                Transform::Sort { keys } => deferred(rows, move |rows| sort(keys, rows)),
                Transform::Aggregate { group_by, fields } => {
                    let long_sums = fields
                        .iter()
                        .map(|f| {
                            f.op == AggregateOp::Sum
                                && f.input.as_ref().map(|e| e.data_type(&schema))
                                    == Some(DataType::Long)
                        })
                        .collect::<Vec<_>>();
                    deferred(rows, move |rows| aggregate(group_by, fields, &long_sums, rows))
                }
            };
            schema = t.output_schema(&schema);
        }
        rows
    }

    /// Runs the program to completion.
    pub fn execute(&self, input: &Schema, rows: Vec<Row>) -> Vec<Row> {
        self.stream(input, Box::new(rows.into_iter())).collect()
    }
}

fn validate_transform(t: &Transform, input: &Schema) -> Result<(), TransformError> {
    let width = input.len();
    let check = |e: &Expr| match e.max_column() {
        Some(index) if index >= width => Err(TransformError::ColumnOutOfRange { index, width }),
        _ => Ok(()),
    };
    match t {
        Transform::Filter { predicate } => check(predicate),
        Transform::Project { columns } => columns.iter().try_for_each(|c| check(&c.expr)),
        Transform::Sort { keys } => keys.iter().try_for_each(|k| check(&k.expr)),
        Transform::Limit { .. } => Ok(()),
        Transform::Aggregate { group_by, fields } => {
            group_by.iter().try_for_each(|c| check(&c.expr))?;
            fields.iter().try_for_each(|f| match &f.input {
                Some(e) => check(e),
                None if f.op == AggregateOp::Count => Ok(()),
                None => Err(TransformError::MissingAggregateInput {
                    name: f.name.clone(),
                }),
            })
        }
    }
}

/// Defers a blocking stage until its first row is pulled.
fn deferred<'a>(rows: Rows<'a>, run: impl FnOnce(Rows<'a>) -> Vec<Row> + 'a) -> Rows<'a> {
    let mut pending = Some((rows, run));
    let mut output = Vec::new().into_iter();
    Box::new(iter::from_fn(move || {
        if let Some((rows, run)) = pending.take() {
            output = run(rows).into_iter();
        }
        output.next()
    }))
}

fn project(columns: &[NamedExpr], row: &Row) -> Row {
    Row::new(columns.iter().map(|c| c.expr.eval(row)).collect())
}

fn sort(keys: &[SortKey], rows: Rows<'_>) -> Vec<Row> {
    let mut keyed: Vec<(GroupKey, Row)> = rows
        .map(|row| (keys.iter().map(|k| k.expr.eval(&row)).collect(), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(keys, a, b));
    keyed.into_iter().map(|(_, row)| row).collect()
}

fn compare_keys(keys: &[SortKey], a: &[Value], b: &[Value]) -> Ordering {
    for (key, (x, y)) in keys.iter().zip(a.iter().zip(b)) {
        let ord = match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if key.nulls_first => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, true) if key.nulls_first => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match key.order {
                SortOrder::Asc => x.sort_cmp(y),
                SortOrder::Desc => y.sort_cmp(x),
            },
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[derive(Debug)]
enum Accumulator {
    Count(i64),
    Sum {
        long: i64,
        double: f64,
        seen: bool,
        long_output: bool,
    },
    Min(Value),
    Max(Value),
    Mean {
        sum: f64,
        n: u64,
    },
}

impl Accumulator {
    fn new(op: AggregateOp, long_output: bool) -> Self {
        match op {
            AggregateOp::Count => Self::Count(0),
            AggregateOp::Sum => Self::Sum {
                long: 0,
                double: 0.0,
                seen: false,
                long_output,
            },
            AggregateOp::Min => Self::Min(Value::Null),
            AggregateOp::Max => Self::Max(Value::Null),
            AggregateOp::Mean => Self::Mean { sum: 0.0, n: 0 },
        }
    }

    fn update(&mut self, value: Option<Value>) {
        match self {
            Self::Count(n) => {
                if value.is_none_or(|v| !v.is_null()) {
                    *n += 1;
                }
            }
            Self::Sum {
                long, double, seen, ..
            } => match value {
                Some(Value::Long(v)) => {
                    *long = long.wrapping_add(v);
                    *double += v as f64;
                    *seen = true;
                }
                Some(Value::Double(v)) => {
                    *double += v;
                    *seen = true;
                }
                _ => {}
            },
            Self::Min(current) => {
                if let Some(v) = value.filter(|v| !v.is_null())
                    && (current.is_null() || v.sort_cmp(current) == Ordering::Less)
                {
                    *current = v;
                }
            }
            Self::Max(current) => {
                if let Some(v) = value.filter(|v| !v.is_null())
                    && (current.is_null() || v.sort_cmp(current) == Ordering::Greater)
                {
                    *current = v;
                }
            }
            Self::Mean { sum, n } => {
                if let Some(v) = value.as_ref().and_then(Value::as_f64) {
                    *sum += v;
                    *n += 1;
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Count(n) => Value::Long(n),
            Self::Sum { seen: false, .. } => Value::Null,
            Self::Sum {
                long,
                long_output: true,
                ..
            } => Value::Long(long),
            Self::Sum { double, .. } => Value::Double(double),
            Self::Min(v) | Self::Max(v) => v,
            Self::Mean { n: 0, .. } => Value::Null,
            Self::Mean { sum, n } => Value::Double(sum / n as f64),
        }
    }
}

struct Group {
    key: GroupKey,
    accumulators: Vec<Accumulator>,
}

fn aggregate(
    group_by: &[NamedExpr],
    fields: &[AggregateField],
    long_sums: &[bool],
    rows: Rows<'_>,
) -> Vec<Row> {
    let fresh = || -> Vec<Accumulator> {
        fields
            .iter()
            .zip(long_sums)
            .map(|(f, long)| Accumulator::new(f.op, *long))
            .collect()
    };
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for row in rows {
        let key: GroupKey = group_by.iter().map(|g| g.expr.eval(&row)).collect();
        let slot = match index.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let slot = groups.len();
                groups.push(Group {
                    key: e.key().clone(),
                    accumulators: fresh(),
                });
                e.insert(slot);
                slot
            }
        };
        for (acc, field) in groups[slot].accumulators.iter_mut().zip(fields) {
            acc.update(field.input.as_ref().map(|e| e.eval(&row)));
        }
    }
    if groups.is_empty() && group_by.is_empty() {
        groups.push(Group {
            key: GroupKey::new(),
            accumulators: fresh(),
        });
    }
    groups
        .into_iter()
        .map(|g| {
            let mut values: Vec<Value> = g.key.into_vec();
            values.extend(g.accumulators.into_iter().map(Accumulator::finish));
            Row::new(values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use settee_core::Field;

    use super::*;
    use crate::CompareOp;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("rep", DataType::String, true),
            Field::new("month", DataType::String, true),
            Field::new("amount", DataType::Long, true),
        ])
    }

    fn row(rep: &str, month: &str, amount: Option<i64>) -> Row {
        Row::new(vec![
            rep.into(),
            month.into(),
            amount.map_or(Value::Null, Value::Long),
        ])
    }

    fn sales() -> Vec<Row> {
        vec![
            row("Ann", "May", Some(10)),
            row("Ben", "June", Some(5)),
            row("Ann", "June", Some(7)),
            row("Cy", "May", None),
            row("Ben", "May", Some(3)),
        ]
    }

    fn sum_by_month() -> Transform {
        Transform::Aggregate {
            group_by: vec![NamedExpr::new(Expr::col(1), "month")],
            fields: vec![AggregateField {
                op: AggregateOp::Sum,
                input: Some(Expr::col(2)),
                name: "total".into(),
            }],
        }
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let mut p = Program::new();
        p.push(sum_by_month());
        let out = p.execute(&schema(), sales());
        assert_eq!(
            out,
            vec![
                Row::new(vec!["May".into(), Value::Long(13)]),
                Row::new(vec!["June".into(), Value::Long(12)]),
            ]
        );
    }

    #[test]
    fn global_aggregate_over_empty_input_yields_one_row() {
        let mut p = Program::new();
        p.push(Transform::Aggregate {
            group_by: vec![],
            fields: vec![
                AggregateField {
                    op: AggregateOp::Count,
                    input: None,
                    name: "n".into(),
                },
                AggregateField {
                    op: AggregateOp::Sum,
                    input: Some(Expr::col(2)),
                    name: "total".into(),
                },
            ],
        });
        let out = p.execute(&schema(), vec![]);
        assert_eq!(out, vec![Row::new(vec![Value::Long(0), Value::Null])]);
    }

    #[test]
    fn aggregates_skip_nulls() {
        let mut p = Program::new();
        p.push(Transform::Aggregate {
            group_by: vec![],
            fields: vec![
                AggregateField {
                    op: AggregateOp::Count,
                    input: Some(Expr::col(2)),
                    name: "n".into(),
                },
                AggregateField {
                    op: AggregateOp::Mean,
                    input: Some(Expr::col(2)),
                    name: "mean".into(),
                },
                AggregateField {
                    op: AggregateOp::Min,
                    input: Some(Expr::col(2)),
                    name: "min".into(),
                },
                AggregateField {
                    op: AggregateOp::Max,
                    input: Some(Expr::col(0)),
                    name: "max".into(),
                },
            ],
        });
        let out = p.execute(&schema(), sales());
        assert_eq!(
            out,
            vec![Row::new(vec![
                Value::Long(4),
                Value::Double(6.25),
                Value::Long(3),
                "Cy".into(),
            ])]
        );
    }

    #[test]
    fn sort_is_stable_and_places_nulls() {
        let mut p = Program::new();
        p.push(Transform::Sort {
            keys: vec![SortKey::new(Expr::col(2), SortOrder::Desc)],
        });
        let out = p.execute(&schema(), sales());
        let amounts: Vec<_> = out.iter().map(|r| r.get(2).clone()).collect();
        assert_eq!(
            amounts,
            vec![
                Value::Long(10),
                Value::Long(7),
                Value::Long(5),
                Value::Long(3),
                Value::Null
            ]
        );

        let mut p = Program::new();
        p.push(Transform::Sort {
            keys: vec![SortKey::new(Expr::col(1), SortOrder::Asc)],
        });
        let reps: Vec<_> = p
            .execute(&schema(), sales())
            .iter()
            .map(|r| r.get(0).to_string())
            .collect();
        assert_eq!(reps, vec!["Ben", "Ann", "Ann", "Cy", "Ben"]);
    }

    #[test]
    fn filter_project_limit_chain() {
        let mut p = Program::new();
        p.push(Transform::Filter {
            predicate: Expr::col(2).compare(CompareOp::Gt, Expr::lit(4_i64)),
        });
        p.push(Transform::Project {
            columns: vec![NamedExpr::new(Expr::col(0), "rep")],
        });
        p.push(Transform::Limit { count: 2 });
        let out = p.execute(&schema(), sales());
        assert_eq!(
            out,
            vec![Row::new(vec!["Ann".into()]), Row::new(vec!["Ben".into()])]
        );
        assert_eq!(p.output_schema(&schema()).names().collect::<Vec<_>>(), vec!["rep"]);
    }

    #[test]
    fn streaming_stages_stop_early() {
        let mut p = Program::new();
        p.push(Transform::Filter {
            predicate: Expr::col(0).compare(CompareOp::Ge, Expr::lit(0_i64)),
        });
        p.push(Transform::Limit { count: 3 });
        let input = Schema::new(vec![Field::new("n", DataType::Long, false)]);
        let endless = (0_i64..).map(|n| Row::new(vec![Value::Long(n)]));
        let out: Vec<_> = p.stream(&input, Box::new(endless)).collect();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn validate_reports_bad_references() {
        let mut p = Program::new();
        p.push(Transform::Project {
            columns: vec![NamedExpr::new(Expr::col(0), "rep")],
        });
        p.push(Transform::Filter {
            predicate: Expr::col(1).equals(Expr::lit("May")),
        });
        assert_eq!(
            p.validate(&schema()),
            Err(TransformError::ColumnOutOfRange { index: 1, width: 1 })
        );

        let mut p = Program::new();
        p.push(Transform::Aggregate {
            group_by: vec![],
            fields: vec![AggregateField {
                op: AggregateOp::Sum,
                input: None,
                name: "total".into(),
            }],
        });
        assert!(matches!(
            p.validate(&schema()),
            Err(TransformError::MissingAggregateInput { .. })
        ));
    }
}
