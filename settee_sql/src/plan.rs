// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering SQL text to transform programs.
//!
//! A `SELECT` lowers to a fixed pipeline over the view's lazy table:
//!
//! ```text
//! WHERE -> GROUP BY/aggregates -> HAVING -> ORDER BY -> LIMIT -> select list
//! ```
//!
//! Sorting happens before the final projection so that `ORDER BY` may reference columns or
//! aggregates that are not selected.

use settee_core::{Schema, Value};
use settee_transforms::{
    AggregateField, AggregateOp, ArithmeticOp, CompareOp, Expr, LazyTable, NamedExpr, SortKey,
    SortOrder, Transform,
};
use sqlparser::ast::{
    BinaryOperator, DuplicateTreatment, Expr as SqlExpr, FunctionArg, FunctionArgExpr,
    FunctionArguments, GroupByExpr, Ident, OrderByExpr, Query, SelectItem, SetExpr, Statement,
    TableFactor, UnaryOperator, Value as SqlValue,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::Token;
use tracing::debug;

use crate::{Catalog, SqlError};

/// Plans a `SELECT` over the views in `catalog`.
///
/// Every name is resolved here; the returned table has not evaluated any rows.
pub fn plan_query(sql: &str, catalog: &Catalog) -> Result<LazyTable, SqlError> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    let [Statement::Query(query)] = statements.as_slice() else {
        return Err(SqlError::Unsupported(if statements.len() == 1 {
            "statements other than SELECT".into()
        } else {
            format!("{} statements in one query", statements.len())
        }));
    };
    let table = plan_select(query, catalog)?;
    debug!(
        sql,
        transforms = table.program().transforms().len(),
        columns = table.schema().len(),
        "planned query"
    );
    Ok(table)
}

/// Parses a boolean predicate and resolves it against `schema`.
pub fn parse_predicate(text: &str, schema: &Schema) -> Result<Expr, SqlError> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect).try_with_sql(text)?;
    let expr = parser.parse_expr()?;
    if parser.peek_token().token != Token::EOF {
        return Err(SqlError::Unsupported(format!(
            "trailing input after predicate `{expr}`"
        )));
    }
    Lowering::rows(schema).lower(&expr)
}

fn unsupported<T>(what: impl Into<String>) -> Result<T, SqlError> {
    Err(SqlError::Unsupported(what.into()))
}

fn plan_select(query: &Query, catalog: &Catalog) -> Result<LazyTable, SqlError> {
    if query.with.is_some() {
        return unsupported("WITH clauses");
    }
    if query.offset.is_some() || query.fetch.is_some() {
        return unsupported("OFFSET/FETCH");
    }
    let SetExpr::Select(select) = query.body.as_ref() else {
        return unsupported("set operations and nested queries");
    };
    if select.distinct.is_some() {
        return unsupported("SELECT DISTINCT");
    }
    let [from] = select.from.as_slice() else {
        return unsupported(if select.from.is_empty() {
            "SELECT without FROM"
        } else {
            "multiple FROM relations"
        });
    };
    if !from.joins.is_empty() {
        return unsupported("joins");
    }
    let TableFactor::Table { name, .. } = &from.relation else {
        return unsupported("derived tables");
    };
    let view = name.to_string();
    let mut table = catalog
        .lookup(&view)
        .ok_or_else(|| SqlError::UnknownTable(view.clone()))?;
    let input = table.schema().clone();

    if let Some(selection) = &select.selection {
        let predicate = Lowering::rows(&input).lower(selection)?;
        table = table.then(Transform::Filter { predicate })?;
    }

    let group_exprs = match &select.group_by {
        GroupByExpr::Expressions(exprs, modifiers) if modifiers.is_empty() => exprs.as_slice(),
        GroupByExpr::Expressions(..) => return unsupported("GROUP BY modifiers"),
        GroupByExpr::All(..) => return unsupported("GROUP BY ALL"),
    };
    let order_by: &[OrderByExpr] = query
        .order_by
        .as_ref()
        .map_or(&[][..], |o| o.exprs.as_slice());
    let aggregating = !group_exprs.is_empty()
        || select.having.is_some()
        || select.projection.iter().any(|item| match item {
            SelectItem::UnnamedExpr(e) | SelectItem::ExprWithAlias { expr: e, .. } => {
                contains_aggregate(e)
            }
            _ => false,
        })
        || order_by.iter().any(|o| contains_aggregate(&o.expr));

    let (outputs, sort_keys) = if aggregating {
        let mut groups = Groups::default();
        for e in group_exprs {
            let e = resolve_group_alias(e, &select.projection, &input)?;
            let expr = Lowering::rows(&input).lower(e)?;
            if !groups.keys.iter().any(|k| k.expr == expr) {
                groups
                    .keys
                    .push(NamedExpr::new(expr, display_name(e, &input)));
            }
        }
        let mut lowering = Lowering {
            input: &input,
            groups: Some(&mut groups),
            aliases: Vec::new(),
        };
        let outputs = lowering.select_list(&select.projection)?;
        // HAVING and ORDER BY may name select aliases, which shadow input columns.
        lowering.aliases = outputs
            .iter()
            .filter(|out| out.aliased)
            .map(|out| (out.column.name.clone(), out.column.expr.clone()))
            .collect();
        let having = select
            .having
            .as_ref()
            .map(|h| lowering.lower(h))
            .transpose()?;
        let sort_keys = lowering.sort_keys(order_by, &outputs)?;
        table = table.then(Transform::Aggregate {
            group_by: groups.keys,
            fields: groups.aggregates,
        })?;
        if let Some(predicate) = having {
            table = table.then(Transform::Filter { predicate })?;
        }
        (outputs, sort_keys)
    } else {
        let mut lowering = Lowering::rows(&input);
        let outputs = lowering.select_list(&select.projection)?;
        let sort_keys = lowering.sort_keys(order_by, &outputs)?;
        (outputs, sort_keys)
    };

    if !sort_keys.is_empty() {
        table = table.then(Transform::Sort { keys: sort_keys })?;
    }
    if let Some(limit) = &query.limit {
        table = table.then(Transform::Limit {
            count: parse_limit(limit)?,
        })?;
    }
    let columns = outputs.into_iter().map(|o| o.column).collect();
    Ok(table.then(Transform::Project { columns })?)
}

fn parse_limit(limit: &SqlExpr) -> Result<usize, SqlError> {
    match limit {
        SqlExpr::Value(SqlValue::Number(text, _)) => text
            .parse()
            .map_err(|_| SqlError::InvalidLimit(text.clone())),
        other => Err(SqlError::InvalidLimit(other.to_string())),
    }
}

/// `GROUP BY` may name a select alias or a select-list position.
fn resolve_group_alias<'q>(
    e: &'q SqlExpr,
    projection: &'q [SelectItem],
    input: &Schema,
) -> Result<&'q SqlExpr, SqlError> {
    match e {
        SqlExpr::Identifier(ident) if input.index_of(&ident.value).is_none() => {
            Ok(projection
                .iter()
                .find_map(|item| match item {
                    SelectItem::ExprWithAlias { expr, alias }
                        if alias.value.eq_ignore_ascii_case(&ident.value) =>
                    {
                        Some(expr)
                    }
                    _ => None,
                })
                .unwrap_or(e))
        }
        SqlExpr::Value(SqlValue::Number(text, _)) => {
            let item = text
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| projection.get(i));
            match item {
                Some(SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. }) => {
                    Ok(expr)
                }
                _ => unsupported(format!("GROUP BY position {text}")),
            }
        }
        _ => Ok(e),
    }
}

/// Output column name for an unaliased select item.
fn display_name(e: &SqlExpr, input: &Schema) -> String {
    let column = match e {
        SqlExpr::Identifier(ident) => Some(ident),
        SqlExpr::CompoundIdentifier(parts) => parts.last(),
        _ => None,
    };
    column
        .and_then(|ident| input.index_of(&ident.value))
        .and_then(|i| input.field(i))
        .map_or_else(|| e.to_string(), |f| f.name.clone())
}

fn contains_aggregate(e: &SqlExpr) -> bool {
    match e {
        SqlExpr::Function(f) => AggregateOp::from_name(&f.name.to_string()).is_some(),
        SqlExpr::BinaryOp { left, right, .. } => contains_aggregate(left) || contains_aggregate(right),
        SqlExpr::UnaryOp { expr, .. }
        | SqlExpr::Nested(expr)
        | SqlExpr::IsNull(expr)
        | SqlExpr::IsNotNull(expr)
        | SqlExpr::Like { expr, .. } => contains_aggregate(expr),
        SqlExpr::InList { expr, list, .. } => {
            contains_aggregate(expr) || list.iter().any(contains_aggregate)
        }
        SqlExpr::Between {
            expr, low, high, ..
        } => contains_aggregate(expr) || contains_aggregate(low) || contains_aggregate(high),
        _ => false,
    }
}

/// A call to an aggregate function: its operation and argument (`None` for `*`).
fn aggregate_call(e: &SqlExpr) -> Result<Option<(AggregateOp, Option<&SqlExpr>)>, SqlError> {
    let SqlExpr::Function(f) = e else {
        return Ok(None);
    };
    let Some(op) = AggregateOp::from_name(&f.name.to_string()) else {
        return Ok(None);
    };
    if f.over.is_some() {
        return unsupported("window functions");
    }
    if f.filter.is_some() {
        return unsupported("aggregate FILTER clauses");
    }
    let FunctionArguments::List(list) = &f.args else {
        return unsupported(format!("`{e}` without exactly one argument"));
    };
    if list.duplicate_treatment == Some(DuplicateTreatment::Distinct) {
        return unsupported("DISTINCT aggregates");
    }
    let [arg] = list.args.as_slice() else {
        return unsupported(format!("`{e}` without exactly one argument"));
    };
    match arg {
        FunctionArg::Unnamed(FunctionArgExpr::Wildcard) if op == AggregateOp::Count => {
            Ok(Some((op, None)))
        }
        FunctionArg::Unnamed(FunctionArgExpr::Expr(inner)) if contains_aggregate(inner) => {
            unsupported("nested aggregate functions")
        }
        FunctionArg::Unnamed(FunctionArgExpr::Expr(inner)) => Ok(Some((op, Some(inner)))),
        _ => unsupported(format!("argument of `{e}`")),
    }
}

/// Grouping keys and aggregates collected while lowering an aggregate query.
#[derive(Debug, Default)]
struct Groups {
    keys: Vec<NamedExpr>,
    aggregates: Vec<AggregateField>,
}

impl Groups {
    fn aggregate(&mut self, op: AggregateOp, input: Option<Expr>, name: String) -> Expr {
        let index = match self
            .aggregates
            .iter()
            .position(|a| a.op == op && a.input == input)
        {
            Some(index) => index,
            None => {
                self.aggregates.push(AggregateField { op, input, name });
                self.aggregates.len() - 1
            }
        };
        Expr::col(self.keys.len() + index)
    }
}

/// A lowered select-list item.
#[derive(Debug)]
struct Output {
    column: NamedExpr,
    aliased: bool,
}

/// Lowers SQL expressions against a scope.
///
/// Without groups, column references resolve against the input rows. With groups, the result
/// refers to the aggregate's output row: grouped expressions become key columns, aggregate calls
/// are registered and become aggregate columns, and any other column reference is an error.
struct Lowering<'s, 'g> {
    input: &'s Schema,
    groups: Option<&'g mut Groups>,
    /// Aliased select items visible by name, already lowered.
    aliases: Vec<(String, Expr)>,
}

impl<'s> Lowering<'s, '_> {
    fn rows(input: &'s Schema) -> Self {
        Self {
            input,
            groups: None,
            aliases: Vec::new(),
        }
    }

    fn lower(&mut self, e: &SqlExpr) -> Result<Expr, SqlError> {
        if let SqlExpr::Identifier(ident) = e
            && let Some((_, expr)) = self
                .aliases
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&ident.value))
        {
            return Ok(expr.clone());
        }
        if let Some(groups) = self.groups.as_deref_mut() {
            if let Some((op, arg)) = aggregate_call(e)? {
                let input = arg.map(|a| Lowering::rows(self.input).lower(a)).transpose()?;
                return Ok(groups.aggregate(op, input, e.to_string()));
            }
            if !contains_aggregate(e)
                && let Ok(expr) = Lowering::rows(self.input).lower(e)
                && let Some(i) = groups.keys.iter().position(|k| k.expr == expr)
            {
                return Ok(Expr::col(i));
            }
        }
        Ok(match e {
            // Double quotes delimit strings, as in Spark SQL, unless they name a column.
            SqlExpr::Identifier(ident)
                if ident.quote_style == Some('"') && self.input.index_of(&ident.value).is_none() =>
            {
                Expr::Literal(Value::String(ident.value.clone()))
            }
            SqlExpr::Identifier(ident) => self.column(ident)?,
            SqlExpr::CompoundIdentifier(parts) => match parts.last() {
                Some(ident) => self.column(ident)?,
                None => return unsupported("empty identifier"),
            },
            SqlExpr::Value(v) => Expr::Literal(literal(v)?),
            SqlExpr::Nested(inner) => self.lower(inner)?,
            SqlExpr::BinaryOp { left, op, right } => {
                let (l, r) = (self.lower(left)?, self.lower(right)?);
                binary(op, l, r)?
            }
            SqlExpr::UnaryOp { op, expr } => {
                let inner = self.lower(expr)?;
                match op {
                    UnaryOperator::Not => Expr::Not(Box::new(inner)),
                    UnaryOperator::Minus => Expr::Negate(Box::new(inner)),
                    UnaryOperator::Plus => inner,
                    other => return unsupported(format!("operator `{other}`")),
                }
            }
            SqlExpr::IsNull(inner) | SqlExpr::IsNotNull(inner) => Expr::IsNull {
                expr: Box::new(self.lower(inner)?),
                negated: matches!(e, SqlExpr::IsNotNull(_)),
            },
            SqlExpr::InList {
                expr,
                list,
                negated,
            } => Expr::InList {
                expr: Box::new(self.lower(expr)?),
                list: list
                    .iter()
                    .map(|item| self.lower(item))
                    .collect::<Result<_, _>>()?,
                negated: *negated,
            },
            SqlExpr::Between {
                expr,
                negated,
                low,
                high,
            } => Expr::Between {
                expr: Box::new(self.lower(expr)?),
                low: Box::new(self.lower(low)?),
                high: Box::new(self.lower(high)?),
                negated: *negated,
            },
            SqlExpr::Like {
                negated,
                expr,
                pattern,
                escape_char: None,
                ..
            } => {
                let SqlExpr::Value(SqlValue::SingleQuotedString(pattern)) = pattern.as_ref() else {
                    return unsupported("LIKE with a non-literal pattern");
                };
                Expr::Like {
                    expr: Box::new(self.lower(expr)?),
                    pattern: pattern.clone(),
                    negated: *negated,
                }
            }
            SqlExpr::Function(f) if AggregateOp::from_name(&f.name.to_string()).is_some() => {
                return unsupported(format!("aggregate `{e}` in a row-level expression"));
            }
            SqlExpr::Function(f) => return unsupported(format!("function `{}`", f.name)),
            other => return unsupported(format!("expression `{other}`")),
        })
    }

    fn column(&self, ident: &Ident) -> Result<Expr, SqlError> {
        let Some(index) = self.input.index_of(&ident.value) else {
            return Err(SqlError::UnknownColumn {
                name: ident.value.clone(),
                available: self.input.names().collect::<Vec<_>>().join(", "),
            });
        };
        if self.groups.is_some() {
            return Err(SqlError::NotGrouped(ident.value.clone()));
        }
        Ok(Expr::col(index))
    }

    fn select_list(&mut self, projection: &[SelectItem]) -> Result<Vec<Output>, SqlError> {
        let mut outputs = Vec::with_capacity(projection.len());
        for item in projection {
            match item {
                SelectItem::UnnamedExpr(e) => outputs.push(Output {
                    column: NamedExpr::new(self.lower(e)?, display_name(e, self.input)),
                    aliased: false,
                }),
                SelectItem::ExprWithAlias { expr, alias } => outputs.push(Output {
                    column: NamedExpr::new(self.lower(expr)?, alias.value.clone()),
                    aliased: true,
                }),
                SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => {
                    if self.groups.is_some() {
                        return unsupported("`*` in an aggregate query");
                    }
                    outputs.extend(self.input.fields().iter().enumerate().map(|(i, f)| {
                        Output {
                            column: NamedExpr::new(Expr::col(i), f.name.clone()),
                            aliased: false,
                        }
                    }));
                }
            }
        }
        Ok(outputs)
    }

    fn sort_keys(
        &mut self,
        order_by: &[OrderByExpr],
        outputs: &[Output],
    ) -> Result<Vec<SortKey>, SqlError> {
        order_by
            .iter()
            .map(|o| {
                let expr = match &o.expr {
                    SqlExpr::Value(SqlValue::Number(text, _)) => text
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| outputs.get(i))
                        .map(|out| out.column.expr.clone())
                        .ok_or_else(|| {
                            SqlError::Unsupported(format!(
                                "ORDER BY position {text} is not in the select list"
                            ))
                        })?,
                    SqlExpr::Identifier(ident) => match outputs.iter().find(|out| {
                        out.aliased && out.column.name.eq_ignore_ascii_case(&ident.value)
                    }) {
                        Some(out) => out.column.expr.clone(),
                        None => self.lower(&o.expr)?,
                    },
                    other => self.lower(other)?,
                };
                let order = if o.asc == Some(false) {
                    SortOrder::Desc
                } else {
                    SortOrder::Asc
                };
                let mut key = SortKey::new(expr, order);
                if let Some(nulls_first) = o.nulls_first {
                    key.nulls_first = nulls_first;
                }
                Ok(key)
            })
            .collect()
    }
}

fn literal(v: &SqlValue) -> Result<Value, SqlError> {
    match v {
        SqlValue::Number(text, _) => text
            .parse::<i64>()
            .map(Value::Long)
            .or_else(|_| text.parse::<f64>().map(Value::Double))
            .map_err(|_| SqlError::Unsupported(format!("numeric literal `{text}`"))),
        SqlValue::SingleQuotedString(s) => Ok(Value::String(s.clone())),
        SqlValue::Boolean(b) => Ok(Value::Boolean(*b)),
        SqlValue::Null => Ok(Value::Null),
        other => unsupported(format!("literal `{other}`")),
    }
}

fn binary(op: &BinaryOperator, left: Expr, right: Expr) -> Result<Expr, SqlError> {
    let arithmetic = match op {
        BinaryOperator::Plus => Some(ArithmeticOp::Add),
        BinaryOperator::Minus => Some(ArithmeticOp::Subtract),
        BinaryOperator::Multiply => Some(ArithmeticOp::Multiply),
        BinaryOperator::Divide => Some(ArithmeticOp::Divide),
        BinaryOperator::Modulo => Some(ArithmeticOp::Modulo),
        _ => None,
    };
    if let Some(op) = arithmetic {
        return Ok(Expr::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        });
    }
    let compare = match op {
        BinaryOperator::Eq => CompareOp::Eq,
        BinaryOperator::NotEq => CompareOp::Ne,
        BinaryOperator::Lt => CompareOp::Lt,
        BinaryOperator::LtEq => CompareOp::Le,
        BinaryOperator::Gt => CompareOp::Gt,
        BinaryOperator::GtEq => CompareOp::Ge,
        BinaryOperator::And => return Ok(left.and(right)),
        BinaryOperator::Or => return Ok(Expr::Or(Box::new(left), Box::new(right))),
        other => return unsupported(format!("operator `{other}`")),
    };
    Ok(left.compare(compare, right))
}
