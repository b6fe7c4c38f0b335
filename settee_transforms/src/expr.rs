// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar expression IR.
//!
//! Expressions reference input columns by position; name resolution happens upstream when a
//! query or predicate is planned against a schema. Evaluation never fails: operations on
//! incompatible values produce null, and predicates use three-valued logic.

use core::cmp::Ordering;

use settee_core::{DataType, Row, Schema, Value};

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Lt => ord == Ordering::Less,
            Self::Le => ord != Ordering::Greater,
            Self::Gt => ord == Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
        }
    }
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/` (always produces a double)
    Divide,
    /// `%`
    Modulo,
}

/// A scalar expression over one input row.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Input column by position.
    Column(usize),
    /// Constant.
    Literal(Value),
    /// Binary comparison.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Binary arithmetic.
    Arithmetic {
        /// Operator.
        op: ArithmeticOp,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Logical conjunction.
    And(Box<Self>, Box<Self>),
    /// Logical disjunction.
    Or(Box<Self>, Box<Self>),
    /// Logical negation.
    Not(Box<Self>),
    /// Numeric negation.
    Negate(Box<Self>),
    /// `IS NULL` / `IS NOT NULL`.
    IsNull {
        /// Tested expression.
        expr: Box<Self>,
        /// `IS NOT NULL` when set.
        negated: bool,
    },
    /// `[NOT] IN (...)`.
    InList {
        /// Tested expression.
        expr: Box<Self>,
        /// Candidate values.
        list: Vec<Self>,
        /// `NOT IN` when set.
        negated: bool,
    },
    /// `[NOT] BETWEEN low AND high` (inclusive).
    Between {
        /// Tested expression.
        expr: Box<Self>,
        /// Lower bound.
        low: Box<Self>,
        /// Upper bound.
        high: Box<Self>,
        /// `NOT BETWEEN` when set.
        negated: bool,
    },
    /// `[NOT] LIKE pattern` with `%` and `_` wildcards.
    Like {
        /// Tested expression.
        expr: Box<Self>,
        /// Pattern text.
        pattern: String,
        /// `NOT LIKE` when set.
        negated: bool,
    },
}

impl Expr {
    /// Column reference.
    pub fn col(index: usize) -> Self {
        Self::Column(index)
    }

    /// Constant.
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// `self = other`.
    pub fn equals(self, other: Self) -> Self {
        self.compare(CompareOp::Eq, other)
    }

    /// `self <op> other`.
    pub fn compare(self, op: CompareOp, other: Self) -> Self {
        Self::Compare {
            op,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// `self AND other`.
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Evaluates the expression against a row.
    pub fn eval(&self, row: &Row) -> Value {
        match self {
            Self::Column(i) => row.get(*i).clone(),
            Self::Literal(v) => v.clone(),
            Self::Compare { op, left, right } => {
                match left.eval(row).sql_cmp(&right.eval(row)) {
                    Some(ord) => Value::Boolean(op.holds(ord)),
                    None => Value::Null,
                }
            }
            Self::Arithmetic { op, left, right } => arithmetic(*op, &left.eval(row), &right.eval(row)),
            Self::And(a, b) => match (truth(&a.eval(row)), truth(&b.eval(row))) {
                (Some(false), _) | (_, Some(false)) => Value::Boolean(false),
                (Some(true), Some(true)) => Value::Boolean(true),
                _ => Value::Null,
            },
            Self::Or(a, b) => match (truth(&a.eval(row)), truth(&b.eval(row))) {
                (Some(true), _) | (_, Some(true)) => Value::Boolean(true),
                (Some(false), Some(false)) => Value::Boolean(false),
                _ => Value::Null,
            },
            Self::Not(e) => truth(&e.eval(row)).map_or(Value::Null, |b| Value::Boolean(!b)),
            Self::Negate(e) => match e.eval(row) {
                Value::Long(v) => Value::Long(v.wrapping_neg()),
                Value::Double(v) => Value::Double(-v),
                _ => Value::Null,
            },
            Self::IsNull { expr, negated } => Value::Boolean(expr.eval(row).is_null() != *negated),
            Self::InList {
                expr,
                list,
                negated,
            } => {
                let needle = expr.eval(row);
                if needle.is_null() {
                    return Value::Null;
                }
                let mut saw_null = false;
                for candidate in list {
                    match needle.sql_cmp(&candidate.eval(row)) {
                        Some(Ordering::Equal) => return Value::Boolean(!*negated),
                        Some(_) => {}
                        None => saw_null = true,
                    }
                }
                if saw_null {
                    Value::Null
                } else {
                    Value::Boolean(*negated)
                }
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let v = expr.eval(row);
                let lower = v.sql_cmp(&low.eval(row)).map(|o| o != Ordering::Less);
                let upper = v.sql_cmp(&high.eval(row)).map(|o| o != Ordering::Greater);
                match (lower, upper) {
                    (Some(false), _) | (_, Some(false)) => Value::Boolean(*negated),
                    (Some(true), Some(true)) => Value::Boolean(!*negated),
                    _ => Value::Null,
                }
            }
            Self::Like {
                expr,
                pattern,
                negated,
            } => match expr.eval(row) {
                Value::String(s) => Value::Boolean(like_match(&s, pattern) != *negated),
                _ => Value::Null,
            },
        }
    }

    /// Returns `true` only when the expression evaluates to boolean `true`.
    pub fn matches(&self, row: &Row) -> bool {
        matches!(self.eval(row), Value::Boolean(true))
    }

    /// Returns the result type of the expression over `input`.
    pub fn data_type(&self, input: &Schema) -> DataType {
        match self {
            Self::Column(i) => input
                .field(*i)
                .map_or(DataType::Null, |f| f.data_type.clone()),
            Self::Literal(v) => literal_type(v),
            Self::Arithmetic { op, left, right } => {
                let (l, r) = (left.data_type(input), right.data_type(input));
                match op {
                    ArithmeticOp::Divide => DataType::Double,
                    _ if l == DataType::Long && r == DataType::Long => DataType::Long,
                    _ => DataType::Double,
                }
            }
            Self::Negate(e) => e.data_type(input),
            Self::Compare { .. }
            | Self::And(..)
            | Self::Or(..)
            | Self::Not(_)
            | Self::IsNull { .. }
            | Self::InList { .. }
            | Self::Between { .. }
            | Self::Like { .. } => DataType::Boolean,
        }
    }

    /// Returns the highest column position referenced, if any.
    pub fn max_column(&self) -> Option<usize> {
        let mut max = None;
        self.visit_columns(&mut |i| max = Some(max.map_or(i, |m: usize| m.max(i))));
        max
    }

    fn visit_columns(&self, f: &mut impl FnMut(usize)) {
        match self {
            Self::Column(i) => f(*i),
            Self::Literal(_) => {}
            Self::Compare { left, right, .. }
            | Self::Arithmetic { left, right, .. }
            | Self::And(left, right)
            | Self::Or(left, right) => {
                left.visit_columns(f);
                right.visit_columns(f);
            }
            Self::Not(e) | Self::Negate(e) | Self::IsNull { expr: e, .. } | Self::Like { expr: e, .. } => {
                e.visit_columns(f);
            }
            Self::InList { expr, list, .. } => {
                expr.visit_columns(f);
                for e in list {
                    e.visit_columns(f);
                }
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.visit_columns(f);
                low.visit_columns(f);
                high.visit_columns(f);
            }
        }
    }
}

fn truth(value: &Value) -> Option<bool> {
    value.as_bool()
}

fn literal_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Boolean(_) => DataType::Boolean,
        Value::Long(_) => DataType::Long,
        Value::Double(_) => DataType::Double,
        Value::String(_) => DataType::String,
        Value::Array(items) => DataType::Array(Box::new(
            items.first().map_or(DataType::String, literal_type),
        )),
        Value::Struct(_) => DataType::String,
    }
}

fn arithmetic(op: ArithmeticOp, a: &Value, b: &Value) -> Value {
    if let (Value::Long(x), Value::Long(y)) = (a, b) {
        return match op {
            ArithmeticOp::Add => Value::Long(x.wrapping_add(*y)),
            ArithmeticOp::Subtract => Value::Long(x.wrapping_sub(*y)),
            ArithmeticOp::Multiply => Value::Long(x.wrapping_mul(*y)),
            ArithmeticOp::Divide if *y == 0 => Value::Null,
            ArithmeticOp::Divide => Value::Double(*x as f64 / *y as f64),
            ArithmeticOp::Modulo => x.checked_rem(*y).map_or(Value::Null, Value::Long),
        };
    }
    let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
        return Value::Null;
    };
    match op {
        ArithmeticOp::Add => Value::Double(x + y),
        ArithmeticOp::Subtract => Value::Double(x - y),
        ArithmeticOp::Multiply => Value::Double(x * y),
        ArithmeticOp::Divide | ArithmeticOp::Modulo if y == 0.0 => Value::Null,
        ArithmeticOp::Divide => Value::Double(x / y),
        ArithmeticOp::Modulo => Value::Double(x % y),
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
pub fn like_match(text: &str, pattern: &str) -> bool {
    let t: Vec<char> = text.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    let (mut ti, mut pi) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && p[pi] == '%' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && (p[pi] == '_' || p[pi] == t[ti]) {
            ti += 1;
            pi += 1;
        } else if let Some((star, matched)) = backtrack {
            pi = star + 1;
            ti = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '%')
}
