// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-feed selectors.
//!
//! A selector is a JSON object mapping field names to conditions. A bare value means
//! equality; an object holds operator/operand pairs:
//!
//! ```json
//! { "rep": "Charlotte", "amount": { "$gte": 100, "$lt": 500 } }
//! ```
//!
//! Supported operators: `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`.
//! All conditions must hold for a document to match.

use core::cmp::Ordering;

use serde_json::{Map, Value as JsonValue};

use crate::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Op {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "$eq" => Self::Eq,
            "$ne" => Self::Ne,
            "$gt" => Self::Gt,
            "$gte" => Self::Gte,
            "$lt" => Self::Lt,
            "$lte" => Self::Lte,
            "$in" => Self::In,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Condition {
    field: String,
    op: Op,
    operand: JsonValue,
}

/// A parsed document filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    conditions: Vec<Condition>,
}

impl Selector {
    /// Parses a selector from its JSON form.
    pub fn parse(value: &JsonValue) -> Result<Self, StoreError> {
        let JsonValue::Object(fields) = value else {
            return Err(StoreError::InvalidSelector(format!(
                "expected a JSON object, got `{value}`"
            )));
        };
        let mut conditions = Vec::new();
        for (field, spec) in fields {
            match spec {
                JsonValue::Object(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                    for (name, operand) in ops {
                        let op = Op::parse(name).ok_or_else(|| {
                            StoreError::InvalidSelector(format!("unsupported operator `{name}`"))
                        })?;
                        if op == Op::In && !operand.is_array() {
                            return Err(StoreError::InvalidSelector(format!(
                                "`$in` on `{field}` needs an array operand"
                            )));
                        }
                        conditions.push(Condition {
                            field: field.clone(),
                            op,
                            operand: operand.clone(),
                        });
                    }
                }
                other => conditions.push(Condition {
                    field: field.clone(),
                    op: Op::Eq,
                    operand: other.clone(),
                }),
            }
        }
        Ok(Self { conditions })
    }

    /// Parses a selector from JSON text.
    pub fn parse_str(text: &str) -> Result<Self, StoreError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| StoreError::InvalidSelector(e.to_string()))?;
        Self::parse(&value)
    }

    /// Returns `true` if the document satisfies every condition.
    pub fn matches(&self, document: &Map<String, JsonValue>) -> bool {
        self.conditions.iter().all(|c| {
            let Some(value) = document.get(&c.field) else {
                return false;
            };
            match c.op {
                Op::Eq => json_cmp(value, &c.operand) == Some(Ordering::Equal),
                Op::Ne => json_cmp(value, &c.operand) != Some(Ordering::Equal),
                Op::Gt => json_cmp(value, &c.operand) == Some(Ordering::Greater),
                Op::Gte => matches!(
                    json_cmp(value, &c.operand),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                Op::Lt => json_cmp(value, &c.operand) == Some(Ordering::Less),
                Op::Lte => matches!(
                    json_cmp(value, &c.operand),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                Op::In => c.operand.as_array().is_some_and(|items| {
                    items
                        .iter()
                        .any(|item| json_cmp(value, item) == Some(Ordering::Equal))
                }),
            }
        })
    }
}

fn json_cmp(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        (JsonValue::Null, JsonValue::Null) => Some(Ordering::Equal),
        (x, y) if x == y => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn bare_values_mean_equality() {
        let s = Selector::parse(&json!({"rep": "Charlotte", "month": "September"})).unwrap();
        assert!(s.matches(&doc(json!({"rep": "Charlotte", "month": "September", "amount": 3}))));
        assert!(!s.matches(&doc(json!({"rep": "Charlotte", "month": "May"}))));
        assert!(!s.matches(&doc(json!({"rep": "Charlotte"}))));
    }

    #[test]
    fn range_and_membership_operators() {
        let s = Selector::parse(&json!({
            "amount": {"$gte": 100, "$lt": 500},
            "rep": {"$in": ["Ben", "Dan"]}
        }))
        .unwrap();
        assert!(s.matches(&doc(json!({"amount": 100, "rep": "Dan"}))));
        assert!(s.matches(&doc(json!({"amount": 499.5, "rep": "Ben"}))));
        assert!(!s.matches(&doc(json!({"amount": 500, "rep": "Ben"}))));
        assert!(!s.matches(&doc(json!({"amount": 200, "rep": "Ann"}))));
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert!(Selector::parse(&json!(["rep"])).is_err());
        assert!(Selector::parse(&json!({"a": {"$regex": "x"}})).is_err());
        assert!(Selector::parse(&json!({"a": {"$in": 3}})).is_err());
        assert!(Selector::parse_str("{not json").is_err());
    }
}
