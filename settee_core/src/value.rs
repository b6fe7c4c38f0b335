// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell values.
//!
//! A [`Value`] is a single cell of a [`crate::Table`]. Values are typed by the schema column
//! they live in; the value itself carries just enough shape to evaluate expressions and to be
//! rendered in previews.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use serde_json::Value as JsonValue;

use crate::schema::DataType;

/// A single cell value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Missing or SQL `NULL`.
    #[default]
    Null,
    /// Boolean.
    Boolean(bool),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Array of values sharing an element type.
    Array(Vec<Self>),
    /// Struct values, aligned with the fields of the column's struct type.
    Struct(Vec<Self>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Long(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a boolean if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// SQL comparison.
    ///
    /// Returns `None` when either side is null or the two values are not comparable.
    /// Longs and doubles compare numerically.
    pub fn sql_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Long(a), Self::Long(b)) => Some(a.cmp(b)),
            (Self::Long(_) | Self::Double(_), Self::Long(_) | Self::Double(_)) => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Array(a), Self::Array(b)) | (Self::Struct(a), Self::Struct(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.sql_cmp(y)? {
                        Ordering::Equal => {}
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Nulls sort first; values of different kinds are ordered by kind after numbers.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Long(_), Self::Double(_)) | (Self::Double(_), Self::Long(_)) => {
                let (a, b) = (self.as_f64().unwrap_or(0.0), other.as_f64().unwrap_or(0.0));
                a.total_cmp(&b)
            }
            (Self::Array(a), Self::Array(b)) | (Self::Struct(a), Self::Struct(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.sort_cmp(y) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self
                .sql_cmp(other)
                .unwrap_or_else(|| self.kind_rank().cmp(&other.kind_rank())),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Long(_) | Self::Double(_) => 2,
            Self::String(_) => 3,
            Self::Array(_) => 4,
            Self::Struct(_) => 5,
        }
    }

    /// Converts a JSON value into a cell of the given type.
    ///
    /// Numbers widen to doubles where required; anything stored in a string column that is
    /// not a string keeps its compact JSON text. Values that cannot be represented in the
    /// target type become null.
    pub fn from_json(json: &JsonValue, data_type: &DataType) -> Self {
        match (data_type, json) {
            (_, JsonValue::Null) | (DataType::Null, _) => Self::Null,
            (DataType::Boolean, JsonValue::Bool(b)) => Self::Boolean(*b),
            (DataType::Long, JsonValue::Number(n)) => n.as_i64().map_or(Self::Null, Self::Long),
            (DataType::Double, JsonValue::Number(n)) => n.as_f64().map_or(Self::Null, Self::Double),
            (DataType::String, JsonValue::String(s)) => Self::String(s.clone()),
            (DataType::String, other) => Self::String(other.to_string()),
            (DataType::Array(element), JsonValue::Array(items)) => {
                Self::Array(items.iter().map(|v| Self::from_json(v, element)).collect())
            }
            (DataType::Struct(schema), JsonValue::Object(map)) => Self::Struct(
                schema
                    .fields()
                    .iter()
                    .map(|f| {
                        map.get(&f.name)
                            .map_or(Self::Null, |v| Self::from_json(v, &f.data_type))
                    })
                    .collect(),
            ),
            _ => Self::Null,
        }
    }

    /// Converts this cell back into JSON, using `data_type` for struct field names.
    pub fn to_json(&self, data_type: &DataType) -> JsonValue {
        match (self, data_type) {
            (Self::Null, _) => JsonValue::Null,
            (Self::Boolean(b), _) => JsonValue::Bool(*b),
            (Self::Long(v), _) => JsonValue::from(*v),
            (Self::Double(v), _) => serde_json::Number::from_f64(*v)
                .map_or(JsonValue::Null, JsonValue::Number),
            (Self::String(s), _) => JsonValue::String(s.clone()),
            (Self::Array(items), DataType::Array(element)) => {
                JsonValue::Array(items.iter().map(|v| v.to_json(element)).collect())
            }
            (Self::Array(items), _) => {
                JsonValue::Array(items.iter().map(|v| v.to_json(&DataType::String)).collect())
            }
            (Self::Struct(values), DataType::Struct(schema)) => {
                let mut map = serde_json::Map::new();
                for (field, value) in schema.fields().iter().zip(values) {
                    if !value.is_null() {
                        map.insert(field.name.clone(), value.to_json(&field.data_type));
                    }
                }
                JsonValue::Object(map)
            }
            (Self::Struct(values), _) => {
                JsonValue::Array(values.iter().map(|v| v.to_json(&DataType::String)).collect())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) | (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

// Grouping treats every NaN as one key and -0.0 as 0.0.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Boolean(b) => b.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Double(v) => canonical_bits(*v).hash(state),
            Self::String(s) => s.hash(state),
            Self::Array(items) | Self::Struct(items) => items.hash(state),
        }
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Double(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::String(s) => f.write_str(s),
            Self::Array(items) => write_list(f, '[', items, ']'),
            Self::Struct(items) => write_list(f, '{', items, '}'),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: char, items: &[Value], close: char) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_compare_across_long_and_double() {
        assert_eq!(
            Value::Long(3).sql_cmp(&Value::Double(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Long(3).sql_cmp(&Value::Null), None);
        assert_eq!(Value::from("a").sql_cmp(&Value::Long(1)), None);
    }

    #[test]
    fn sort_cmp_puts_nulls_first() {
        let mut values = vec![Value::Long(2), Value::Null, Value::Double(1.5)];
        values.sort_by(Value::sort_cmp);
        assert_eq!(values, vec![Value::Null, Value::Double(1.5), Value::Long(2)]);
    }

    #[test]
    fn display_matches_preview_conventions() {
        assert_eq!(Value::Double(5000.0).to_string(), "5000.0");
        assert_eq!(Value::Double(12.25).to_string(), "12.25");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::Array(vec![Value::from("a"), Value::from("b")]).to_string(),
            "[a, b]"
        );
    }

    #[test]
    fn from_json_conforms_to_column_type() {
        assert_eq!(Value::from_json(&json!(7), &DataType::Double), Value::Double(7.0));
        assert_eq!(Value::from_json(&json!(7.5), &DataType::Long), Value::Null);
        assert_eq!(
            Value::from_json(&json!({"a": 1}), &DataType::String),
            Value::from(r#"{"a":1}"#)
        );
        assert_eq!(Value::from_json(&json!("x"), &DataType::Boolean), Value::Null);
    }

    #[test]
    fn nan_and_negative_zero_group_together() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_eq!(Value::Double(-0.0), Value::Double(0.0));
    }
}
