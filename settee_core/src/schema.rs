// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column types and schemas.

use core::fmt;
use core::fmt::Write as _;

/// Semantic type of a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataType {
    /// Only observed `null` so far. Never survives a finished inference.
    Null,
    /// Boolean.
    Boolean,
    /// 64-bit signed integer.
    Long,
    /// 64-bit float.
    Double,
    /// UTF-8 string.
    String,
    /// Homogeneous array.
    Array(Box<Self>),
    /// Nested record.
    Struct(Schema),
}

impl DataType {
    /// Returns `true` for `long` and `double`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Long | Self::Double)
    }

    /// Short type name used in schema dumps.
    pub fn simple_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(element) => write!(f, "array<{element}>"),
            Self::Struct(schema) => {
                f.write_str("struct<")?;
                for (i, field) in schema.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", field.name, field.data_type)?;
                }
                f.write_str(">")
            }
            other => f.write_str(other.simple_name()),
        }
    }
}

/// A named, typed column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Column name as it appears in documents.
    pub name: String,
    /// Column type.
    pub data_type: DataType,
    /// Whether the column may hold nulls.
    pub nullable: bool,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// An ordered list of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema from fields, in order.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Returns the fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the field at `index`.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Finds a column by name, ignoring ASCII case.
    ///
    /// An exact match wins over a case-insensitive one.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|f| f.name.eq_ignore_ascii_case(name))
            })
    }

    /// Returns the column names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Renders the schema as an indented tree, one line per field.
    ///
    /// ```text
    /// root
    ///  |-- _id: string (nullable = false)
    ///  |-- amount: long (nullable = true)
    /// ```
    pub fn tree_string(&self) -> String {
        let mut out = String::from("root\n");
        write_fields(&mut out, &self.fields, 1);
        out
    }
}

fn write_fields(out: &mut String, fields: &[Field], depth: usize) {
    for field in fields {
        let _ = writeln!(
            out,
            "{}-- {}: {} (nullable = {})",
            prefix(depth),
            field.name,
            field.data_type.simple_name(),
            field.nullable
        );
        write_nested(out, &field.data_type, depth + 1);
    }
}

fn write_nested(out: &mut String, data_type: &DataType, depth: usize) {
    match data_type {
        DataType::Struct(schema) => write_fields(out, schema.fields(), depth),
        DataType::Array(element) => {
            let _ = writeln!(
                out,
                "{}-- element: {} (containsNull = true)",
                prefix(depth),
                element.simple_name()
            );
            write_nested(out, element, depth + 1);
        }
        _ => {}
    }
}

fn prefix(depth: usize) -> String {
    let mut p = String::from(" ");
    for _ in 1..depth {
        p.push_str("|    ");
    }
    p.push('|');
    p
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn index_of_prefers_exact_case() {
        let schema = Schema::new(vec![
            Field::new("REP", DataType::String, true),
            Field::new("rep", DataType::String, true),
            Field::new("amount", DataType::Long, true),
        ]);
        assert_eq!(schema.index_of("rep"), Some(1));
        assert_eq!(schema.index_of("Amount"), Some(2));
        assert_eq!(schema.index_of("month"), None);
    }

    #[test]
    fn tree_string_indents_nested_fields() {
        let inner = Schema::new(vec![Field::new("city", DataType::String, true)]);
        let schema = Schema::new(vec![
            Field::new("_id", DataType::String, false),
            Field::new("address", DataType::Struct(inner), true),
            Field::new("tags", DataType::Array(Box::new(DataType::String)), true),
        ]);
        let expected = "\
root
 |-- _id: string (nullable = false)
 |-- address: struct (nullable = true)
 |    |-- city: string (nullable = true)
 |-- tags: array (nullable = true)
 |    |-- element: string (containsNull = true)
";
        assert_eq!(schema.tree_string(), expected);
    }
}
