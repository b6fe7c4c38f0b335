// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rows and materialized tables.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::schema::Schema;
use crate::value::Value;

static NULL: Value = Value::Null;

/// One row of cells, aligned to a schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the cell at `index`, or null if out of range.
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    /// Returns all cells.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its cells.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a row from a JSON document, conforming each column to `schema`.
    ///
    /// Keys outside the schema are dropped; missing keys become null.
    pub fn from_document(document: &Map<String, JsonValue>, schema: &Schema) -> Self {
        Self::new(
            schema
                .fields()
                .iter()
                .map(|f| {
                    document
                        .get(&f.name)
                        .map_or(Value::Null, |v| Value::from_json(v, &f.data_type))
                })
                .collect(),
        )
    }

    /// Serializes the row as a JSON object, omitting null cells.
    pub fn to_document(&self, schema: &Schema) -> Map<String, JsonValue> {
        let mut out = Map::new();
        for (field, value) in schema.fields().iter().zip(&self.values) {
            if !value.is_null() {
                out.insert(field.name.clone(), value.to_json(&field.data_type));
            }
        }
        out
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// A fully materialized table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table.
    pub fn new(schema: impl Into<Arc<Schema>>, rows: Vec<Row>) -> Self {
        Self {
            schema: schema.into(),
            rows,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the table, returning its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cells of the named column, if it exists.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |r| r.get(index)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{DataType, Field};

    #[test]
    fn document_round_trip_omits_nulls_and_unknown_keys() {
        let schema = Schema::new(vec![
            Field::new("amount", DataType::Long, true),
            Field::new("rep", DataType::String, true),
        ]);
        let JsonValue::Object(doc) = json!({"rep": "Ben", "extra": true}) else {
            unreachable!()
        };
        let row = Row::from_document(&doc, &schema);
        assert_eq!(row.values(), &[Value::Null, Value::from("Ben")]);

        let back = row.to_document(&schema);
        assert_eq!(JsonValue::Object(back), json!({"rep": "Ben"}));
    }

    #[test]
    fn column_reads_by_name() {
        let schema = Schema::new(vec![Field::new("n", DataType::Long, false)]);
        let table = Table::new(
            schema,
            vec![Row::new(vec![Value::Long(1)]), Row::new(vec![Value::Long(2)])],
        );
        let sum: i64 = table
            .column("N")
            .into_iter()
            .flatten()
            .filter_map(|v| match v {
                Value::Long(n) => Some(*n),
                _ => None,
            })
            .sum();
        assert_eq!(sum, 3);
        assert!(table.column("missing").is_none());
    }
}
