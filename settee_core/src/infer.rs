// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema inference over JSON documents.
//!
//! Inference produces a best-effort union schema:
//! - every top-level key seen in any observed document becomes a column,
//! - conflicting types widen (`long` + `double` to `double`, anything else to `string`),
//! - a column is nullable when some document lacks it or holds `null`.
//!
//! The identifier column (`_id`) is placed first; other columns are sorted by name so the
//! result does not depend on document key order.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::schema::{DataType, Field, Schema};

/// Name of the document identifier column.
pub const ID_FIELD: &str = "_id";

#[derive(Clone, Debug)]
struct ColumnStats {
    data_type: DataType,
    present: usize,
    saw_null: bool,
}

/// Incremental schema inference.
#[derive(Clone, Debug, Default)]
pub struct SchemaInference {
    columns: BTreeMap<String, ColumnStats>,
    observed: usize,
}

impl SchemaInference {
    /// Creates an empty inference state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one document into the inferred schema.
    pub fn observe(&mut self, document: &Map<String, JsonValue>) {
        self.observed += 1;
        for (name, value) in document {
            let observed = infer_type(value);
            match self.columns.get_mut(name) {
                Some(stats) => {
                    let current = core::mem::replace(&mut stats.data_type, DataType::Null);
                    stats.data_type = merge_types(current, observed);
                    stats.present += 1;
                    stats.saw_null |= value.is_null();
                }
                None => {
                    self.columns.insert(
                        name.clone(),
                        ColumnStats {
                            data_type: observed,
                            present: 1,
                            saw_null: value.is_null(),
                        },
                    );
                }
            }
        }
    }

    /// Returns the number of documents observed so far.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Finishes inference.
    pub fn finish(self) -> Schema {
        let observed = self.observed;
        let mut id = None;
        let mut fields = Vec::with_capacity(self.columns.len());
        for (name, stats) in self.columns {
            let nullable = stats.saw_null || stats.present < observed;
            let field = Field::new(name, finalize(stats.data_type), nullable);
            if field.name == ID_FIELD {
                id = Some(field);
            } else {
                fields.push(field);
            }
        }
        if let Some(id) = id {
            fields.insert(0, id);
        }
        Schema::new(fields)
    }
}

/// Infers a schema from a sequence of documents.
pub fn infer_schema<'a>(documents: impl IntoIterator<Item = &'a Map<String, JsonValue>>) -> Schema {
    let mut inference = SchemaInference::new();
    for document in documents {
        inference.observe(document);
    }
    inference.finish()
}

/// Infers the type of a single JSON value.
pub fn infer_type(value: &JsonValue) -> DataType {
    match value {
        JsonValue::Null => DataType::Null,
        JsonValue::Bool(_) => DataType::Boolean,
        JsonValue::Number(n) => {
            if n.is_i64() {
                DataType::Long
            } else {
                DataType::Double
            }
        }
        JsonValue::String(_) => DataType::String,
        JsonValue::Array(items) => DataType::Array(Box::new(
            items
                .iter()
                .map(infer_type)
                .fold(DataType::Null, merge_types),
        )),
        JsonValue::Object(map) => {
            let fields = map
                .iter()
                .map(|(name, v)| Field::new(name.clone(), infer_type(v), true))
                .collect::<Vec<_>>();
            DataType::Struct(sorted(fields))
        }
    }
}

/// Merges two observed types into their widest common type.
pub fn merge_types(a: DataType, b: DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a,
        (DataType::Null, other) | (other, DataType::Null) => other,
        (DataType::Long, DataType::Double) | (DataType::Double, DataType::Long) => {
            DataType::Double
        }
        (DataType::Array(a), DataType::Array(b)) => DataType::Array(Box::new(merge_types(*a, *b))),
        (DataType::Struct(a), DataType::Struct(b)) => DataType::Struct(merge_structs(a, b)),
        _ => DataType::String,
    }
}

fn merge_structs(a: Schema, b: Schema) -> Schema {
    let mut merged: BTreeMap<String, DataType> = BTreeMap::new();
    for field in a.fields().iter().chain(b.fields()) {
        let current = merged.remove(&field.name).unwrap_or(DataType::Null);
        merged.insert(field.name.clone(), merge_types(current, field.data_type.clone()));
    }
    Schema::new(
        merged
            .into_iter()
            .map(|(name, data_type)| Field::new(name, data_type, true))
            .collect(),
    )
}

fn sorted(mut fields: Vec<Field>) -> Schema {
    fields.sort_by(|a, b| a.name.cmp(&b.name));
    Schema::new(fields)
}

fn finalize(data_type: DataType) -> DataType {
    match data_type {
        DataType::Null => DataType::String,
        DataType::Array(element) => DataType::Array(Box::new(finalize(*element))),
        DataType::Struct(schema) => DataType::Struct(Schema::new(
            schema
                .fields()
                .iter()
                .map(|f| Field::new(f.name.clone(), finalize(f.data_type.clone()), true))
                .collect(),
        )),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn union_schema_marks_late_fields_nullable() {
        let docs = [
            object(json!({"_id": "a", "rep": "Ben", "amount": 10})),
            object(json!({"_id": "b", "rep": "Ann", "amount": 2.5, "region": "east"})),
        ];
        let schema = infer_schema(&docs);
        assert_eq!(
            schema.fields(),
            &[
                Field::new("_id", DataType::String, false),
                Field::new("amount", DataType::Double, false),
                Field::new("region", DataType::String, true),
                Field::new("rep", DataType::String, false),
            ]
        );
    }

    #[test]
    fn conflicting_types_widen_to_string() {
        assert_eq!(
            merge_types(DataType::Long, DataType::Boolean),
            DataType::String
        );
        assert_eq!(merge_types(DataType::Null, DataType::Long), DataType::Long);
    }

    #[test]
    fn null_only_columns_become_nullable_strings() {
        let docs = [object(json!({"_id": "a", "note": null}))];
        let schema = infer_schema(&docs);
        assert_eq!(
            schema.field(1),
            Some(&Field::new("note", DataType::String, true))
        );
    }

    #[test]
    fn nested_structs_merge_field_wise() {
        let docs = [
            object(json!({"_id": "a", "geo": {"lat": 1, "tags": []}})),
            object(json!({"_id": "b", "geo": {"lat": 1.5, "lon": 2, "tags": ["x"]}})),
        ];
        let schema = infer_schema(&docs);
        let geo = Schema::new(vec![
            Field::new("lat", DataType::Double, true),
            Field::new("lon", DataType::Long, true),
            Field::new("tags", DataType::Array(Box::new(DataType::String)), true),
        ]);
        assert_eq!(schema.field(1).map(|f| &f.data_type), Some(&DataType::Struct(geo)));
    }

    #[test]
    fn inference_is_independent_of_key_order() {
        let a = [object(json!({"_id": "1", "b": 1, "a": "x"}))];
        let b = [object(json!({"a": "x", "_id": "1", "b": 1}))];
        assert_eq!(infer_schema(&a), infer_schema(&b));
    }
}
