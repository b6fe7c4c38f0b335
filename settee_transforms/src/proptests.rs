// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cmp::Ordering;

use proptest::prelude::*;
use settee_core::{DataType, Field, Row, Schema, Table, Value};

use crate::{CompareOp, Expr, LazyTable, SortKey, SortOrder, Transform};

fn table(values: &[Option<i64>]) -> LazyTable {
    let schema = Schema::new(vec![Field::new("amount", DataType::Long, true)]);
    let rows = values
        .iter()
        .map(|v| Row::new(vec![v.map_or(Value::Null, Value::Long)]))
        .collect();
    LazyTable::scan(Table::new(schema, rows))
}

proptest! {
    #[test]
    fn descending_sort_never_increases(values in proptest::collection::vec(proptest::option::of(-500_i64..500), 0..64)) {
        let sorted = table(&values)
            .then(Transform::Sort { keys: vec![SortKey::new(Expr::col(0), SortOrder::Desc)] })
            .unwrap()
            .collect();
        prop_assert_eq!(sorted.len(), values.len());
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0].get(0), pair[1].get(0));
            // Nulls trail a descending sort.
            if !a.is_null() && !b.is_null() {
                prop_assert_ne!(a.sort_cmp(b), Ordering::Less);
            } else {
                prop_assert!(b.is_null());
            }
        }
    }

    #[test]
    fn filtering_twice_equals_filtering_once(
        values in proptest::collection::vec(proptest::option::of(-500_i64..500), 0..64),
        threshold in -500_i64..500,
    ) {
        let filter = Transform::Filter {
            predicate: Expr::col(0).compare(CompareOp::Gt, Expr::lit(threshold)),
        };
        let once = table(&values).then(filter.clone()).unwrap();
        let twice = once.then(filter).unwrap();
        prop_assert_eq!(once.collect(), twice.collect());
        prop_assert!(once.collect().iter().all(|r| r.get(0).as_f64().is_some_and(|v| v > threshold as f64)));
    }
}
