// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical view catalog.

use hashbrown::HashMap;
use parking_lot::RwLock;
use settee_transforms::LazyTable;

/// Named bindings of lazy tables.
///
/// Names are case-insensitive. Registering a name that is already bound replaces the
/// previous binding.
#[derive(Debug, Default)]
pub struct Catalog {
    views: RwLock<HashMap<String, LazyTable>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `table`, returning `true` if an earlier binding was replaced.
    pub fn register(&self, name: &str, table: LazyTable) -> bool {
        self.views
            .write()
            .insert(name.to_ascii_lowercase(), table)
            .is_some()
    }

    /// Looks up a view.
    pub fn lookup(&self, name: &str) -> Option<LazyTable> {
        self.views.read().get(&name.to_ascii_lowercase()).cloned()
    }

    /// Removes a view, returning `true` if it was bound.
    pub fn drop_view(&self, name: &str) -> bool {
        self.views
            .write()
            .remove(&name.to_ascii_lowercase())
            .is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.views.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use settee_core::{DataType, Field, Row, Schema, Table, Value};

    use super::*;

    fn table(n: i64) -> LazyTable {
        let schema = Schema::new(vec![Field::new("n", DataType::Long, false)]);
        LazyTable::scan(Table::new(schema, vec![Row::new(vec![Value::Long(n)])]))
    }

    #[test]
    fn last_registration_wins() {
        let catalog = Catalog::new();
        assert!(!catalog.register("sales_table", table(1)));
        assert!(catalog.register("SALES_TABLE", table(2)));
        let view = catalog.lookup("Sales_Table").unwrap();
        assert_eq!(view.collect(), vec![Row::new(vec![Value::Long(2)])]);
        assert_eq!(catalog.names(), vec!["sales_table".to_owned()]);
    }

    #[test]
    fn dropped_views_are_gone() {
        let catalog = Catalog::new();
        catalog.register("a", table(1));
        assert!(catalog.drop_view("A"));
        assert!(catalog.lookup("a").is_none());
        assert!(!catalog.drop_view("a"));
    }
}
