// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text previews of rows.

use core::fmt::Write as _;

use crate::schema::Schema;
use crate::table::Row;

/// Default number of rows in a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Default cell width limit in a preview; longer cells are cut and suffixed with `...`.
pub const DEFAULT_TRUNCATE: usize = 20;

/// Renders rows as a bordered text grid.
///
/// `has_more` appends an `only showing top N rows` footer. With `truncate > 0`, cells are
/// right-aligned and cut to `truncate` characters; with `truncate == 0` they are left-aligned
/// and shown in full.
pub fn format_rows(schema: &Schema, rows: &[Row], has_more: bool, truncate: usize) -> String {
    let header: Vec<String> = schema.names().map(|n| cell_text(n, truncate)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..header.len())
                .map(|i| cell_text(&row.get(i).to_string(), truncate))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count().max(3)).collect();
    for line in &body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    write_line(&mut out, &header, &widths, truncate > 0);
    out.push_str(&sep);
    out.push('\n');
    for line in &body {
        write_line(&mut out, line, &widths, truncate > 0);
    }
    out.push_str(&sep);
    out.push('\n');
    if has_more {
        let n = rows.len();
        let noun = if n == 1 { "row" } else { "rows" };
        let _ = writeln!(out, "only showing top {n} {noun}");
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize], right_align: bool) {
    out.push('|');
    for (cell, w) in cells.iter().zip(widths) {
        let pad = w.saturating_sub(cell.chars().count());
        if right_align {
            out.push_str(&" ".repeat(pad));
            out.push_str(cell);
        } else {
            out.push_str(cell);
            out.push_str(&" ".repeat(pad));
        }
        out.push('|');
    }
    out.push('\n');
}

fn cell_text(text: &str, truncate: usize) -> String {
    if truncate == 0 || text.chars().count() <= truncate {
        return text.to_owned();
    }
    if truncate < 4 {
        return text.chars().take(truncate).collect();
    }
    let mut cut: String = text.chars().take(truncate - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::{DataType, Field};
    use crate::value::Value;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("rep", DataType::String, true),
            Field::new("amount", DataType::Long, true),
        ])
    }

    #[test]
    fn grid_right_aligns_and_reports_more_rows() {
        let rows = vec![
            Row::new(vec![Value::from("Charlotte"), Value::Long(5000)]),
            Row::new(vec![Value::from("Ben"), Value::Null]),
        ];
        let expected = "\
+---------+------+
|      rep|amount|
+---------+------+
|Charlotte|  5000|
|      Ben|  null|
+---------+------+
only showing top 2 rows
";
        assert_eq!(format_rows(&schema(), &rows, true, DEFAULT_TRUNCATE), expected);
    }

    #[test]
    fn long_cells_are_truncated() {
        let rows = vec![Row::new(vec![
            Value::from("abcdefghijklmnopqrstuvwxyz"),
            Value::Long(1),
        ])];
        let text = format_rows(&schema(), &rows, false, DEFAULT_TRUNCATE);
        assert!(text.contains("|abcdefghijklmnopq...|"), "{text}");
        assert!(!text.contains("only showing"), "{text}");
    }

    #[test]
    fn empty_result_still_has_header() {
        let expected = "\
+---+------+
|rep|amount|
+---+------+
+---+------+
";
        assert_eq!(format_rows(&schema(), &[], false, DEFAULT_TRUNCATE), expected);
    }
}
