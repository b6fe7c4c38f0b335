// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The local plotting buffer: a materialized `(label, value)` series.

/// A fully materialized two-column series, in row order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotBuffer {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl PlotBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the buffer has no rows.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row labels, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Row values, in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates `(label, value)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// The value extent with zero always included, or `[0, 1]` when there is nothing to span.
    ///
    /// Non-finite values are ignored.
    pub fn value_domain(&self) -> (f64, f64) {
        let (lo, hi) = self
            .values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi { (0.0, 1.0) } else { (lo, hi) }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PlotBuffer {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for (label, value) in iter {
            buffer.push(label, value);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_always_contains_zero() {
        let b: PlotBuffer = [("a", 120.0), ("b", 930.0)].into_iter().collect();
        assert_eq!(b.value_domain(), (0.0, 930.0));
        let b: PlotBuffer = [("a", -120.0), ("b", 930.0)].into_iter().collect();
        assert_eq!(b.value_domain(), (-120.0, 930.0));
        let b: PlotBuffer = [("a", -5.0)].into_iter().collect();
        assert_eq!(b.value_domain(), (-5.0, 0.0));
    }

    #[test]
    fn degenerate_domains_fall_back_to_unit() {
        assert_eq!(PlotBuffer::new().value_domain(), (0.0, 1.0));
        let b: PlotBuffer = [("zero", 0.0), ("nan", f64::NAN)].into_iter().collect();
        assert_eq!(b.value_domain(), (0.0, 1.0));
        assert_eq!(b.len(), 2);
    }
}
