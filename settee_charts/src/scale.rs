// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales map data values into scene coordinates.

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (x - d0) / denom * (r1 - r0)
    }

    /// Domain as configured.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns tick values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Specification for a linear scale (domain and options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to extend the domain to tick boundaries.
    pub nice: bool,
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        match nice_ticks(self.domain.0, self.domain.1, tick_count).as_slice() {
            [first, .., last] => (*first, *last),
            _ => self.domain,
        }
    }

    /// Instantiates a scale over the resolved domain for an output range.
    pub fn instantiate(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

/// Returns evenly spaced round tick values that cover `[min, max]`.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }
    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;
    let n = ((stop - start) / step).round().clamp(0.0, 10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "clamped to a small non-negative range"
    )]
    let n = n as u64;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "step is finite and positive, so its decimal exponent is small"
    )]
    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let snap = 10_f64.powi(decimals);
    // Round away float noise such as 0.6000000000000001.
    (0..=n)
        .map(|i| ((start + step * i as f64) * snap).round() / snap)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let base = 10_f64.powf(step.log10().floor());
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A discrete band scale for categorical axes.
///
/// Band `0` starts at the first end of the range, so a range of `(bottom, top)` stacks bands
/// upward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.2,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let span = (self.range.1 - self.range.0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the `(low, high)` coordinates of band `index`.
    pub fn band(&self, index: usize) -> (f64, f64) {
        let (r0, r1) = self.range;
        let bw = self.band_width();
        let offset = bw * self.padding_outer + bw * (1.0 + self.padding_inner) * index as f64;
        if r1 >= r0 {
            (r0 + offset, r0 + offset + bw)
        } else {
            (r0 - offset - bw, r0 - offset)
        }
    }

    /// Returns the center coordinate of band `index`.
    pub fn center(&self, index: usize) -> f64 {
        let (lo, hi) = self.band(index);
        0.5 * (lo + hi)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nice_ticks_cover_the_domain() {
        assert_eq!(
            nice_ticks(0.0, 4800.0, 5),
            vec![0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0]
        );
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_domain_extends_to_ticks() {
        let spec = ScaleLinearSpec::new((-120.0, 930.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(5), (-200.0, 1000.0));
        let s = spec.instantiate((100.0, 700.0), 5);
        assert!((s.map(-200.0) - 100.0).abs() < 1e-9);
        assert!((s.map(1000.0) - 700.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_band_range_stacks_upward() {
        let s = ScaleBand::new((100.0, 0.0), 4);
        let (lo0, hi0) = s.band(0);
        let (lo3, hi3) = s.band(3);
        assert!(hi0 <= 100.0 && lo0 > lo3);
        assert!(lo3 >= 0.0 && hi3 < lo0);
        assert!((hi0 - lo0 - s.band_width()).abs() < 1e-9);
        assert!(s.center(1) > s.center(2));
    }
}
