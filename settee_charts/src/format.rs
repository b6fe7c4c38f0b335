// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.

/// Formats a tick value with as many decimals as the tick `step` needs.
///
/// A step of `1000` prints `5000`, a step of `0.25` prints `0.75`. Non-finite or zero steps fall
/// back to the shortest representation of `v`.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let decimals = decimals_for_step(step);
    let s = format!("{v:.decimals$}");
    // `-0` and `-0.00` read as noise on an axis.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        return s[1..].to_string();
    }
    s
}

fn decimals_for_step(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    let mut decimals = 0_usize;
    let mut scaled = step;
    while decimals < 12 && (scaled - scaled.round()).abs() > 1e-9 * scaled.max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_the_step() {
        assert_eq!(format_tick_with_step(5000.0, 1000.0), "5000");
        assert_eq!(format_tick_with_step(0.75, 0.25), "0.75");
        assert_eq!(format_tick_with_step(0.6000000000000001, 0.2), "0.6");
        assert_eq!(format_tick_with_step(3.0, 0.5), "3.0");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_tick_with_step(-0.0, 1.0), "0");
        assert_eq!(format_tick_with_step(-0.0001, 0.1), "0.0");
    }

    #[test]
    fn degenerate_step_prints_integers() {
        assert_eq!(format_tick_with_step(42.0, 0.0), "42");
        assert_eq!(format_tick_with_step(-7.0, f64::NAN), "-7");
    }
}
