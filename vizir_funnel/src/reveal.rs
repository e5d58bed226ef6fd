// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item delays and durations for coordinated show/hide.

/// Delay of the item at `index` in a sequenced animation.
///
/// `stagger * index` plus the item's share of `duration` across the `[start, end)` range.
/// An empty range contributes no share.
pub fn sequenced_delay(index: usize, start: usize, end: usize, stagger: f64, duration: f64) -> f64 {
    let span = end as f64 - start as f64;
    let share = if span == 0.0 {
        0.0
    } else {
        duration * (index as f64 - start as f64) / span
    };
    stagger * index as f64 + share
}

/// Timing inputs shared by every item of one show/hide call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealPlan {
    /// Duration of each item's tween, in milliseconds.
    pub duration: f64,
    /// Whether delays are staggered by index.
    pub sequenced: bool,
    /// Extra delay per index when sequenced, in milliseconds.
    pub stagger: f64,
    /// First index of the animated range.
    pub start: usize,
    /// End index of the animated range.
    pub end: usize,
}

impl RevealPlan {
    /// Resolves the duration: an explicit `duration` overrides `default_duration`.
    pub fn new(duration: Option<f64>, default_duration: f64, start: usize, end: usize) -> Self {
        Self {
            duration: duration.unwrap_or(default_duration),
            sequenced: false,
            stagger: 0.0,
            start,
            end,
        }
    }

    /// Enables sequencing with the given per-index stagger.
    pub fn with_sequence(mut self, sequenced: bool, stagger: f64) -> Self {
        self.sequenced = sequenced;
        self.stagger = stagger;
        self
    }

    /// Delay of the item at `index`.
    pub fn delay(&self, index: usize) -> f64 {
        if self.sequenced {
            sequenced_delay(index, self.start, self.end, self.stagger, self.duration)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequenced_delay_combines_stagger_and_share() {
        let d = sequenced_delay(2, 0, 3, 50.0, 200.0);
        assert!((d - (100.0 + 400.0 / 3.0)).abs() < 1e-9, "got {d}");
        assert!((d - 233.333).abs() < 1e-3);
    }

    #[test]
    fn empty_range_has_no_share() {
        assert_eq!(sequenced_delay(0, 0, 0, 10.0, 200.0), 0.0);
        assert_eq!(sequenced_delay(3, 2, 2, 10.0, 200.0), 30.0);
    }

    #[test]
    fn plan_without_sequence_has_no_delay() {
        let plan = RevealPlan::new(None, 1000.0, 0, 4);
        assert_eq!(plan.duration, 1000.0);
        assert_eq!(plan.delay(3), 0.0);

        let plan = RevealPlan::new(Some(200.0), 1000.0, 0, 3).with_sequence(true, 50.0);
        assert_eq!(plan.duration, 200.0, "explicit duration wins");
        assert!((plan.delay(2) - 233.333).abs() < 1e-3);
        assert_eq!(plan.delay(0), 0.0);
    }
}
