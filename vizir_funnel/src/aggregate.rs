// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series-wide aggregates computed once per layout pass.

use crate::item::DataItem;

/// Aggregates over all items with a usable declared value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aggregates {
    /// Number of items with a defined, finite, non-zero declared value.
    pub count: usize,
    /// Mean of `working_value / value` over the counted items.
    ///
    /// `NaN` when `count == 0`; the geometry solver turns that into "render nothing".
    pub normalized_total: f64,
    /// Largest declared value, used as the width denominator.
    pub max_value: f64,
    /// Sum of declared values, used for percentages.
    pub sum: f64,
}

impl Default for Aggregates {
    fn default() -> Self {
        Self {
            count: 0,
            normalized_total: f64::NAN,
            max_value: f64::NAN,
            sum: 0.0,
        }
    }
}

impl Aggregates {
    /// Scans `items` once.
    pub fn scan(items: &[DataItem]) -> Self {
        let mut count = 0_usize;
        let mut total = 0.0;
        let mut max_value = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for item in items {
            let Some(value) = item.value.filter(|v| v.is_finite()) else {
                continue;
            };
            max_value = max_value.max(value);
            sum += value;
            let Some(divisor) = item.usable_value() else {
                continue;
            };
            count += 1;
            total += item.working_value / divisor;
        }

        let normalized_total = if count == 0 {
            f64::NAN
        } else {
            total / count as f64
        };
        Self {
            count,
            normalized_total,
            max_value: if max_value.is_finite() {
                max_value
            } else {
                f64::NAN
            },
            sum,
        }
    }

    /// Percentage of `value` relative to the sum of declared values.
    pub fn percent(&self, value: f64) -> f64 {
        if self.sum == 0.0 {
            return 0.0;
        }
        value / self.sum * 100.0
    }
}
