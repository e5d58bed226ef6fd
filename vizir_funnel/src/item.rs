// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Funnel data items and their value accessors.

extern crate alloc;

use alloc::string::String;

/// Stable identity of a data item.
///
/// Keys play the role of vizir table `row_keys`: element identity (slice, link, tick, label)
/// is derived from them, so it survives reordering and re-validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub u64);

/// One funnel entry.
#[derive(Clone, Debug, PartialEq)]
pub struct DataItem {
    /// Stable identity.
    pub key: ItemKey,
    /// Category name, used by label and tooltip text.
    pub category: String,
    /// Declared (target) magnitude. `None` excludes the item from aggregates and rendering.
    pub value: Option<f64>,
    /// Current, possibly mid-animation, value.
    pub working_value: f64,
    /// Whether the item is shown.
    pub visible: bool,
    /// Whether a hide animation is in flight for this item.
    pub is_hiding: bool,
}

impl DataItem {
    /// Creates a visible item whose working value equals its declared value.
    pub fn new(key: ItemKey, category: impl Into<String>, value: f64) -> Self {
        Self {
            key,
            category: category.into(),
            value: Some(value),
            working_value: value,
            visible: true,
            is_hiding: false,
        }
    }

    /// Creates an item without a declared value.
    ///
    /// Such items keep their slot in the ordered list but produce no geometry.
    pub fn empty(key: ItemKey, category: impl Into<String>) -> Self {
        Self {
            key,
            category: category.into(),
            value: None,
            working_value: 0.0,
            visible: true,
            is_hiding: false,
        }
    }

    /// Creates an item that starts collapsed (working value `0`, invisible).
    ///
    /// A later [`FunnelSeries::show`](crate::FunnelSeries::show) grows it to `value`.
    pub fn collapsed(key: ItemKey, category: impl Into<String>, value: f64) -> Self {
        Self {
            working_value: 0.0,
            visible: false,
            ..Self::new(key, category, value)
        }
    }

    /// Returns `true` if the item is a valid successor for slice tapering.
    pub fn is_eligible(&self) -> bool {
        self.visible && !self.is_hiding
    }

    /// Declared value, if it can be used as a divisor.
    pub(crate) fn usable_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite() && *v != 0.0)
    }

    /// Fraction of the declared value currently reached by the working value.
    ///
    /// Zero when the declared value is zero, `None` when it is undefined.
    pub fn progress(&self) -> Option<f64> {
        let value = self.value?;
        if value == 0.0 {
            return Some(0.0);
        }
        Some(self.working_value / value)
    }
}
