// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of the value a slice tapers towards.
//!
//! A slice's bottom edge (and its link) point at the next *shown* item, so items that are
//! invisible or mid-hide are skipped. A trailing run of skipped items resolves to the last
//! item's own working value.

use crate::item::DataItem;

/// Returns the working value the item at `index` tapers towards.
///
/// `None` if `index` is out of bounds.
pub fn next_value(items: &[DataItem], index: usize) -> Option<f64> {
    let mut current = items.get(index)?;
    for item in &items[index + 1..] {
        current = item;
        if item.is_eligible() {
            break;
        }
    }
    Some(current.working_value)
}

/// Returns the index of the first eligible item after `index`, if any.
pub fn next_eligible_index(items: &[DataItem], index: usize) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, item)| item.is_eligible())
        .map(|(i, _)| i)
}
