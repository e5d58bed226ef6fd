// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slice and link geometry, in axis-role terms.
//!
//! Widths are measured across the stack (the cross axis) and scale with
//! `working / max_value`. Lengths are measured along the stack and divide the available
//! extent evenly between counted items, scaled by each item's progress towards its declared
//! value and corrected by the series-wide mean progress. During a synchronized reveal this
//! keeps every slice growing in proportional lockstep while the stack stays full.
//!
//! Width denominators use the series maximum, the length denominator uses the item's own
//! declared value. The two are intentionally not unified: the first caps the visual width, the
//! second drives the proportional length.

/// Inputs for one slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceInput {
    /// Current (possibly animated) value.
    pub working_value: f64,
    /// The item's own declared value (length denominator).
    pub declared_value: f64,
    /// Largest declared value in the series (width denominator).
    pub max_value: f64,
    /// Working value of the next shown item.
    pub next_value: f64,
    /// Taper factor in `[0, 1]`.
    pub bottom_ratio: f64,
    /// Extent available across the stack.
    pub cross_extent: f64,
    /// Extent available along the stack.
    pub stack_extent: f64,
    /// Nominal link length.
    pub link_length: f64,
    /// Number of counted items.
    pub count: usize,
    /// Mean progress of counted items.
    pub normalized_total: f64,
    /// Running offset along the stack axis.
    pub offset: f64,
}

/// Solved geometry for one slice and its trailing link.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SliceGeometry {
    /// Slice width at its leading edge.
    pub top_width: f64,
    /// Slice width at its trailing edge.
    pub bottom_width: f64,
    /// Slice start along the stack axis.
    pub offset: f64,
    /// Slice length along the stack axis.
    pub length: f64,
    /// Center of the slice across the stack.
    pub cross_center: f64,
    /// Link width at its leading edge (equals `bottom_width`).
    pub link_top_width: f64,
    /// Link width at its trailing edge (the next item's width).
    pub link_bottom_width: f64,
    /// Link start along the stack axis.
    pub link_offset: f64,
    /// Link length along the stack axis.
    pub link_length: f64,
}

impl SliceGeometry {
    /// Total stack-axis space consumed by the slice and its link.
    pub fn advance(&self) -> f64 {
        self.length + self.link_length
    }

    /// Running offset after this slice.
    pub fn end(&self) -> f64 {
        self.link_offset + self.link_length
    }

    /// Slice width at fraction `t` of its length.
    pub fn width_at(&self, t: f64) -> f64 {
        self.top_width + (self.bottom_width - self.top_width) * t
    }
}

/// Solves one slice.
///
/// Returns `None` if any output is non-finite (for example with no counted items, a zero
/// series maximum, or a zero mean progress); such an item renders nothing and must not
/// advance the running offset.
pub fn solve_slice(input: &SliceInput) -> Option<SliceGeometry> {
    let width = |v: f64| v / input.max_value * input.cross_extent;
    let working = input.working_value;
    let next = input.next_value;

    let top_width = width(working);
    let bottom_width = width(working - (working - next) * input.bottom_ratio);
    let link_bottom_width = width(working - (working - next));

    let progress = if input.declared_value == 0.0 {
        0.0
    } else {
        working / input.declared_value
    };
    let available = input.stack_extent + input.link_length;
    let share = available / input.count as f64 * progress / input.normalized_total;

    let length = (share - input.link_length).max(0.0);
    let link_length = share - length;

    let geometry = SliceGeometry {
        top_width,
        bottom_width,
        offset: input.offset,
        length,
        cross_center: input.cross_extent / 2.0,
        link_top_width: bottom_width,
        link_bottom_width,
        link_offset: input.offset + length,
        link_length,
    };

    let finite = [
        geometry.top_width,
        geometry.bottom_width,
        geometry.link_bottom_width,
        geometry.length,
        geometry.link_length,
        geometry.cross_center,
    ]
    .iter()
    .all(|v| v.is_finite());
    finite.then_some(geometry)
}
