// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anti-collision arrangement for labels placed in a column beside the funnel.
//!
//! Labels keep their order along the stack axis. Two sweeps remove overlaps:
//! - **backward**, from the last label: earlier labels are pushed back so they end where the
//!   following label starts, which keeps downstream labels at their preferred positions;
//! - **forward**, from `origin`: labels pushed past the start are pulled forward again, each
//!   starting no earlier than the previous label's end.
//!
//! Invisible labels are skipped and take no space.

/// A label's interval along the stack axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelSpan {
    /// Near edge along the stack axis.
    pub position: f64,
    /// Measured extent along the stack axis.
    pub extent: f64,
    /// Whether the label takes part in arrangement.
    pub visible: bool,
}

impl LabelSpan {
    /// Creates a visible span.
    pub fn new(position: f64, extent: f64) -> Self {
        Self {
            position,
            extent,
            visible: true,
        }
    }

    /// Far edge along the stack axis.
    pub fn end(&self) -> f64 {
        self.position + self.extent
    }
}

/// Arranges `spans` in place so that visible spans no longer overlap.
pub fn arrange_labels(spans: &mut [LabelSpan], origin: f64) {
    if spans.len() < 2 {
        return;
    }

    let last_index = spans.len() - 1;
    let mut limit = spans[last_index].position;
    for span in spans[..last_index].iter_mut().rev() {
        if !span.visible {
            continue;
        }
        if span.end() > limit {
            span.position = limit - span.extent;
        }
        limit = span.position;
    }

    let mut cursor = origin;
    for span in spans.iter_mut() {
        if !span.visible {
            continue;
        }
        if span.position < cursor {
            span.position = cursor;
        }
        cursor += span.extent;
    }
}
