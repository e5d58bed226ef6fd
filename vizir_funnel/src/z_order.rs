// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Suggested z-order conventions for funnel marks.
//!
//! Marks carry an explicit `z_index`. Renderers should sort by `(z_index, key)` for a
//! deterministic tie-break.

/// Links drawn behind slices.
pub const LINKS: i32 = -10;
/// Slice fills.
pub const SLICES: i32 = 0;
/// Tick lines between slices and aligned labels.
pub const TICKS: i32 = 30;
/// Labels drawn above everything else.
pub const LABELS: i32 = 40;
