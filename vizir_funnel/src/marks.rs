// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-facing primitives generated from laid-out funnel elements.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Line, Point, Rect, Shape};
use peniko::Brush;

use crate::axis::Orientation;
use crate::elements::{FunnelLabel, FunnelSlice, FunnelTick};
use crate::item::ItemKey;

/// What a mark draws.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// A filled slice outline.
    Slice {
        /// Closed outline in scene coordinates.
        path: BezPath,
        /// Fill paint.
        fill: Brush,
    },
    /// A filled link outline.
    Link {
        /// Closed outline in scene coordinates.
        path: BezPath,
        /// Fill paint.
        fill: Brush,
    },
    /// A tick line.
    Tick {
        /// Line from the slice anchor to the label.
        line: Line,
        /// Stroke paint.
        stroke: Brush,
        /// Stroke width.
        stroke_width: f64,
    },
    /// A label box; text is centered in `rect` and rotated by `angle` degrees.
    Label {
        /// Measured box in scene coordinates.
        rect: Rect,
        /// Text content (unshaped).
        text: String,
        /// Font size.
        font_size: f64,
        /// Rotation in degrees.
        angle: f64,
        /// Fill paint.
        fill: Brush,
    },
}

/// A primitive tagged with its owning item and paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct FunnelMark {
    /// Item that owns the element.
    pub key: ItemKey,
    /// Rendering order hint.
    pub z_index: i32,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl FunnelMark {
    /// Builds a slice mark.
    pub fn slice(key: ItemKey, slice: &FunnelSlice, orientation: Orientation, region: Rect) -> Self {
        Self {
            key,
            z_index: crate::z_order::SLICES,
            payload: MarkPayload::Slice {
                path: trapezoid_path(slice, orientation, region),
                fill: slice.fill.clone(),
            },
        }
    }

    /// Builds a link mark.
    pub fn link(key: ItemKey, link: &FunnelSlice, orientation: Orientation, region: Rect) -> Self {
        Self {
            key,
            z_index: crate::z_order::LINKS,
            payload: MarkPayload::Link {
                path: trapezoid_path(link, orientation, region),
                fill: link.fill.clone(),
            },
        }
    }

    /// Builds a tick mark, if the tick has a line.
    pub fn tick(key: ItemKey, tick: &FunnelTick) -> Option<Self> {
        let line = tick.line?;
        Some(Self {
            key,
            z_index: crate::z_order::TICKS,
            payload: MarkPayload::Tick {
                line,
                stroke: tick.stroke.clone(),
                stroke_width: 1.0,
            },
        })
    }

    /// Builds a label mark, if the label has been measured.
    pub fn label(key: ItemKey, label: &FunnelLabel) -> Option<Self> {
        let rect = label.bounds()?;
        Some(Self {
            key,
            z_index: crate::z_order::LABELS,
            payload: MarkPayload::Label {
                rect,
                text: label.text.clone(),
                font_size: label.font_size,
                angle: label.rotation,
                fill: label.fill.clone(),
            },
        })
    }

    /// Scene-space bounds of the mark.
    pub fn bounds(&self) -> Rect {
        match &self.payload {
            MarkPayload::Slice { path, .. } | MarkPayload::Link { path, .. } => {
                path.bounding_box()
            }
            MarkPayload::Tick { line, .. } => line.bounding_box(),
            MarkPayload::Label { rect, .. } => *rect,
        }
    }
}

/// Closed outline of a trapezoid element in scene coordinates.
pub fn trapezoid_path(slice: &FunnelSlice, orientation: Orientation, region: Rect) -> BezPath {
    let origin = region.origin();
    let c = slice.cross_center;
    let top = slice.top_width / 2.0;
    let bottom = slice.bottom_width / 2.0;
    let near = slice.offset;
    let far = slice.offset + slice.length;

    let corners: [Point; 4] = [
        orientation.point(origin, near, c - top),
        orientation.point(origin, near, c + top),
        orientation.point(origin, far, c + bottom),
        orientation.point(origin, far, c - bottom),
    ];

    let mut path = BezPath::new();
    path.move_to(corners[0]);
    for p in &corners[1..] {
        path.line_to(*p);
    }
    path.close_path();
    path
}
