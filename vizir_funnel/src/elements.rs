// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item elements (slice, link, tick, label) and the arena that owns them.
//!
//! Elements are allocated the first time a layout pass touches an item, mutated in place by
//! every later pass, and released when the item leaves the series. Stable identity lets an
//! animation layer retarget geometry instead of recreating it.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;
use kurbo::{Line, Point, Rect, Size};
use peniko::Brush;

use crate::axis::{Orientation, TickLocation};
use crate::geometry::SliceGeometry;
use crate::item::ItemKey;
use crate::measure::TextMeasurer;

/// A trapezoid along the stack axis. Used for both slices and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunnelSlice {
    /// Width at the leading edge.
    pub top_width: f64,
    /// Width at the trailing edge.
    pub bottom_width: f64,
    /// Start along the stack axis, relative to the slices region.
    pub offset: f64,
    /// Length along the stack axis.
    pub length: f64,
    /// Center across the stack, relative to the slices region.
    pub cross_center: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Disabled elements are not rendered.
    pub disabled: bool,
}

impl FunnelSlice {
    /// Copies the slice part of `g`.
    pub(crate) fn set_slice(&mut self, g: &SliceGeometry) {
        self.top_width = g.top_width;
        self.bottom_width = g.bottom_width;
        self.offset = g.offset;
        self.length = g.length;
        self.cross_center = g.cross_center;
    }

    /// Copies the link part of `g`.
    pub(crate) fn set_link(&mut self, g: &SliceGeometry) {
        self.top_width = g.link_top_width;
        self.bottom_width = g.link_bottom_width;
        self.offset = g.link_offset;
        self.length = g.link_length;
        self.cross_center = g.cross_center;
    }

    /// Width at fraction `t` of the length.
    pub fn width_at(&self, t: f64) -> f64 {
        self.top_width + (self.bottom_width - self.top_width) * t
    }

    /// Axis-aligned bounds in scene coordinates, given the slices region.
    pub fn bounds(&self, orientation: Orientation, region: Rect) -> Rect {
        let width = self.top_width.max(self.bottom_width);
        orientation.rect(
            region.origin(),
            self.offset,
            self.cross_center - width / 2.0,
            self.length,
            width,
        )
    }

    /// Scene point at fractional `location` on this slice.
    ///
    /// The cross fraction is measured across the slice's width at that stack fraction.
    pub fn point_at(&self, orientation: Orientation, region: Rect, location: TickLocation) -> Point {
        let width = self.width_at(location.stack);
        let stack = self.offset + self.length * location.stack;
        let cross = self.cross_center + (location.cross - 0.5) * width;
        orientation.point(region.origin(), stack, cross)
    }
}

/// A callout line from a slice to its label.
#[derive(Clone, Debug, PartialEq)]
pub struct FunnelTick {
    /// Anchor on the slice.
    pub location: TickLocation,
    /// Line in scene coordinates, set by the last layout pass.
    pub line: Option<Line>,
    /// Stroke paint.
    pub stroke: Brush,
    /// Disabled ticks are not rendered.
    pub disabled: bool,
}

/// Horizontal alignment of a label relative to its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelAlign {
    /// Centered on the anchor (labels drawn on the slices).
    #[default]
    Middle,
    /// Starting at the anchor (labels in a column beside the slices).
    Start,
}

/// Positioned label text.
#[derive(Clone, Debug, PartialEq)]
pub struct FunnelLabel {
    /// Text content.
    pub text: String,
    /// Font size.
    pub font_size: f64,
    /// Padding added on every side of the measured text.
    pub padding: f64,
    /// Rotation in degrees (`-90` for horizontal funnels).
    pub rotation: f64,
    /// Alignment relative to the anchor.
    pub align: LabelAlign,
    /// Top-left corner of the measured box, in scene coordinates.
    pub position: Point,
    /// Fill paint.
    pub fill: Brush,
    /// Whether the label is shown.
    pub visible: bool,
    measured: Option<Size>,
}

impl FunnelLabel {
    fn new() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            padding: 0.0,
            rotation: 0.0,
            align: LabelAlign::Middle,
            position: Point::ZERO,
            fill: Brush::default(),
            visible: true,
            measured: None,
        }
    }

    /// Sets the text, invalidating the measurement if it changed.
    pub fn set_text(&mut self, text: String) {
        if self.text != text {
            self.text = text;
            self.measured = None;
        }
    }

    /// Sets the font size, padding and rotation, invalidating the measurement on change.
    pub fn set_style(&mut self, font_size: f64, padding: f64, rotation: f64) {
        if self.font_size != font_size || self.padding != padding || self.rotation != rotation {
            self.font_size = font_size;
            self.padding = padding;
            self.rotation = rotation;
            self.measured = None;
        }
    }

    /// Returns `true` if the label needs to be measured again.
    pub fn is_invalid(&self) -> bool {
        self.measured.is_none()
    }

    /// Measured box size in scene coordinates (rotation applied), measuring if needed.
    pub fn measure(&mut self, measurer: &dyn TextMeasurer) -> Size {
        if let Some(size) = self.measured {
            return size;
        }
        let text = measurer.measure(&self.text, self.font_size);
        let padded = Size::new(
            text.width + 2.0 * self.padding,
            text.height + 2.0 * self.padding,
        );
        // Only quarter turns are produced by the layout.
        let size = if (self.rotation.abs() - 90.0).abs() < f64::EPSILON {
            Size::new(padded.height, padded.width)
        } else {
            padded
        };
        self.measured = Some(size);
        size
    }

    /// Last measured size, if still valid.
    pub fn measured(&self) -> Option<Size> {
        self.measured
    }

    /// Measured box in scene coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        self.measured
            .map(|size| Rect::from_origin_size(self.position, size))
    }
}

/// Everything owned by one data item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemElements {
    /// The slice.
    pub slice: FunnelSlice,
    /// The link towards the next slice.
    pub link: FunnelSlice,
    /// The callout tick.
    pub tick: FunnelTick,
    /// The label.
    pub label: FunnelLabel,
}

impl ItemElements {
    fn new(tick_location: TickLocation) -> Self {
        Self {
            slice: FunnelSlice::default(),
            link: FunnelSlice::default(),
            tick: FunnelTick {
                location: tick_location,
                line: None,
                stroke: Brush::default(),
                disabled: true,
            },
            label: FunnelLabel::new(),
        }
    }

    /// Marks every element as not rendered.
    pub(crate) fn hide_all(&mut self) {
        self.slice.disabled = true;
        self.link.disabled = true;
        self.tick.disabled = true;
        self.tick.line = None;
        self.label.visible = false;
    }
}

/// Arena of per-item elements keyed by item identity.
#[derive(Clone, Debug, Default)]
pub struct ElementArena {
    elements: HashMap<ItemKey, ItemElements>,
}

impl ElementArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }

    /// Returns the elements for `key`, allocating them on first access.
    pub fn get_or_create(&mut self, key: ItemKey, tick_location: TickLocation) -> &mut ItemElements {
        self.elements
            .entry(key)
            .or_insert_with(|| ItemElements::new(tick_location))
    }

    /// Returns the elements for `key`, if allocated.
    pub fn get(&self, key: &ItemKey) -> Option<&ItemElements> {
        self.elements.get(key)
    }

    /// Returns the elements for `key` mutably, if allocated.
    pub fn get_mut(&mut self, key: &ItemKey) -> Option<&mut ItemElements> {
        self.elements.get_mut(key)
    }

    /// Releases the elements owned by `key`.
    pub fn release(&mut self, key: &ItemKey) -> Option<ItemElements> {
        self.elements.remove(key)
    }

    /// Releases elements whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemKey) -> bool) {
        self.elements.retain(|k, _| keep(k));
    }

    /// Number of allocated element sets.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
