// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The funnel series: ordered data items, their elements and the layout pass.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::{Line, Point, Rect};
use smallvec::SmallVec;

use crate::aggregate::Aggregates;
use crate::animation::{AnimationHandle, AnimationId, Timeline, TweenEnd, finish_item};
use crate::axis::{Orientation, TickLocation};
use crate::config::{FunnelConfig, LabelContext};
use crate::elements::{ElementArena, FunnelLabel, FunnelSlice, FunnelTick, LabelAlign};
use crate::error::FunnelError;
use crate::geometry::{SliceGeometry, SliceInput, solve_slice};
use crate::item::{DataItem, ItemKey};
use crate::labels::{LabelSpan, arrange_labels};
use crate::marks::FunnelMark;
use crate::measure::TextMeasurer;
use crate::next_value::next_value;
use crate::reveal::RevealPlan;

type Continuation = Box<dyn FnOnce(&mut FunnelSeries)>;

/// A funnel series.
///
/// Owns the ordered data items, one set of elements per item, and the animation timeline.
/// Geometry is recomputed by [`FunnelSeries::run_layout_pass`]; working values move when the
/// caller drives the clock with [`FunnelSeries::advance`].
pub struct FunnelSeries {
    config: FunnelConfig,
    bounds: Rect,
    items: Vec<DataItem>,
    elements: ElementArena,
    timeline: Timeline,
    active_reveal: Option<AnimationHandle>,
    continuations: HashMap<AnimationId, SmallVec<[Continuation; 1]>>,
    aggregates: Aggregates,
    slices_region: Rect,
    labels_region: Rect,
    needs_layout: bool,
}

impl core::fmt::Debug for FunnelSeries {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunnelSeries")
            .field("config", &self.config)
            .field("bounds", &self.bounds)
            .field("items", &self.items)
            .field("elements", &self.elements.len())
            .field("timeline", &self.timeline)
            .field("active_reveal", &self.active_reveal)
            .field("continuations", &self.continuations.len())
            .field("slices_region", &self.slices_region)
            .field("labels_region", &self.labels_region)
            .field("needs_layout", &self.needs_layout)
            .finish_non_exhaustive()
    }
}

impl Default for FunnelSeries {
    fn default() -> Self {
        Self::with_valid_config(FunnelConfig::default())
    }
}

impl FunnelSeries {
    /// Creates an empty series.
    pub fn new(config: FunnelConfig) -> Result<Self, FunnelError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: FunnelConfig) -> Self {
        Self {
            config,
            bounds: Rect::ZERO,
            items: Vec::new(),
            elements: ElementArena::new(),
            timeline: Timeline::new(),
            active_reveal: None,
            continuations: HashMap::new(),
            aggregates: Aggregates::default(),
            slices_region: Rect::ZERO,
            labels_region: Rect::ZERO,
            needs_layout: true,
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &FunnelConfig {
        &self.config
    }

    /// Replaces the configuration. The old one is kept if `config` is invalid.
    pub fn set_config(&mut self, config: FunnelConfig) -> Result<(), FunnelError> {
        config.validate()?;
        self.config = config;
        self.needs_layout = true;
        Ok(())
    }

    /// Sets the rectangle the funnel is laid out in.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
    }

    /// The rectangle the funnel is laid out in.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns `true` if data, bounds, configuration or working values changed since the last
    /// layout pass.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    // --- data ---

    /// Appends an item.
    pub fn push_item(&mut self, item: DataItem) -> Result<(), FunnelError> {
        let len = self.items.len();
        self.insert_item(len, item)
    }

    /// Inserts an item at `index`.
    pub fn insert_item(&mut self, index: usize, item: DataItem) -> Result<(), FunnelError> {
        if self.index_of(item.key).is_some() {
            return Err(FunnelError::DuplicateItem(item.key));
        }
        if index > self.items.len() {
            return Err(FunnelError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        self.needs_layout = true;
        Ok(())
    }

    /// Replaces every item, releasing the elements of keys that are gone.
    pub fn set_items(&mut self, items: Vec<DataItem>) -> Result<(), FunnelError> {
        let mut keys = HashSet::with_capacity(items.len());
        for item in &items {
            if !keys.insert(item.key) {
                return Err(FunnelError::DuplicateItem(item.key));
            }
        }
        for item in &self.items {
            if !keys.contains(&item.key) {
                self.timeline.cancel(item.key);
            }
        }
        self.elements.retain(|key| keys.contains(key));
        self.items = items;
        self.needs_layout = true;
        Ok(())
    }

    /// Changes an item's declared value.
    ///
    /// A running tween for the item is cancelled and its working value jumps to the new value
    /// (or stays at zero while the item is hidden).
    pub fn set_value(&mut self, key: ItemKey, value: Option<f64>) -> Result<(), FunnelError> {
        let index = self.index_of(key).ok_or(FunnelError::UnknownItem(key))?;
        self.timeline.cancel(key);
        let item = &mut self.items[index];
        item.value = value;
        if item.is_hiding {
            item.is_hiding = false;
            item.visible = false;
        }
        item.working_value = if item.visible {
            value.unwrap_or(0.0)
        } else {
            0.0
        };
        self.needs_layout = true;
        Ok(())
    }

    /// Renames an item's category.
    pub fn set_category(
        &mut self,
        key: ItemKey,
        category: impl Into<String>,
    ) -> Result<(), FunnelError> {
        let index = self.index_of(key).ok_or(FunnelError::UnknownItem(key))?;
        self.items[index].category = category.into();
        self.needs_layout = true;
        Ok(())
    }

    /// Removes an item, cancelling its tweens and releasing its elements.
    pub fn remove_item(&mut self, key: ItemKey) -> Result<DataItem, FunnelError> {
        let index = self.index_of(key).ok_or(FunnelError::UnknownItem(key))?;
        self.timeline.cancel(key);
        self.elements.release(&key);
        self.needs_layout = true;
        Ok(self.items.remove(index))
    }

    /// Returns the item for `key`.
    pub fn item(&self, key: ItemKey) -> Option<&DataItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Items in series order.
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    /// Position of `key` in the series.
    pub fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    /// Share of the item's declared value in the sum of all declared values, in percent.
    pub fn percent(&self, key: ItemKey) -> Option<f64> {
        let value = self.item(key)?.value?;
        Some(Aggregates::scan(&self.items).percent(value))
    }

    /// Tooltip text: `"{category}: {percent:.1}% ({value})"`.
    pub fn tooltip_text(&self, key: ItemKey) -> Option<String> {
        let item = self.item(key)?;
        let value = item.value?;
        let percent = self.percent(key)?;
        Some(format!("{}: {percent:.1}% ({value})", item.category))
    }

    // --- layout ---

    /// Aggregates from the last layout pass.
    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    /// Region the slices were laid out in.
    pub fn slices_region(&self) -> Rect {
        self.slices_region
    }

    /// Region the labels were laid out in (equal to the slices region unless labels are
    /// aligned).
    pub fn labels_region(&self) -> Rect {
        self.labels_region
    }

    /// The slice for `key`, as of the last layout pass.
    pub fn slice(&self, key: ItemKey) -> Option<&FunnelSlice> {
        self.elements.get(&key).map(|e| &e.slice)
    }

    /// The link following the slice for `key`.
    pub fn link(&self, key: ItemKey) -> Option<&FunnelSlice> {
        self.elements.get(&key).map(|e| &e.link)
    }

    /// The tick for `key`.
    pub fn tick(&self, key: ItemKey) -> Option<&FunnelTick> {
        self.elements.get(&key).map(|e| &e.tick)
    }

    /// The label for `key`.
    pub fn label(&self, key: ItemKey) -> Option<&FunnelLabel> {
        self.elements.get(&key).map(|e| &e.label)
    }

    /// Scene point at a fractional location of the slice's bounding box, for legend bullets.
    ///
    /// `location` is in axis roles and defaults to `(0.5, 1.0)`.
    pub fn bullet_position(&self, key: ItemKey, location: Option<TickLocation>) -> Option<Point> {
        let slice = self.slice(key)?;
        if slice.disabled {
            return None;
        }
        let location = location.unwrap_or(TickLocation::new(0.5, 1.0));
        let width = slice.top_width.max(slice.bottom_width);
        let stack = slice.offset + slice.length * location.stack;
        let cross = slice.cross_center - width / 2.0 + width * location.cross;
        Some(
            self.config
                .orientation
                .point(self.slices_region.origin(), stack, cross),
        )
    }

    /// Recomputes every element from the current items, bounds and configuration.
    ///
    /// Passes are idempotent: running one twice without changes yields the same geometry.
    pub fn run_layout_pass(&mut self, measurer: &dyn TextMeasurer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("funnel_layout_pass", items = self.items.len()).entered();

        let orientation = self.config.orientation;
        let tick_location = self.config.effective_tick_location();
        let aggregates = Aggregates::scan(&self.items);
        self.aggregates = aggregates;

        // Labels are measured first: the aligned column is sized from them.
        let rotation = orientation.label_rotation();
        let mut label_cross: f64 = 0.0;
        for (index, item) in self.items.iter().enumerate() {
            let elements = self.elements.get_or_create(item.key, tick_location);
            elements.tick.location = tick_location;
            let Some(value) = item.value else {
                continue;
            };
            let ctx = LabelContext {
                index,
                category: &item.category,
                value,
                working_value: item.working_value,
                percent: aggregates.percent(value),
            };
            let label = &mut elements.label;
            label.set_text((self.config.label_formatter)(&ctx));
            label.set_style(
                self.config.label_font_size,
                self.config.label_padding,
                rotation,
            );
            label.fill = self.config.label_fill.clone();
            let size = label.measure(measurer);
            if item.visible {
                label_cross = label_cross.max(orientation.cross_extent(size));
            }
        }

        let (slices_region, labels_region) = split_regions(
            self.bounds,
            orientation,
            self.config.align_labels,
            label_cross,
            self.config.labels_margin,
        );
        self.slices_region = slices_region;
        self.labels_region = labels_region;

        let solved = self.solve_all(orientation, slices_region, aggregates);
        let last_rendered = solved
            .iter()
            .rposition(|g| g.is_some_and(|g| g.advance() > 0.0));

        let aligned = self.config.align_labels;
        let slices_stack = orientation.stack_of(slices_region.origin());
        let labels_stack = orientation.stack_of(labels_region.origin());
        let labels_cross = orientation.cross_of(labels_region.origin());
        let mut spans: Vec<(ItemKey, LabelSpan)> = Vec::new();

        for (index, (item, g)) in self.items.iter().zip(&solved).enumerate() {
            let Some(elements) = self.elements.get_mut(&item.key) else {
                continue;
            };
            let Some(g) = g else {
                elements.hide_all();
                continue;
            };

            elements.slice.set_slice(g);
            elements.slice.fill = self.config.fill_for(index);
            elements.slice.disabled = !item.visible;

            elements.link.set_link(g);
            elements.link.fill = self.config.link_fill_for(index);
            elements.link.disabled = !item.visible
                || g.link_length <= 0.0
                || last_rendered.is_none_or(|last| index >= last);

            let label = &mut elements.label;
            label.visible = item.visible;
            let size = label.measured().unwrap_or_default();
            let stack_anchor = g.offset + g.length * tick_location.stack;
            if aligned {
                let extent = orientation.stack_extent(size);
                let mut span = LabelSpan::new(slices_stack + stack_anchor - extent / 2.0, extent);
                span.visible = item.visible;
                label.align = LabelAlign::Start;
                spans.push((item.key, span));
            } else {
                let anchor =
                    orientation.point(slices_region.origin(), stack_anchor, g.cross_center);
                label.position = anchor - size.to_vec2() / 2.0;
                label.align = LabelAlign::Middle;
                elements.tick.disabled = true;
                elements.tick.line = None;
            }
        }

        if !aligned {
            self.needs_layout = false;
            return;
        }

        let mut arranged: Vec<LabelSpan> = spans.iter().map(|(_, span)| *span).collect();
        arrange_labels(&mut arranged, labels_stack);

        for ((key, _), span) in spans.iter().zip(&arranged) {
            let Some(elements) = self.elements.get_mut(key) else {
                continue;
            };
            elements.label.position = orientation.point(Point::ZERO, span.position, labels_cross);
            if !span.visible {
                elements.tick.disabled = true;
                elements.tick.line = None;
                continue;
            }
            let start = elements
                .slice
                .point_at(orientation, slices_region, elements.tick.location);
            let end = orientation.point(
                Point::ZERO,
                span.position + span.extent / 2.0,
                labels_cross,
            );
            elements.tick.line = Some(Line::new(start, end));
            elements.tick.stroke = self.config.tick_stroke.clone();
            elements.tick.disabled = false;
        }

        self.needs_layout = false;
    }

    fn solve_all(
        &self,
        orientation: Orientation,
        slices_region: Rect,
        aggregates: Aggregates,
    ) -> Vec<Option<SliceGeometry>> {
        let stack_extent = orientation.stack_extent(slices_region.size());
        let cross_extent = orientation.cross_extent(slices_region.size());
        let mut offset = 0.0;
        let mut solved = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.iter().enumerate() {
            let Some(declared_value) = item.value else {
                solved.push(None);
                continue;
            };
            let geometry = solve_slice(&SliceInput {
                working_value: item.working_value,
                declared_value,
                max_value: aggregates.max_value,
                next_value: next_value(&self.items, index).unwrap_or(item.working_value),
                bottom_ratio: self.config.bottom_ratio,
                cross_extent,
                stack_extent,
                link_length: self.config.link_length,
                count: aggregates.count,
                normalized_total: aggregates.normalized_total,
                offset,
            });
            match geometry {
                Some(g) => offset = g.end(),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(key = item.key.0, "non-finite slice skipped");
                }
            }
            solved.push(geometry);
        }
        solved
    }

    /// Renderer-ready primitives for every enabled element, sorted by z-order.
    pub fn marks(&self) -> Vec<FunnelMark> {
        let orientation = self.config.orientation;
        let region = self.slices_region;
        let mut marks = Vec::with_capacity(self.items.len() * 4);
        for item in &self.items {
            let Some(elements) = self.elements.get(&item.key) else {
                continue;
            };
            if !elements.link.disabled {
                marks.push(FunnelMark::link(item.key, &elements.link, orientation, region));
            }
            if !elements.slice.disabled {
                marks.push(FunnelMark::slice(item.key, &elements.slice, orientation, region));
            }
            if !elements.tick.disabled {
                marks.extend(FunnelMark::tick(item.key, &elements.tick));
            }
            if elements.label.visible {
                marks.extend(FunnelMark::label(item.key, &elements.label));
            }
        }
        marks.sort_by_key(|m| m.z_index);
        marks
    }

    // --- animation ---

    /// Current animation time in milliseconds.
    pub fn now(&self) -> f64 {
        self.timeline.now()
    }

    /// Returns `true` while any tween or animation group is pending.
    pub fn is_animating(&self) -> bool {
        !self.timeline.is_idle()
    }

    /// Reveals every item: working values tween from where they are to the declared values.
    ///
    /// `duration` overrides the configured interpolation duration.
    pub fn show(&mut self, duration: Option<f64>) -> AnimationHandle {
        let plan = self.plan(duration);
        let group = self.timeline.begin_group();
        for (index, item) in self.items.iter_mut().enumerate() {
            let target = item.value.unwrap_or(0.0);
            self.timeline.tween(
                group,
                item,
                target,
                plan.delay(index),
                plan.duration,
                self.config.easing,
                TweenEnd::Shown,
            );
        }
        let handle = self.close_group(group);
        #[cfg(feature = "tracing")]
        tracing::debug!(id = handle.id.0, duration = handle.duration, "funnel show scheduled");
        self.active_reveal = Some(handle);
        self.needs_layout = true;
        handle
    }

    /// Hides every item: working values tween to zero and items become invisible at the end.
    ///
    /// An instant hide (explicit or from the configured duration) requested while a timed
    /// reveal is still running is deferred until the reveal completes, and the reveal's handle
    /// is returned. A reveal that is superseded never completes, so its deferred hide is dropped.
    pub fn hide(&mut self, duration: Option<f64>) -> AnimationHandle {
        let resolved = duration.unwrap_or(self.config.interpolation_duration);
        if let Some(reveal) = self.active_reveal {
            if self.timeline.is_running(reveal.id) && reveal.duration > 0.0 && resolved == 0.0 {
                #[cfg(feature = "tracing")]
                tracing::debug!(reveal = reveal.id.0, "funnel hide deferred until reveal ends");
                self.on_complete(reveal.id, Box::new(Self::hide_now));
                return reveal;
            }
        }

        let plan = self.plan(duration);
        let group = self.timeline.begin_group();
        for (index, item) in self.items.iter_mut().enumerate() {
            self.timeline.tween(
                group,
                item,
                0.0,
                plan.delay(index),
                plan.duration,
                self.config.easing,
                TweenEnd::Hidden,
            );
        }
        let handle = self.close_group(group);
        #[cfg(feature = "tracing")]
        tracing::debug!(id = handle.id.0, duration = handle.duration, "funnel hide scheduled");
        self.needs_layout = true;
        handle
    }

    /// Reveals a single item, e.g. from a legend toggle.
    pub fn show_item(
        &mut self,
        key: ItemKey,
        duration: Option<f64>,
    ) -> Result<AnimationHandle, FunnelError> {
        self.tween_item(key, duration, TweenEnd::Shown)
    }

    /// Hides a single item.
    pub fn hide_item(
        &mut self,
        key: ItemKey,
        duration: Option<f64>,
    ) -> Result<AnimationHandle, FunnelError> {
        self.tween_item(key, duration, TweenEnd::Hidden)
    }

    fn tween_item(
        &mut self,
        key: ItemKey,
        duration: Option<f64>,
        end: TweenEnd,
    ) -> Result<AnimationHandle, FunnelError> {
        let index = self.index_of(key).ok_or(FunnelError::UnknownItem(key))?;
        let duration = duration.unwrap_or(self.config.interpolation_duration);
        let group = self.timeline.begin_group();
        let item = &mut self.items[index];
        let target = match end {
            TweenEnd::Shown => item.value.unwrap_or(0.0),
            TweenEnd::Hidden => 0.0,
        };
        self.timeline
            .tween(group, item, target, 0.0, duration, self.config.easing, end);
        self.needs_layout = true;
        Ok(self.close_group(group))
    }

    /// Moves the animation clock to `now` (milliseconds) and runs continuations of animation
    /// groups that completed. Continuations of cancelled groups are dropped.
    ///
    /// Returns `true` if any item changed; a layout pass is then needed.
    pub fn advance(&mut self, now: f64) -> bool {
        let step = self.timeline.advance(now, &mut self.items);
        let mut changed = step.changed;
        for handle in &step.cancelled {
            if self.active_reveal.is_some_and(|r| r.id == handle.id) {
                self.active_reveal = None;
            }
            self.continuations.remove(&handle.id);
        }
        for handle in &step.completed {
            if self.active_reveal.is_some_and(|r| r.id == handle.id) {
                self.active_reveal = None;
            }
            let Some(continuations) = self.continuations.remove(&handle.id) else {
                continue;
            };
            for continuation in continuations {
                continuation(self);
                changed = true;
            }
        }
        if changed {
            self.needs_layout = true;
        }
        changed
    }

    /// Runs `f` once, when the animation group `id` completes.
    ///
    /// `f` is dropped if the group is not running or is cancelled before it completes.
    pub fn on_complete(&mut self, id: AnimationId, f: Box<dyn FnOnce(&mut Self)>) {
        if !self.timeline.is_running(id) {
            return;
        }
        self.continuations.entry(id).or_default().push(f);
    }

    fn hide_now(&mut self) {
        for item in &mut self.items {
            self.timeline.cancel(item.key);
            finish_item(item, 0.0, TweenEnd::Hidden);
        }
        self.needs_layout = true;
    }

    fn plan(&self, duration: Option<f64>) -> RevealPlan {
        RevealPlan::new(
            duration,
            self.config.interpolation_duration,
            0,
            self.items.len(),
        )
        .with_sequence(
            self.config.sequenced_interpolation,
            self.config.sequenced_delay,
        )
    }

    fn close_group(&mut self, group: AnimationId) -> AnimationHandle {
        let now = self.timeline.now();
        self.timeline
            .finish_group(group)
            .unwrap_or(AnimationHandle {
                id: group,
                start: now,
                duration: 0.0,
            })
    }
}

/// Splits `bounds` into the slices region and the labels region.
///
/// With aligned labels the labels get a column of `label_cross + 2 * margin` at the far cross
/// side (right of a vertical funnel, below a horizontal one); otherwise both regions are
/// `bounds`.
fn split_regions(
    bounds: Rect,
    orientation: Orientation,
    aligned: bool,
    label_cross: f64,
    margin: f64,
) -> (Rect, Rect) {
    if !aligned {
        return (bounds, bounds);
    }
    let stack = orientation.stack_extent(bounds.size());
    let cross = orientation.cross_extent(bounds.size());
    let column = (label_cross + 2.0 * margin).min(cross);
    let origin = bounds.origin();
    let slices = orientation.rect(origin, 0.0, 0.0, stack, cross - column);
    let labels = orientation.rect(
        origin,
        margin,
        cross - column + margin,
        (stack - 2.0 * margin).max(0.0),
        (column - 2.0 * margin).max(0.0),
    );
    (slices, labels)
}
