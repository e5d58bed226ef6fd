// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Funnel series configuration.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use peniko::Brush;
use peniko::color::palette::css;

use crate::animation::{EasingFn, ease_out_cubic};
use crate::axis::{Orientation, TickLocation};
use crate::error::ConfigError;

/// Values available to label formatters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelContext<'a> {
    /// Position of the item in the series.
    pub index: usize,
    /// Category name.
    pub category: &'a str,
    /// Declared value.
    pub value: f64,
    /// Current working value.
    pub working_value: f64,
    /// Percentage of the declared value in the series sum.
    pub percent: f64,
}

/// Label text formatter.
pub type LabelFormatter = Arc<dyn Fn(&LabelContext<'_>) -> String>;

/// Configuration of a [`FunnelSeries`](crate::FunnelSeries).
#[derive(Clone)]
pub struct FunnelConfig {
    /// Stacking direction.
    pub orientation: Orientation,
    /// How far a slice's trailing edge is pulled towards the next slice's width, in `[0, 1]`.
    ///
    /// `0` keeps slices rectangular (areas then depict values exactly), `1` makes each slice's
    /// trailing width match the next slice.
    pub bottom_ratio: f64,
    /// Place labels in a column beside the funnel, with ticks, instead of on the slices.
    pub align_labels: bool,
    /// Nominal length of the links between slices.
    pub link_length: f64,
    /// Tick anchor on the slice. `None` uses [`Orientation::default_tick_location`].
    pub tick_location: Option<TickLocation>,
    /// Label font size.
    pub label_font_size: f64,
    /// Padding around label text, on every side.
    pub label_padding: f64,
    /// Margin around the aligned labels column, on every side.
    pub labels_margin: f64,
    /// Default tween duration for show/hide, in milliseconds.
    pub interpolation_duration: f64,
    /// Stagger show/hide by item index.
    pub sequenced_interpolation: bool,
    /// Extra delay per item index when sequenced, in milliseconds.
    pub sequenced_delay: f64,
    /// Easing used by show/hide tweens.
    pub easing: EasingFn,
    /// Slice fills, cycled by item index.
    pub fills: Vec<Brush>,
    /// Alpha multiplier applied to a slice's fill for its link.
    pub link_opacity: f32,
    /// Tick stroke paint.
    pub tick_stroke: Brush,
    /// Label text paint.
    pub label_fill: Brush,
    /// Label text formatter.
    pub label_formatter: LabelFormatter,
}

impl core::fmt::Debug for FunnelConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunnelConfig")
            .field("orientation", &self.orientation)
            .field("bottom_ratio", &self.bottom_ratio)
            .field("align_labels", &self.align_labels)
            .field("link_length", &self.link_length)
            .field("tick_location", &self.tick_location)
            .field("label_font_size", &self.label_font_size)
            .field("label_padding", &self.label_padding)
            .field("labels_margin", &self.labels_margin)
            .field("interpolation_duration", &self.interpolation_duration)
            .field("sequenced_interpolation", &self.sequenced_interpolation)
            .field("sequenced_delay", &self.sequenced_delay)
            .field("easing", &"<fn>")
            .field("fills", &self.fills.len())
            .field("link_opacity", &self.link_opacity)
            .field("tick_stroke", &self.tick_stroke)
            .field("label_fill", &self.label_fill)
            .field("label_formatter", &"<fn>")
            .finish()
    }
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelConfig {
    /// Creates a configuration with the default vertical funnel settings.
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Vertical,
            bottom_ratio: 0.0,
            align_labels: false,
            link_length: 0.0,
            tick_location: None,
            label_font_size: 12.0,
            label_padding: 5.0,
            labels_margin: 10.0,
            interpolation_duration: 1000.0,
            sequenced_interpolation: false,
            sequenced_delay: 0.0,
            easing: ease_out_cubic,
            fills: default_fills(),
            link_opacity: 0.5,
            tick_stroke: css::DARK_GRAY.into(),
            label_fill: css::BLACK.into(),
            label_formatter: Arc::new(|ctx| format!("{:.1}%", ctx.percent)),
        }
    }

    /// Sets the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the bottom ratio.
    pub fn with_bottom_ratio(mut self, bottom_ratio: f64) -> Self {
        self.bottom_ratio = bottom_ratio;
        self
    }

    /// Enables or disables the aligned labels column.
    pub fn with_align_labels(mut self, align_labels: bool) -> Self {
        self.align_labels = align_labels;
        self
    }

    /// Sets the nominal link length.
    pub fn with_link_length(mut self, link_length: f64) -> Self {
        self.link_length = link_length;
        self
    }

    /// Sets an explicit tick anchor.
    pub fn with_tick_location(mut self, location: TickLocation) -> Self {
        self.tick_location = Some(location);
        self
    }

    /// Sets the label font size.
    pub fn with_label_font_size(mut self, font_size: f64) -> Self {
        self.label_font_size = font_size;
        self
    }

    /// Sets the padding around label text.
    pub fn with_label_padding(mut self, padding: f64) -> Self {
        self.label_padding = padding;
        self
    }

    /// Sets the margin around the aligned labels column.
    pub fn with_labels_margin(mut self, margin: f64) -> Self {
        self.labels_margin = margin;
        self
    }

    /// Sets the default show/hide duration, in milliseconds.
    pub fn with_interpolation_duration(mut self, duration: f64) -> Self {
        self.interpolation_duration = duration;
        self
    }

    /// Enables staggered show/hide with `delay` milliseconds per item index.
    pub fn with_sequenced_interpolation(mut self, sequenced: bool, delay: f64) -> Self {
        self.sequenced_interpolation = sequenced;
        self.sequenced_delay = delay;
        self
    }

    /// Sets the easing function.
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the slice fill palette.
    ///
    /// An empty palette falls back to `Brush::default()`.
    pub fn with_fills(mut self, fills: Vec<Brush>) -> Self {
        self.fills = fills;
        self
    }

    /// Sets the link alpha multiplier.
    pub fn with_link_opacity(mut self, opacity: f32) -> Self {
        self.link_opacity = opacity;
        self
    }

    /// Sets the tick stroke paint.
    pub fn with_tick_stroke(mut self, stroke: impl Into<Brush>) -> Self {
        self.tick_stroke = stroke.into();
        self
    }

    /// Sets the label text paint.
    pub fn with_label_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.label_fill = fill.into();
        self
    }

    /// Sets the label text formatter.
    pub fn with_label_formatter(
        mut self,
        f: impl Fn(&LabelContext<'_>) -> String + 'static,
    ) -> Self {
        self.label_formatter = Arc::new(f);
        self
    }

    /// Tick anchor in effect.
    pub fn effective_tick_location(&self) -> TickLocation {
        self.tick_location
            .unwrap_or_else(|| self.orientation.default_tick_location())
    }

    /// Fill for the slice at `index`.
    pub fn fill_for(&self, index: usize) -> Brush {
        if self.fills.is_empty() {
            return Brush::default();
        }
        self.fills[index % self.fills.len()].clone()
    }

    /// Fill for the link following the slice at `index`.
    pub fn link_fill_for(&self, index: usize) -> Brush {
        match self.fill_for(index) {
            Brush::Solid(color) => Brush::Solid(color.multiply_alpha(self.link_opacity)),
            other => other,
        }
    }

    /// Checks every numeric setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bottom_ratio) {
            return Err(ConfigError::BottomRatioOutOfRange(self.bottom_ratio));
        }
        if !self.link_length.is_finite() || self.link_length < 0.0 {
            return Err(ConfigError::InvalidLinkLength(self.link_length));
        }
        for d in [self.interpolation_duration, self.sequenced_delay] {
            if !d.is_finite() || d < 0.0 {
                return Err(ConfigError::InvalidDuration(d));
            }
        }
        if let Some(TickLocation { stack, cross }) = self.tick_location {
            if !(0.0..=1.0).contains(&stack) || !(0.0..=1.0).contains(&cross) {
                return Err(ConfigError::InvalidTickLocation { stack, cross });
            }
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return Err(ConfigError::InvalidLinkOpacity(self.link_opacity));
        }
        for m in [self.label_font_size, self.label_padding, self.labels_margin] {
            if !m.is_finite() || m < 0.0 {
                return Err(ConfigError::InvalidLabelMetric(m));
            }
        }
        Ok(())
    }
}

fn default_fills() -> Vec<Brush> {
    vec![
        css::STEEL_BLUE.into(),
        css::CORNFLOWER_BLUE.into(),
        css::MEDIUM_SEA_GREEN.into(),
        css::GOLDENROD.into(),
        css::TOMATO.into(),
        css::SLATE_BLUE.into(),
        css::DARK_CYAN.into(),
        css::HOT_PINK.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FunnelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.effective_tick_location(),
            TickLocation::new(0.5, 1.0)
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = FunnelConfig::new().with_bottom_ratio(1.5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BottomRatioOutOfRange(1.5))
        );

        let config = FunnelConfig::new().with_link_length(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidLinkLength(-1.0)));

        let config = FunnelConfig::new().with_interpolation_duration(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration(_))
        ));

        let config = FunnelConfig::new().with_tick_location(TickLocation::new(0.5, 2.0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTickLocation {
                stack: 0.5,
                cross: 2.0
            })
        );
    }

    #[test]
    fn fills_cycle_and_links_are_translucent() {
        let config = FunnelConfig::new().with_fills(vec![css::TOMATO.into(), css::GOLD.into()]);
        assert_eq!(config.fill_for(2), Brush::from(css::TOMATO));
        let Brush::Solid(link) = config.link_fill_for(1) else {
            panic!("expected a solid link fill");
        };
        let alpha = link.to_rgba8().a;
        assert!((127..=128).contains(&alpha), "half alpha, got {alpha}");

        let empty = FunnelConfig::new().with_fills(Vec::new());
        assert_eq!(empty.fill_for(0), Brush::default());
    }

    #[test]
    fn default_label_text_is_percent() {
        let config = FunnelConfig::new();
        let ctx = LabelContext {
            index: 0,
            category: "a",
            value: 25.0,
            working_value: 25.0,
            percent: 12.345,
        };
        assert_eq!((config.label_formatter)(&ctx), "12.3%");
    }
}
