// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Funnel chart layout for VizIR.
//!
//! A [`FunnelSeries`] turns an ordered list of categorical values into stacked trapezoid
//! slices whose widths encode magnitude, plus:
//! - **links** joining each slice to the next shown one,
//! - **labels**, either centered on the slices or arranged in a column beside them, and
//! - **ticks** connecting slices to aligned labels.
//!
//! Layout is computed in axis roles (stack and cross) and mapped onto scene coordinates by
//! [`Orientation`], so vertical and horizontal funnels share one solver.
//!
//! Reveal and hide animations interpolate each item's working value. The crate owns no clock:
//! callers drive time with [`FunnelSeries::advance`] and then run a layout pass.
//!
//! Text shaping is out of scope; labels are sized through a [`TextMeasurer`] and emitted as
//! unshaped strings by [`FunnelSeries::marks`].

#![no_std]

extern crate alloc;

mod aggregate;
mod animation;
mod axis;
mod config;
mod elements;
mod error;
#[cfg(not(feature = "std"))]
mod float;
#[cfg(test)]
mod funnel_tests;
mod geometry;
mod item;
mod labels;
mod marks;
mod measure;
mod next_value;
mod reveal;
mod series;
mod z_order;

pub use aggregate::Aggregates;
pub use animation::{
    Advance, AnimationHandle, AnimationId, EasingFn, Timeline, TweenEnd, ease_out_cubic, linear,
};
pub use axis::{Orientation, TickLocation};
pub use config::{FunnelConfig, LabelContext, LabelFormatter};
pub use elements::{ElementArena, FunnelLabel, FunnelSlice, FunnelTick, ItemElements, LabelAlign};
pub use error::{ConfigError, FunnelError};
pub use geometry::{SliceGeometry, SliceInput, solve_slice};
pub use item::{DataItem, ItemKey};
pub use labels::{LabelSpan, arrange_labels};
pub use marks::{FunnelMark, MarkPayload, trapezoid_path};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use next_value::{next_eligible_index, next_value};
pub use reveal::{RevealPlan, sequenced_delay};
pub use series::FunnelSeries;
pub use z_order::*;
