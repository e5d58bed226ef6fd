// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use core::fmt;

use crate::item::ItemKey;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `bottom_ratio` is outside `[0, 1]`.
    BottomRatioOutOfRange(f64),
    /// `link_length` is negative or not finite.
    InvalidLinkLength(f64),
    /// A duration or delay is negative or not finite.
    InvalidDuration(f64),
    /// A tick location fraction is outside `[0, 1]`.
    InvalidTickLocation {
        /// Fraction along the stack axis.
        stack: f64,
        /// Fraction along the cross axis.
        cross: f64,
    },
    /// `link_opacity` is outside `[0, 1]`.
    InvalidLinkOpacity(f32),
    /// A label metric (font size, padding, margin) is negative or not finite.
    InvalidLabelMetric(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BottomRatioOutOfRange(v) => write!(f, "bottom ratio {v} is outside [0, 1]"),
            Self::InvalidLinkLength(v) => write!(f, "invalid link length {v}"),
            Self::InvalidDuration(v) => write!(f, "invalid duration {v}"),
            Self::InvalidTickLocation { stack, cross } => {
                write!(f, "tick location ({stack}, {cross}) is outside [0, 1]")
            }
            Self::InvalidLinkOpacity(v) => write!(f, "link opacity {v} is outside [0, 1]"),
            Self::InvalidLabelMetric(v) => write!(f, "invalid label metric {v}"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors returned by [`FunnelSeries`](crate::FunnelSeries) operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FunnelError {
    /// No item with this key is in the series.
    UnknownItem(ItemKey),
    /// An item with this key is already in the series.
    DuplicateItem(ItemKey),
    /// An insertion index is past the end of the series.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of items.
        len: usize,
    },
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for FunnelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(key) => write!(f, "unknown item {}", key.0),
            Self::DuplicateItem(key) => write!(f, "duplicate item {}", key.0),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} items")
            }
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl core::error::Error for FunnelError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for FunnelError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
