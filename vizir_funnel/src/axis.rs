// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mapping for funnel orientations.
//!
//! Layout is computed in two named axis roles:
//! - the **stack axis**, along which slices follow each other, and
//! - the **cross axis**, along which slice widths encode magnitude.
//!
//! [`Orientation`] maps those roles onto scene `x`/`y`, so a single geometry routine serves
//! both vertical and horizontal funnels.

use kurbo::{Point, Rect, Size};

/// Direction in which slices are stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Slices stack top to bottom; widths run along `x`.
    #[default]
    Vertical,
    /// Slices stack left to right; widths run along `y`.
    Horizontal,
}

/// Fractional anchor of a tick on its slice, in axis roles.
///
/// `stack` is measured from the slice's top edge along its length, `cross` from the slice's
/// left (vertical) or top (horizontal) edge across its width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickLocation {
    /// Fraction along the stack axis.
    pub stack: f64,
    /// Fraction along the cross axis.
    pub cross: f64,
}

impl TickLocation {
    /// Creates a tick location.
    pub const fn new(stack: f64, cross: f64) -> Self {
        Self { stack, cross }
    }
}

impl Orientation {
    /// Extent of `size` along the stack axis.
    pub fn stack_extent(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// Extent of `size` along the cross axis.
    pub fn cross_extent(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.width,
            Self::Horizontal => size.height,
        }
    }

    /// Stack-axis coordinate of `p`.
    pub fn stack_of(self, p: Point) -> f64 {
        match self {
            Self::Vertical => p.y,
            Self::Horizontal => p.x,
        }
    }

    /// Cross-axis coordinate of `p`.
    pub fn cross_of(self, p: Point) -> f64 {
        match self {
            Self::Vertical => p.x,
            Self::Horizontal => p.y,
        }
    }

    /// Maps axis-role coordinates relative to `origin` into a scene point.
    pub fn point(self, origin: Point, stack: f64, cross: f64) -> Point {
        match self {
            Self::Vertical => Point::new(origin.x + cross, origin.y + stack),
            Self::Horizontal => Point::new(origin.x + stack, origin.y + cross),
        }
    }

    /// Builds a size from axis-role extents.
    pub fn size(self, stack: f64, cross: f64) -> Size {
        match self {
            Self::Vertical => Size::new(cross, stack),
            Self::Horizontal => Size::new(stack, cross),
        }
    }

    /// Builds a rectangle from an axis-role origin and extents.
    pub fn rect(self, origin: Point, stack: f64, cross: f64, stack_len: f64, cross_len: f64) -> Rect {
        Rect::from_origin_size(
            self.point(origin, stack, cross),
            self.size(stack_len, cross_len),
        )
    }

    /// Default tick anchor: middle of the slice length, at its far cross edge.
    ///
    /// For a vertical funnel that is the right edge, for a horizontal one the bottom edge.
    pub fn default_tick_location(self) -> TickLocation {
        TickLocation::new(0.5, 1.0)
    }

    /// Label rotation in degrees.
    pub fn label_rotation(self) -> f64 {
        match self {
            Self::Vertical => 0.0,
            Self::Horizontal => -90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_roles_transpose() {
        let size = Size::new(200.0, 400.0);
        assert_eq!(Orientation::Vertical.stack_extent(size), 400.0);
        assert_eq!(Orientation::Vertical.cross_extent(size), 200.0);
        assert_eq!(Orientation::Horizontal.stack_extent(size), 200.0);
        assert_eq!(Orientation::Horizontal.cross_extent(size), 400.0);
    }

    #[test]
    fn points_round_trip_through_roles() {
        let origin = Point::new(10.0, 20.0);
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let p = orientation.point(origin, 3.0, 7.0);
            assert_eq!(orientation.stack_of(p) - orientation.stack_of(origin), 3.0);
            assert_eq!(orientation.cross_of(p) - orientation.cross_of(origin), 7.0);
        }
    }

    #[test]
    fn rect_spans_both_roles() {
        let r = Orientation::Horizontal.rect(Point::ZERO, 5.0, 1.0, 10.0, 2.0);
        assert_eq!(r, Rect::new(5.0, 1.0, 15.0, 3.0));
        let r = Orientation::Vertical.rect(Point::ZERO, 5.0, 1.0, 10.0, 2.0);
        assert_eq!(r, Rect::new(1.0, 5.0, 3.0, 15.0));
    }
}
