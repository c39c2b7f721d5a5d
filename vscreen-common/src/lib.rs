//! Common geometry types shared by the virtual screen crates.
//!
//! This crate provides the integer geometry used across the topology service:
//! - [`Point`] - 2D point with i32 coordinates
//! - [`Rect`] - edge-based rectangle, right and bottom exclusive

use std::fmt;

/// A 2D point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift the point by `(dx, dy)`, wrapping at the i32 range.
    ///
    /// Shifting by `(dx, dy)` and then by `(-dx, -dy)` always returns the
    /// original point.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }
}

/// An axis-aligned rectangle defined by its four edges.
///
/// `right` and `bottom` are exclusive, so a rectangle with `left == right`
/// covers no pixels. Any rectangle with `right <= left` or `bottom <= top`
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The all-zero rectangle.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a new rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from a top-left corner and dimensions.
    ///
    /// The far edges saturate at `i32::MAX`.
    pub const fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(
            x,
            y,
            x.saturating_add(clamp_extent(width)),
            y.saturating_add(clamp_extent(height)),
        )
    }

    /// Width in pixels, zero for inverted rectangles.
    pub const fn width(&self) -> u32 {
        if self.right > self.left {
            self.right.wrapping_sub(self.left) as u32
        } else {
            0
        }
    }

    /// Height in pixels, zero for inverted rectangles.
    pub const fn height(&self) -> u32 {
        if self.bottom > self.top {
            self.bottom.wrapping_sub(self.top) as u32
        } else {
            0
        }
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check whether the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Get the area of the rectangle.
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Intersection of two rectangles, `None` when it is empty.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Check whether the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersect(other).is_some()
    }

    /// Smallest rectangle containing both.
    ///
    /// Empty operands are ignored; the union of two empty rectangles is
    /// [`Rect::EMPTY`].
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Rect::EMPTY,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => Rect::new(
                self.left.min(other.left),
                self.top.min(other.top),
                self.right.max(other.right),
                self.bottom.max(other.bottom),
            ),
        }
    }

    /// Shift all four edges by `(dx, dy)`, wrapping at the i32 range.
    ///
    /// The result is exact whenever the shifted edges are representable.
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left.wrapping_add(dx),
            self.top.wrapping_add(dy),
            self.right.wrapping_add(dx),
            self.bottom.wrapping_add(dy),
        )
    }

    /// The same rectangle seen from a coordinate system whose origin is
    /// `origin`. Edges outside the i32 range saturate, which keeps any
    /// intersection with an in-range rectangle exact.
    pub const fn relative_to(&self, origin: Point) -> Rect {
        Rect::new(
            self.left.saturating_sub(origin.x),
            self.top.saturating_sub(origin.y),
            self.right.saturating_sub(origin.x),
            self.bottom.saturating_sub(origin.y),
        )
    }

    /// Check if a point is contained within this rectangle.
    pub const fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Check whether `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained in everything.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.left >= self.left
                && other.top >= self.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }
}

const fn clamp_extent(v: u32) -> i32 {
    if v > i32::MAX as u32 {
        i32::MAX
    } else {
        v as i32
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
