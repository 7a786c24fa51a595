//! Geometry primitives and the normalized ↔ CSS pixel mapping.
//!
//! Every position and size that crosses the crate boundary is normalized to
//! `[0, 1]` relative to the native media dimensions. Pointer input arrives in
//! CSS pixels relative to the media container. [`CoordinateMapper`] is the
//! only place that converts between the two.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A point in either normalized media space or CSS pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height, in whichever space the caller is working.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True unless both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// `width / height`, or `None` for an empty size.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() { None } else { Some(self.width / self.height) }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from four edges given in any order.
    ///
    /// The result always has non-negative width and height; `x`/`y` take the
    /// smaller of each edge pair so a flipped drag still yields the same
    /// visual rectangle.
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            x: left.min(right),
            y: top.min(bottom),
            width: (right - left).abs(),
            height: (bottom - top).abs(),
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty slice.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }
        Some(Self::from_edges(left, top, right, bottom))
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rectangle by `d` on every side.
    #[must_use]
    pub fn inflate(&self, d: f64) -> Self {
        Self { x: self.x - d, y: self.y - d, width: self.width + 2.0 * d, height: self.height + 2.0 * d }
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// Converts between normalized media space and CSS pixels for one container.
///
/// The container size is re-measured by the host on every layout change. Until
/// the first measurement arrives the mapper is "unmeasured" and every
/// conversion yields zero instead of failing, so callers tolerate a transient
/// zero-size frame during initial layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper {
    container: Option<Size>,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper already measured at `width × height` CSS pixels.
    #[must_use]
    pub fn with_container(width: f64, height: f64) -> Self {
        let mut mapper = Self::new();
        mapper.set_container(width, height);
        mapper
    }

    /// Record a new container measurement. Empty or non-finite sizes mark
    /// the mapper as unmeasured.
    pub fn set_container(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        self.container = if size.is_empty() { None } else { Some(size) };
    }

    /// The measured container size, if any.
    #[must_use]
    pub fn container(&self) -> Option<Size> {
        self.container
    }

    /// Normalized → CSS pixels. No clamping.
    #[must_use]
    pub fn normalized_to_css(&self, p: Point) -> Point {
        match self.container {
            Some(size) => Point::new(p.x * size.width, p.y * size.height),
            None => Point::default(),
        }
    }

    /// CSS pixels → normalized, clamped into `[0, 1]²` so pointer positions
    /// past the media edges never leave media space.
    #[must_use]
    pub fn css_to_normalized(&self, p: Point) -> Point {
        match self.container {
            Some(size) => Point::new((p.x / size.width).clamp(0.0, 1.0), (p.y / size.height).clamp(0.0, 1.0)),
            None => Point::default(),
        }
    }

    /// Clamp a CSS pixel point into the container.
    #[must_use]
    pub fn clamp_css(&self, p: Point) -> Point {
        match self.container {
            Some(size) => Point::new(p.x.clamp(0.0, size.width), p.y.clamp(0.0, size.height)),
            None => Point::default(),
        }
    }

    /// A CSS pixel displacement as a normalized displacement. Deltas are not
    /// clamped; a shape may legitimately move by more than its own extent.
    #[must_use]
    pub fn delta_to_normalized(&self, dx: f64, dy: f64) -> Point {
        match self.container {
            Some(size) => Point::new(dx / size.width, dy / size.height),
            None => Point::default(),
        }
    }

    /// Normalized rectangle → CSS pixel rectangle.
    #[must_use]
    pub fn rect_to_css(&self, r: Rect) -> Rect {
        match self.container {
            Some(size) => Rect::new(r.x * size.width, r.y * size.height, r.width * size.width, r.height * size.height),
            None => Rect::default(),
        }
    }

    /// CSS pixel rectangle → normalized rectangle.
    #[must_use]
    pub fn rect_to_normalized(&self, r: Rect) -> Rect {
        match self.container {
            Some(size) => Rect::new(r.x / size.width, r.y / size.height, r.width / size.width, r.height / size.height),
            None => Rect::default(),
        }
    }
}
