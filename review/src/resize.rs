//! Corner-aware bounds recomputation for resize gestures.
//!
//! Works in CSS pixels so the minimum-size floor is a visual size,
//! independent of the media's native resolution.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::consts::MIN_RESIZE_PX;
use crate::coords::{Point, Rect};
use crate::input::Corner;

/// Resize solver with a configurable minimum size floor.
#[derive(Debug, Clone, Copy)]
pub struct ResizeSolver {
    /// Smallest accepted width or height, in pixels.
    pub min_size: f64,
}

impl Default for ResizeSolver {
    fn default() -> Self {
        Self { min_size: MIN_RESIZE_PX }
    }
}

impl ResizeSolver {
    #[must_use]
    pub fn new(min_size: f64) -> Self {
        Self { min_size }
    }

    /// Move the edge(s) selected by `corner` to `target`, keeping the
    /// opposite edge(s) pinned.
    ///
    /// With `lock_aspect_ratio`, the axis with the larger relative change
    /// dominates and the other is recomputed from the initial aspect ratio;
    /// the moving edge is then re-derived from its pinned opposite so a
    /// drag through the pinned corner reflects the shape. A locked dimension
    /// of exactly zero keeps positive orientation.
    ///
    /// Returns `None` for an invalid corner or when either resulting side is
    /// below `min_size`; the caller keeps its previous bounds.
    #[must_use]
    pub fn solve(&self, corner: Corner, initial: Rect, target: Point, lock_aspect_ratio: bool) -> Option<Rect> {
        if !corner.is_valid() {
            return None;
        }

        let (mut left, mut top, mut right, mut bottom) = (initial.x, initial.y, initial.right(), initial.bottom());
        if corner.contains(Corner::LEFT) {
            left = target.x;
        } else if corner.contains(Corner::RIGHT) {
            right = target.x;
        }
        if corner.contains(Corner::TOP) {
            top = target.y;
        } else if corner.contains(Corner::BOTTOM) {
            bottom = target.y;
        }

        if lock_aspect_ratio && initial.width > 0.0 && initial.height > 0.0 {
            let aspect = initial.width / initial.height;
            let mut w = right - left;
            let mut h = bottom - top;
            match (corner.moves_x(), corner.moves_y()) {
                (true, true) => {
                    if w.abs() / aspect > h.abs() {
                        h = orientation(h) * w.abs() / aspect;
                    } else {
                        w = orientation(w) * h.abs() * aspect;
                    }
                }
                (true, false) => h = w.abs() / aspect,
                (false, true) => w = h.abs() * aspect,
                (false, false) => {}
            }
            if corner.contains(Corner::LEFT) {
                left = right - w;
            } else {
                right = left + w;
            }
            if corner.contains(Corner::TOP) {
                top = bottom - h;
            } else {
                bottom = top + h;
            }
        }

        let rect = Rect::from_edges(left, top, right, bottom);
        // Negated comparison also rejects NaN.
        if !(rect.width >= self.min_size && rect.height >= self.min_size) {
            return None;
        }
        Some(rect)
    }
}

/// Resize with the default minimum size.
#[must_use]
pub fn resize_bounds(corner: Corner, initial: Rect, target: Point, lock_aspect_ratio: bool) -> Option<Rect> {
    ResizeSolver::default().solve(corner, initial, target, lock_aspect_ratio)
}

fn orientation(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
