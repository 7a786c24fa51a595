//! Canvas layout for the two videos: side-by-side, stacked, or overlaid.
//!
//! Each video is scaled to fit its partition while keeping its own aspect
//! ratio, choosing whichever of scale-by-width or scale-by-height fits and
//! covers more area, then centered in the partition.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
use crate::coords::{Rect, Size};

/// How the two videos share the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    /// Primary on the left, comparison on the right.
    #[default]
    SplitHorizontal,
    /// Primary on top, comparison below.
    SplitVertical,
    /// Comparison drawn over primary with an opacity blend.
    Overlay,
}

/// Where each video is drawn, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLayout {
    pub mode: CompareMode,
    pub viewport: Size,
    pub primary: Rect,
    pub comparison: Rect,
}

impl CanvasLayout {
    #[must_use]
    pub fn primary_size(&self) -> Size {
        Size::new(self.primary.width, self.primary.height)
    }

    #[must_use]
    pub fn comparison_size(&self) -> Size {
        Size::new(self.comparison.width, self.comparison.height)
    }
}

/// Clamp a split ratio into the allowed range. NaN maps to the lower bound.
#[must_use]
pub fn clamp_split_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { MIN_SPLIT_RATIO } else { ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO) }
}

/// Largest size with `aspect` that fits in `avail`.
///
/// Unknown or invalid aspect fills `avail`.
#[must_use]
pub fn fit(avail: Size, aspect: Option<f64>) -> Size {
    if avail.is_empty() {
        return Size::default();
    }
    let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) else {
        return avail;
    };
    let by_width = Size::new(avail.width, avail.width / aspect);
    let by_height = Size::new(avail.height * aspect, avail.height);
    let width_fits = by_width.height <= avail.height;
    let height_fits = by_height.width <= avail.width;
    match (width_fits, height_fits) {
        (true, true) => {
            if by_width.area() >= by_height.area() {
                by_width
            } else {
                by_height
            }
        }
        (true, false) => by_width,
        (false, true) => by_height,
        (false, false) => Size::default(),
    }
}

fn centered(partition: Rect, size: Size) -> Rect {
    Rect::new(
        partition.x + (partition.width - size.width) * 0.5,
        partition.y + (partition.height - size.height) * 0.5,
        size.width,
        size.height,
    )
}

/// Layout computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSolver;

impl LayoutSolver {
    /// Lay out both videos, each with its own aspect ratio.
    #[must_use]
    pub fn solve(
        mode: CompareMode,
        split_ratio: f64,
        viewport: Size,
        primary_aspect: Option<f64>,
        comparison_aspect: Option<f64>,
    ) -> CanvasLayout {
        let ratio = clamp_split_ratio(split_ratio);
        let (first, second) = match mode {
            CompareMode::SplitHorizontal => {
                let w = viewport.width * ratio;
                (
                    Rect::new(0.0, 0.0, w, viewport.height),
                    Rect::new(w, 0.0, viewport.width - w, viewport.height),
                )
            }
            CompareMode::SplitVertical => {
                let h = viewport.height * ratio;
                (
                    Rect::new(0.0, 0.0, viewport.width, h),
                    Rect::new(0.0, h, viewport.width, viewport.height - h),
                )
            }
            CompareMode::Overlay => {
                let full = Rect::new(0.0, 0.0, viewport.width, viewport.height);
                (full, full)
            }
        };
        let primary = centered(first, fit(Size::new(first.width, first.height), primary_aspect));
        let comparison = centered(second, fit(Size::new(second.width, second.height), comparison_aspect));
        CanvasLayout { mode, viewport, primary, comparison }
    }

    /// Both videos sharing one aspect ratio.
    #[must_use]
    pub fn solve_uniform(mode: CompareMode, split_ratio: f64, viewport: Size, aspect: f64) -> CanvasLayout {
        Self::solve(mode, split_ratio, viewport, Some(aspect), Some(aspect))
    }
}
