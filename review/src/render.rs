//! Rendering: draws the current frame of each video to its canvas.
//!
//! [`FrameSink`] is the only seam that touches canvases; the browser
//! implementation lives in [`crate::web`]. The renderer reads the layout and
//! the two sources and produces pixels. It does not mutate compositor state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::coords::{Rect, Size};
use crate::layout::{CanvasLayout, CompareMode};
use crate::sync::Side;

/// A canvas draw failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("no 2d context for {0:?} canvas")]
    Context(Side),
    #[error("draw to {target:?} canvas failed: {reason}")]
    Draw { target: Side, reason: String },
}

/// The two output canvases.
pub trait FrameSink<V: ?Sized> {
    /// Set a canvas's backing size in pixels. Clears it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the canvas cannot be resized.
    fn configure(&mut self, target: Side, size: Size) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns [`RenderError`] if the canvas cannot be cleared.
    fn clear(&mut self, target: Side) -> Result<(), RenderError>;

    /// Draw the current frame of `video` into `dest` on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the draw call fails.
    fn draw(&mut self, target: Side, video: &V, dest: Rect, alpha: f64) -> Result<(), RenderError>;
}

/// Pixel size a canvas gets for a laid-out rectangle.
#[must_use]
pub fn canvas_size(rect: Rect) -> Size {
    Size::new(rect.width.round().max(0.0), rect.height.round().max(0.0))
}

/// Draws both videos according to a layout.
///
/// Canvas sizes are only pushed to the sink when they change, since
/// resizing a canvas discards its contents.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    configured: [Option<Size>; 2],
    frames: u64,
}

impl FrameRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forget configured sizes so the next render resizes both canvases.
    pub fn invalidate(&mut self) {
        self.configured = [None, None];
    }

    /// Draw one frame.
    ///
    /// Split modes draw each video filling its own canvas. Overlay draws both
    /// into the primary canvas, the comparison at `overlay_opacity`, and
    /// leaves the comparison canvas empty.
    ///
    /// # Errors
    ///
    /// Returns the first [`RenderError`] the sink reports.
    pub fn render<V, S>(
        &mut self,
        layout: &CanvasLayout,
        overlay_opacity: f64,
        primary: &V,
        comparison: &V,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        V: ?Sized,
        S: FrameSink<V> + ?Sized,
    {
        let primary_size = canvas_size(layout.primary);
        let full = |size: Size| Rect::new(0.0, 0.0, size.width, size.height);

        match layout.mode {
            CompareMode::SplitHorizontal | CompareMode::SplitVertical => {
                let comparison_size = canvas_size(layout.comparison);
                self.configure(sink, Side::Primary, primary_size)?;
                self.configure(sink, Side::Comparison, comparison_size)?;
                sink.clear(Side::Primary)?;
                sink.draw(Side::Primary, primary, full(primary_size), 1.0)?;
                sink.clear(Side::Comparison)?;
                sink.draw(Side::Comparison, comparison, full(comparison_size), 1.0)?;
            }
            CompareMode::Overlay => {
                self.configure(sink, Side::Primary, primary_size)?;
                self.configure(sink, Side::Comparison, Size::default())?;
                sink.clear(Side::Primary)?;
                sink.draw(Side::Primary, primary, full(primary_size), 1.0)?;
                sink.draw(Side::Primary, comparison, full(primary_size), overlay_opacity.clamp(0.0, 1.0))?;
            }
        }
        self.frames += 1;
        Ok(())
    }

    fn configure<V, S>(&mut self, sink: &mut S, target: Side, size: Size) -> Result<(), RenderError>
    where
        V: ?Sized,
        S: FrameSink<V> + ?Sized,
    {
        let slot = match target {
            Side::Primary => 0,
            Side::Comparison => 1,
        };
        if self.configured[slot] == Some(size) {
            return Ok(());
        }
        sink.configure(target, size)?;
        self.configured[slot] = Some(size);
        Ok(())
    }
}
