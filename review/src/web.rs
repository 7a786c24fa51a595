//! Browser bindings.
//!
//! Everything in here touches the DOM. The state machines in [`crate::engine`]
//! and [`crate::compositor`] stay testable without a browser; this module
//! wires them to `<video>`, `<canvas>` and the container element.

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlMediaElement, HtmlVideoElement};

use crate::compositor::{Compositor, CompositorEvent};
use crate::coords::{Point, Rect, Size};
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Key, Modifiers};
use crate::loader::MediaFailure;
use crate::render::{FrameSink, RenderError};
use crate::sync::{Side, VideoSource};

/// Wall-clock milliseconds, the time base every `now_ms` argument uses.
#[must_use]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// CSS-pixel size of an element as laid out.
#[must_use]
pub fn measure(element: &Element) -> Size {
    let rect = element.get_bounding_client_rect();
    Size::new(rect.width(), rect.height())
}

/// Map a DOM `MouseEvent.button` value.
#[must_use]
pub fn dom_button(button: i16) -> Option<Button> {
    match button {
        0 => Some(Button::Primary),
        1 => Some(Button::Middle),
        2 => Some(Button::Secondary),
        _ => None,
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// =============================================================
// <video>
// =============================================================

impl VideoSource for HtmlVideoElement {
    fn load(&mut self, url: &str) {
        let media: &HtmlMediaElement = self;
        media.set_src(url);
        media.load();
    }

    fn current_time(&self) -> f64 {
        HtmlMediaElement::current_time(self)
    }

    fn seek(&mut self, time: f64) {
        self.set_current_time(time);
    }

    fn play(&mut self) {
        // Autoplay policy rejections surface through the returned promise;
        // a synchronous error means the element could not start at all.
        if let Err(e) = HtmlMediaElement::play(self) {
            warn!(src = %self.src(), error = %describe(&e), "video play failed");
        }
    }

    fn pause(&mut self) {
        if let Err(e) = HtmlMediaElement::pause(self) {
            warn!(src = %self.src(), error = %describe(&e), "video pause failed");
        }
    }

    fn set_muted(&mut self, muted: bool) {
        HtmlMediaElement::set_muted(self, muted);
    }
}

/// Diagnostics for a video's `error` event.
#[must_use]
pub fn media_failure(video: &HtmlVideoElement) -> MediaFailure {
    let error = video.error();
    MediaFailure {
        code: error.as_ref().map(web_sys::MediaError::code),
        message: error.map_or_else(|| "unknown media error".to_owned(), |e| e.message()),
        ready_state: video.ready_state(),
    }
}

// =============================================================
// <canvas>
// =============================================================

/// The two output canvases with their 2d contexts.
pub struct CanvasPair {
    primary: (HtmlCanvasElement, CanvasRenderingContext2d),
    comparison: (HtmlCanvasElement, CanvasRenderingContext2d),
}

impl CanvasPair {
    /// # Errors
    ///
    /// Returns [`RenderError::Context`] if either canvas has no 2d context.
    pub fn new(primary: HtmlCanvasElement, comparison: HtmlCanvasElement) -> Result<Self, RenderError> {
        let primary_ctx = context(&primary, Side::Primary)?;
        let comparison_ctx = context(&comparison, Side::Comparison)?;
        Ok(Self { primary: (primary, primary_ctx), comparison: (comparison, comparison_ctx) })
    }

    fn target(&self, side: Side) -> &(HtmlCanvasElement, CanvasRenderingContext2d) {
        match side {
            Side::Primary => &self.primary,
            Side::Comparison => &self.comparison,
        }
    }
}

fn context(canvas: &HtmlCanvasElement, side: Side) -> Result<CanvasRenderingContext2d, RenderError> {
    match canvas.get_context("2d") {
        Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().map_err(|_| RenderError::Context(side)),
        Ok(None) | Err(_) => Err(RenderError::Context(side)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

impl FrameSink<HtmlVideoElement> for CanvasPair {
    fn configure(&mut self, target: Side, size: Size) -> Result<(), RenderError> {
        let (canvas, _) = self.target(target);
        canvas.set_width(pixels(size.width));
        canvas.set_height(pixels(size.height));
        Ok(())
    }

    fn clear(&mut self, target: Side) -> Result<(), RenderError> {
        let (canvas, ctx) = self.target(target);
        ctx.clear_rect(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
        Ok(())
    }

    fn draw(&mut self, target: Side, video: &HtmlVideoElement, dest: Rect, alpha: f64) -> Result<(), RenderError> {
        let (_, ctx) = self.target(target);
        ctx.set_global_alpha(alpha);
        let drawn =
            ctx.draw_image_with_html_video_element_and_dw_and_dh(video, dest.x, dest.y, dest.width, dest.height);
        ctx.set_global_alpha(1.0);
        drawn.map_err(|e| RenderError::Draw { target, reason: describe(&e) })
    }
}

// =============================================================
// Surfaces
// =============================================================

/// The annotation layer bound to its container element. Pointer events
/// arrive in client coordinates and are made container-relative here.
pub struct ReviewSurface {
    container: Element,
    pub core: EngineCore,
}

impl ReviewSurface {
    #[must_use]
    pub fn new(container: Element) -> Self {
        Self { container, core: EngineCore::new() }
    }

    fn local(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.container.get_bounding_client_rect();
        Point::new(client_x - rect.left(), client_y - rect.top())
    }

    /// Re-measure the container (call from a `ResizeObserver`).
    pub fn measure(&mut self) -> Vec<Action> {
        let size = measure(&self.container);
        self.core.set_container(size.width, size.height)
    }

    pub fn on_pointer_down(&mut self, client_x: f64, client_y: f64, button: i16, modifiers: Modifiers) -> Vec<Action> {
        let Some(button) = dom_button(button) else {
            return Vec::new();
        };
        let pt = self.local(client_x, client_y);
        self.core.on_pointer_down(pt, button, modifiers, now_ms())
    }

    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, modifiers: Modifiers) -> Vec<Action> {
        let pt = self.local(client_x, client_y);
        self.core.on_pointer_move(pt, modifiers, now_ms())
    }

    pub fn on_pointer_up(&mut self, client_x: f64, client_y: f64, button: i16, modifiers: Modifiers) -> Vec<Action> {
        let Some(button) = dom_button(button) else {
            return Vec::new();
        };
        let pt = self.local(client_x, client_y);
        self.core.on_pointer_up(pt, button, modifiers, now_ms())
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel(now_ms())
    }

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(&Key(key.to_owned()), modifiers, now_ms())
    }

    /// Poll timers (debounced resizes, overlay expiry).
    pub fn tick(&mut self) -> Vec<Action> {
        self.core.tick(now_ms())
    }
}

/// The compositor bound to real `<video>` and `<canvas>` elements.
pub struct CompareSurface {
    container: Element,
    canvases: CanvasPair,
    pub compositor: Compositor<HtmlVideoElement>,
}

impl CompareSurface {
    /// # Errors
    ///
    /// Returns [`RenderError::Context`] if a canvas has no 2d context.
    pub fn new(
        container: Element,
        primary: HtmlVideoElement,
        comparison: HtmlVideoElement,
        canvases: (HtmlCanvasElement, HtmlCanvasElement),
    ) -> Result<Self, RenderError> {
        let canvases = CanvasPair::new(canvases.0, canvases.1)?;
        Ok(Self { container, canvases, compositor: Compositor::new(primary, comparison) })
    }

    pub fn measure(&mut self) -> Vec<CompositorEvent> {
        let size = measure(&self.container);
        self.compositor.set_viewport(size.width, size.height, now_ms())
    }

    /// `loadedmetadata` fired on one side.
    pub fn on_loaded_metadata(&mut self, side: Side) -> Vec<CompositorEvent> {
        let video = self.compositor.video(side);
        let (width, height, duration) =
            (f64::from(video.video_width()), f64::from(video.video_height()), video.duration());
        self.compositor.on_metadata(side, width, height, duration, now_ms())
    }

    /// `error` fired on one side.
    pub fn on_media_error(&mut self, side: Side) {
        let failure = media_failure(self.compositor.video(side));
        self.compositor.on_error(side, failure);
    }

    pub fn set_frame(&mut self, frame: u32) -> Vec<CompositorEvent> {
        self.compositor.set_frame(frame, now_ms())
    }

    pub fn set_playing(&mut self, playing: bool) -> Vec<CompositorEvent> {
        self.compositor.set_playing(playing, now_ms())
    }

    pub fn tick(&mut self) -> Vec<CompositorEvent> {
        self.compositor.tick(now_ms())
    }

    /// # Errors
    ///
    /// Returns the failing canvas's [`RenderError`].
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.compositor.render(&mut self.canvases)
    }
}
