//! Dual-video sync compositor.
//!
//! Owns both decoders and keeps them frame-synchronized under play, pause,
//! seek and resize. Nothing is drawn until three readiness conditions hold:
//! primary metadata loaded, comparison metadata loaded, and a canvas layout
//! computed. Loading a different URL on either side resets all three.
//!
//! Like [`crate::engine::EngineCore`], every input returns the events the
//! host should act on, and time is passed in explicitly. The host calls
//! [`Compositor::render`] whenever it sees [`CompositorEvent::RenderNeeded`].

#[cfg(test)]
#[path = "compositor_test.rs"]
mod compositor_test;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::FrameClock;
use crate::config::CompositorConfig;
use crate::coords::Size;
use crate::layout::{CanvasLayout, CompareMode, LayoutSolver, clamp_split_ratio};
use crate::loader::{MediaFailure, VideoLoader};
use crate::render::{FrameRenderer, FrameSink, RenderError};
use crate::schedule::Coalescer;
use crate::sync::{Side, SyncScheduler, VideoSource, master_slave};

/// Events returned from compositor inputs for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum CompositorEvent {
    /// A source finished loading its metadata.
    VideoReady { side: Side, width: f64, height: f64 },
    /// Canvas sizes changed.
    LayoutChanged(CanvasLayout),
    /// Playback advanced to `frame` at master time `time`.
    FrameUpdate { frame: u32, time: f64 },
    /// Call [`Compositor::render`].
    RenderNeeded,
}

/// The only pending timer: the post-seek redraw.
type RenderTimer = Coalescer<(), ()>;

/// A synchronized pair of videos drawn side by side or overlaid.
pub struct Compositor<V> {
    primary: V,
    comparison: V,
    primary_loader: VideoLoader,
    comparison_loader: VideoLoader,
    canvas_initialized: bool,
    clock: FrameClock,
    sync: SyncScheduler,
    renderer: FrameRenderer,
    mode: CompareMode,
    split_ratio: f64,
    overlay_opacity: f64,
    viewport: Option<Size>,
    layout: Option<CanvasLayout>,
    frame: u32,
    seek_render: RenderTimer,
}

impl<V: VideoSource> Compositor<V> {
    #[must_use]
    pub fn new(primary: V, comparison: V) -> Self {
        Self::with_config(primary, comparison, CompositorConfig::default())
    }

    #[must_use]
    pub fn with_config(primary: V, comparison: V, config: CompositorConfig) -> Self {
        let mut compositor = Self {
            primary,
            comparison,
            primary_loader: VideoLoader::new(Side::Primary),
            comparison_loader: VideoLoader::new(Side::Comparison),
            canvas_initialized: false,
            clock: FrameClock::new(config.fps),
            sync: SyncScheduler::new(config.playback_drift_secs),
            renderer: FrameRenderer::new(),
            mode: CompareMode::default(),
            split_ratio: clamp_split_ratio(config.split_ratio),
            overlay_opacity: config.overlay_opacity.clamp(0.0, 1.0),
            viewport: None,
            layout: None,
            frame: 0,
            seek_render: Coalescer::new(config.seek_render_delay_ms),
        };
        compositor.apply_mute();
        compositor
    }

    // --- Sources ---

    /// Load a new pair of URLs. Identical URLs are a no-op; any change
    /// pauses both decoders and resets readiness.
    pub fn load_pair(&mut self, primary_url: &str, comparison_url: &str) -> Vec<CompositorEvent> {
        let same = self.primary_loader.url() == Some(primary_url)
            && self.comparison_loader.url() == Some(comparison_url)
            && !self.primary_loader.is_failed()
            && !self.comparison_loader.is_failed();
        if same {
            return Vec::new();
        }

        self.primary.pause();
        self.comparison.pause();
        self.primary_loader.load(primary_url);
        self.comparison_loader.load(comparison_url);
        self.primary.load(primary_url);
        self.comparison.load(comparison_url);
        self.apply_mute();

        self.canvas_initialized = false;
        self.layout = None;
        self.seek_render.clear();
        self.renderer.invalidate();
        Vec::new()
    }

    /// A source reported its natural size and duration.
    pub fn on_metadata(&mut self, side: Side, width: f64, height: f64, duration: f64, now_ms: f64) -> Vec<CompositorEvent> {
        let was_ready = self.is_ready();
        let Some(natural) = self.loader_mut(side).on_metadata(width, height, duration) else {
            return Vec::new();
        };
        let mut events = vec![CompositorEvent::VideoReady { side, width: natural.width, height: natural.height }];
        events.extend(self.relayout());
        events.extend(self.on_readiness(was_ready, now_ms));
        events
    }

    /// A source failed to load. It stays failed until the next `load_pair`.
    pub fn on_error(&mut self, side: Side, failure: MediaFailure) {
        self.loader_mut(side).on_error(failure);
        if self.sync.is_playing() {
            self.primary.pause();
            self.comparison.pause();
        }
    }

    // --- Layout ---

    /// The container was measured.
    pub fn set_viewport(&mut self, width: f64, height: f64, now_ms: f64) -> Vec<CompositorEvent> {
        let viewport = Size::new(width, height);
        let viewport = if viewport.is_empty() { None } else { Some(viewport) };
        if self.viewport == viewport {
            return Vec::new();
        }
        let was_ready = self.is_ready();
        self.viewport = viewport;
        let mut events = self.relayout();
        events.extend(self.on_readiness(was_ready, now_ms));
        events
    }

    /// Move the divider. Clamped to `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
    /// Only the layout is recomputed; the decoders are untouched.
    pub fn set_split_ratio(&mut self, ratio: f64) -> Vec<CompositorEvent> {
        let ratio = clamp_split_ratio(ratio);
        if (ratio - self.split_ratio).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.split_ratio = ratio;
        self.relayout()
    }

    pub fn set_mode(&mut self, mode: CompareMode) -> Vec<CompositorEvent> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        self.relayout()
    }

    /// Comparison-layer opacity in overlay mode, clamped to `[0, 1]`.
    pub fn set_overlay_opacity(&mut self, opacity: f64) -> Vec<CompositorEvent> {
        let opacity = if opacity.is_nan() { self.overlay_opacity } else { opacity.clamp(0.0, 1.0) };
        if (opacity - self.overlay_opacity).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.overlay_opacity = opacity;
        if self.mode == CompareMode::Overlay && self.is_ready() {
            vec![CompositorEvent::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Timeline ---

    /// Frame rate for frame ↔ time conversion. Invalid rates fall back to the default.
    pub fn set_fps(&mut self, fps: f64) {
        self.clock = FrameClock::new(fps);
    }

    /// The external player moved to `frame`. While paused, each video is
    /// seeked only if it is more than one frame off, and the redraw waits
    /// for the decoder when a seek was issued.
    pub fn set_frame(&mut self, frame: u32, now_ms: f64) -> Vec<CompositorEvent> {
        self.frame = frame;
        if !self.is_ready() || self.sync.is_playing() {
            return Vec::new();
        }
        self.present_frame(now_ms)
    }

    pub fn set_playing(&mut self, playing: bool, now_ms: f64) -> Vec<CompositorEvent> {
        if self.sync.is_playing() == playing {
            return Vec::new();
        }
        self.sync.set_playing(playing);
        if !self.is_ready() {
            return Vec::new();
        }
        if playing {
            debug!("playback started");
            self.seek_render.clear();
            self.primary.play();
            self.comparison.play();
            Vec::new()
        } else {
            debug!("playback paused");
            self.primary.pause();
            self.comparison.pause();
            let (master, _) = master_slave(&mut self.primary, &mut self.comparison, self.sync.master());
            self.frame = self.clock.frame_at(master.current_time());
            if self.sync.align(&mut self.primary, &mut self.comparison, &self.clock) {
                self.seek_render.schedule((), (), now_ms);
                Vec::new()
            } else {
                vec![CompositorEvent::RenderNeeded]
            }
        }
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.sync.set_synced(synced);
    }

    /// Choose which video's timeline is authoritative. The slave is muted.
    pub fn set_sync_master(&mut self, master: Side) {
        self.sync.set_master(master);
        self.apply_mute();
    }

    /// One animation frame. Returns nothing once the loop should stop
    /// (paused, or readiness lost); see [`Self::wants_animation_frame`].
    pub fn animation_frame(&mut self) -> Vec<CompositorEvent> {
        if !self.wants_animation_frame() {
            return Vec::new();
        }
        let tick = self.sync.step(&mut self.primary, &mut self.comparison, &self.clock);
        self.frame = tick.frame;
        vec![CompositorEvent::FrameUpdate { frame: tick.frame, time: tick.time }, CompositorEvent::RenderNeeded]
    }

    /// Fire the delayed post-seek redraw when due.
    pub fn tick(&mut self, now_ms: f64) -> Vec<CompositorEvent> {
        if self.seek_render.take_due(now_ms).is_empty() {
            Vec::new()
        } else {
            vec![CompositorEvent::RenderNeeded]
        }
    }

    /// Draw the current frames. Does nothing until ready.
    ///
    /// # Errors
    ///
    /// Returns the sink's [`RenderError`]; compositor state is unaffected.
    pub fn render<S>(&mut self, sink: &mut S) -> Result<(), RenderError>
    where
        S: FrameSink<V> + ?Sized,
    {
        let Some(layout) = self.layout.filter(|_| self.is_ready()) else {
            return Ok(());
        };
        let result = self
            .renderer
            .render(&layout, self.overlay_opacity, &self.primary, &self.comparison, sink);
        if let Err(e) = &result {
            warn!(error = %e, "frame render failed");
        }
        result
    }

    // --- Queries ---

    /// All three readiness conditions hold.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.primary_loader.is_ready() && self.comparison_loader.is_ready() && self.canvas_initialized
    }

    /// Whether the host should keep requesting animation frames.
    #[must_use]
    pub fn wants_animation_frame(&self) -> bool {
        self.sync.should_run(self.is_ready())
    }

    #[must_use]
    pub fn layout(&self) -> Option<&CanvasLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn loader(&self, side: Side) -> &VideoLoader {
        match side {
            Side::Primary => &self.primary_loader,
            Side::Comparison => &self.comparison_loader,
        }
    }

    #[must_use]
    pub fn video(&self, side: Side) -> &V {
        match side {
            Side::Primary => &self.primary,
            Side::Comparison => &self.comparison,
        }
    }

    /// Direct access to a decoder, e.g. to attach it to the DOM. Playback
    /// state must still go through the compositor.
    pub fn video_mut(&mut self, side: Side) -> &mut V {
        match side {
            Side::Primary => &mut self.primary,
            Side::Comparison => &mut self.comparison,
        }
    }

    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[must_use]
    pub fn sync(&self) -> &SyncScheduler {
        &self.sync
    }

    #[must_use]
    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    #[must_use]
    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    #[must_use]
    pub fn overlay_opacity(&self) -> f64 {
        self.overlay_opacity
    }

    /// Earliest time `tick` has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.seek_render.next_due()
    }

    // --- Internals ---

    fn loader_mut(&mut self, side: Side) -> &mut VideoLoader {
        match side {
            Side::Primary => &mut self.primary_loader,
            Side::Comparison => &mut self.comparison_loader,
        }
    }

    fn apply_mute(&mut self) {
        let (master, slave) = master_slave(&mut self.primary, &mut self.comparison, self.sync.master());
        master.set_muted(false);
        slave.set_muted(true);
    }

    /// Recompute the layout from the current viewport, mode, ratio and
    /// known aspect ratios. The decoders are not touched.
    fn relayout(&mut self) -> Vec<CompositorEvent> {
        let Some(viewport) = self.viewport else {
            self.layout = None;
            self.canvas_initialized = false;
            return Vec::new();
        };
        let layout = LayoutSolver::solve(
            self.mode,
            self.split_ratio,
            viewport,
            self.primary_loader.aspect_ratio(),
            self.comparison_loader.aspect_ratio(),
        );
        if self.layout == Some(layout) {
            return Vec::new();
        }
        self.layout = Some(layout);
        self.canvas_initialized = true;
        let mut events = vec![CompositorEvent::LayoutChanged(layout)];
        if self.is_ready() {
            events.push(CompositorEvent::RenderNeeded);
        }
        events
    }

    fn on_readiness(&mut self, was_ready: bool, now_ms: f64) -> Vec<CompositorEvent> {
        if was_ready || !self.is_ready() {
            return Vec::new();
        }
        info!(
            primary = ?self.primary_loader.url(),
            comparison = ?self.comparison_loader.url(),
            "video pair ready"
        );
        if self.sync.is_playing() {
            self.primary.play();
            self.comparison.play();
            Vec::new()
        } else {
            self.present_frame(now_ms)
        }
    }

    /// Paused seek: move each video to the current frame when it is more
    /// than one frame away, then redraw (delayed if anything seeked).
    fn present_frame(&mut self, now_ms: f64) -> Vec<CompositorEvent> {
        let primary_seeked = self.clock.seek_to_frame(&mut self.primary, self.frame);
        let comparison_seeked = self.clock.seek_to_frame(&mut self.comparison, self.frame);
        if primary_seeked || comparison_seeked {
            debug!(frame = self.frame, primary_seeked, comparison_seeked, "seeked to frame");
            self.seek_render.schedule((), (), now_ms);
            Vec::new()
        } else {
            self.seek_render.cancel(&());
            vec![CompositorEvent::RenderNeeded]
        }
    }
}
