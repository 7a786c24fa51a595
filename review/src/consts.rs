//! Shared numeric constants for the review crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles and annotation bodies.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Screen-space radius in pixels of a comment pin.
pub const COMMENT_HIT_RADIUS_PX: f64 = 12.0;

/// Normalized edge length of the synthetic box drawn for an annotation that
/// has neither bounds nor points.
pub const DEFAULT_EXTENT_NORM: f64 = 0.04;

// ── Gestures ────────────────────────────────────────────────────

/// Smallest width or height, in pixels, a resize may produce.
pub const MIN_RESIZE_PX: f64 = 10.0;

/// Coalescing window for resize persistence (one animation frame).
pub const RESIZE_DEBOUNCE_MS: f64 = 16.0;

/// How long an optimistic override outlives its settled mutation.
pub const SETTLE_GRACE_MS: f64 = 150.0;

/// Normalized deltas smaller than this are treated as "no movement".
pub const MOVE_EPSILON: f64 = 1e-9;

// ── Video ───────────────────────────────────────────────────────

/// Frame rate assumed when the host reports a non-positive or non-finite fps.
pub const DEFAULT_FPS: f64 = 30.0;

/// Delay between a paused seek and the redraw, giving the decoder time to present.
pub const SEEK_RENDER_DELAY_MS: f64 = 10.0;

/// Slave drift, in seconds, tolerated during playback before a hard seek.
pub const PLAYBACK_DRIFT_SECS: f64 = 0.1;

/// Lower clamp for the split ratio.
pub const MIN_SPLIT_RATIO: f64 = 0.05;

/// Upper clamp for the split ratio.
pub const MAX_SPLIT_RATIO: f64 = 0.95;

/// Initial split ratio for a freshly created compositor.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Initial comparison-layer opacity in overlay mode.
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.5;
