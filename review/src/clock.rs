//! Frame ↔ media time conversion and the one-frame seek tolerance.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use tracing::warn;

use crate::consts::DEFAULT_FPS;
use crate::sync::VideoSource;

/// Frame clock for one video pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

impl FrameClock {
    /// A clock at `fps`. Non-finite or non-positive rates fall back to
    /// [`DEFAULT_FPS`].
    #[must_use]
    pub fn new(fps: f64) -> Self {
        if fps.is_finite() && fps > 0.0 {
            Self { fps }
        } else {
            warn!(fps, fallback = DEFAULT_FPS, "invalid frame rate");
            Self::default()
        }
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Drift allowed at rest: one frame.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        1.0 / self.fps
    }

    /// Media time of the start of `frame`.
    #[must_use]
    pub fn target_time(&self, frame: u32) -> f64 {
        f64::from(frame) / self.fps
    }

    /// Frame shown at media time `time`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_at(&self, time: f64) -> u32 {
        if !time.is_finite() || time <= 0.0 {
            return 0;
        }
        (time * self.fps).floor().min(f64::from(u32::MAX)) as u32
    }

    /// Whether a video at `current` is more than one frame away from `target`.
    #[must_use]
    pub fn needs_seek(&self, current: f64, target: f64) -> bool {
        (current - target).abs() > self.tolerance()
    }

    /// Seek `video` to `frame` unless it is already within tolerance.
    /// Returns true if a seek was issued.
    pub fn seek_to_frame<V>(&self, video: &mut V, frame: u32) -> bool
    where
        V: VideoSource + ?Sized,
    {
        let target = self.target_time(frame);
        if !self.needs_seek(video.current_time(), target) {
            return false;
        }
        video.seek(target);
        true
    }
}
