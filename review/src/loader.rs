//! Per-source readiness tracking for the compositor's two videos.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use serde::Serialize;
use tracing::{error, info};

use crate::coords::Size;
use crate::sync::Side;

/// Decoder diagnostics captured when a source fails to load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFailure {
    /// `MediaError.code` (1 aborted, 2 network, 3 decode, 4 unsupported), if reported.
    pub code: Option<u16>,
    pub message: String,
    /// `HTMLMediaElement.readyState` at the time of the error.
    pub ready_state: u16,
}

/// Lifecycle of one source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Loading { url: String },
    Ready { url: String, natural: Size, duration: f64 },
    /// Terminal until the next `load`; there is no automatic retry.
    Failed { url: String, failure: MediaFailure },
}

/// Readiness of one video source.
#[derive(Debug, Clone)]
pub struct VideoLoader {
    side: Side,
    state: LoadState,
}

impl VideoLoader {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self { side, state: LoadState::Empty }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Start loading `url`, discarding whatever was loaded before.
    pub fn load(&mut self, url: &str) {
        info!(side = ?self.side, url, "loading video");
        self.state = LoadState::Loading { url: url.to_owned() };
    }

    /// Metadata arrived. Returns the natural size if this completed a load;
    /// late or duplicate metadata events are ignored.
    pub fn on_metadata(&mut self, width: f64, height: f64, duration: f64) -> Option<Size> {
        let LoadState::Loading { url } = &self.state else {
            return None;
        };
        let natural = Size::new(width, height);
        if natural.is_empty() {
            return None;
        }
        info!(side = ?self.side, url = %url, width, height, duration, "video metadata loaded");
        self.state = LoadState::Ready { url: url.clone(), natural, duration };
        Some(natural)
    }

    /// The decoder reported an error. The source stays failed until reloaded.
    pub fn on_error(&mut self, failure: MediaFailure) {
        let url = self.url().unwrap_or_default().to_owned();
        error!(
            side = ?self.side,
            url = %url,
            ready_state = failure.ready_state,
            code = ?failure.code,
            message = %failure.message,
            "video failed to load"
        );
        self.state = LoadState::Failed { url, failure };
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, LoadState::Failed { .. })
    }

    /// URL of the current or last attempted load.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            LoadState::Empty => None,
            LoadState::Loading { url } | LoadState::Ready { url, .. } | LoadState::Failed { url, .. } => Some(url),
        }
    }

    #[must_use]
    pub fn natural_size(&self) -> Option<Size> {
        match self.state {
            LoadState::Ready { natural, .. } => Some(natural),
            _ => None,
        }
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.natural_size().and_then(|s| s.aspect_ratio())
    }
}
