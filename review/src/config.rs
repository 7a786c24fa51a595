//! Tunables for the interaction engine and the compositor.
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! host only spells out what it wants to change.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    COMMENT_HIT_RADIUS_PX, DEFAULT_FPS, DEFAULT_OVERLAY_OPACITY, DEFAULT_SPLIT_RATIO, HANDLE_RADIUS_PX,
    MIN_RESIZE_PX, PLAYBACK_DRIFT_SECS, RESIZE_DEBOUNCE_MS, SEEK_RENDER_DELAY_MS, SETTLE_GRACE_MS,
};

/// Failure to load a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Interaction engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub resize_debounce_ms: f64,
    pub settle_grace_ms: f64,
    pub min_resize_px: f64,
    pub handle_radius_px: f64,
    pub comment_radius_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            settle_grace_ms: SETTLE_GRACE_MS,
            min_resize_px: MIN_RESIZE_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
            comment_radius_px: COMMENT_HIT_RADIUS_PX,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or a negative/non-finite value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        non_negative("resizeDebounceMs", config.resize_debounce_ms)?;
        non_negative("settleGraceMs", config.settle_grace_ms)?;
        non_negative("minResizePx", config.min_resize_px)?;
        non_negative("handleRadiusPx", config.handle_radius_px)?;
        non_negative("commentRadiusPx", config.comment_radius_px)?;
        Ok(config)
    }
}

/// Dual-video compositor settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositorConfig {
    pub fps: f64,
    pub seek_render_delay_ms: f64,
    pub playback_drift_secs: f64,
    pub split_ratio: f64,
    pub overlay_opacity: f64,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            seek_render_delay_ms: SEEK_RENDER_DELAY_MS,
            playback_drift_secs: PLAYBACK_DRIFT_SECS,
            split_ratio: DEFAULT_SPLIT_RATIO,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
        }
    }
}

impl CompositorConfig {
    /// Parse from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON, a negative delay or drift,
    /// or an opacity outside `[0, 1]`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        non_negative("seekRenderDelayMs", config.seek_render_delay_ms)?;
        non_negative("playbackDriftSecs", config.playback_drift_secs)?;
        if !(0.0..=1.0).contains(&config.overlay_opacity) {
            return Err(ConfigError::Invalid {
                field: "overlayOpacity",
                reason: format!("{} is outside [0, 1]", config.overlay_opacity),
            });
        }
        Ok(config)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be finite and non-negative") })
    }
}
