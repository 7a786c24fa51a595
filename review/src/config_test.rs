#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn engine_defaults_match_consts() {
    let c = EngineConfig::default();
    assert_eq!(c.resize_debounce_ms, RESIZE_DEBOUNCE_MS);
    assert_eq!(c.settle_grace_ms, SETTLE_GRACE_MS);
    assert_eq!(c.min_resize_px, MIN_RESIZE_PX);
}

#[test]
fn engine_from_empty_object_is_default() {
    assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
}

#[test]
fn engine_partial_override() {
    let c = EngineConfig::from_json(r#"{"settleGraceMs": 500}"#).unwrap();
    assert_eq!(c.settle_grace_ms, 500.0);
    assert_eq!(c.resize_debounce_ms, RESIZE_DEBOUNCE_MS);
}

#[test]
fn engine_rejects_negative() {
    let err = EngineConfig::from_json(r#"{"minResizePx": -1}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "minResizePx", .. }));
}

#[test]
fn engine_rejects_bad_json() {
    assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Parse(_))));
}

#[test]
fn compositor_partial_override() {
    let c = CompositorConfig::from_json(r#"{"fps": 24, "splitRatio": 0.7}"#).unwrap();
    assert_eq!(c.fps, 24.0);
    assert_eq!(c.split_ratio, 0.7);
    assert_eq!(c.overlay_opacity, DEFAULT_OVERLAY_OPACITY);
}

#[test]
fn compositor_rejects_opacity_out_of_range() {
    assert!(CompositorConfig::from_json(r#"{"overlayOpacity": 1.5}"#).is_err());
}
