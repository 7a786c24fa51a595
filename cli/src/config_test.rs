use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u64 = env_parse("__REVIEW_TEST_MISSING_KEY__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__REVIEW_TEST_EP_VALID__", "16.5") };
    let val: f64 = env_parse("__REVIEW_TEST_EP_VALID__", 0.0);
    assert!((val - 16.5).abs() < f64::EPSILON);
    unsafe { std::env::remove_var("__REVIEW_TEST_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__REVIEW_TEST_EP_INVALID__", "soon") };
    let val: usize = env_parse("__REVIEW_TEST_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__REVIEW_TEST_EP_INVALID__") };
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn backend_defaults_never_fail() {
    let config = BackendConfig::default();
    assert_eq!(config.fail_every, 0);
    assert_eq!(config.resize_retries, DEFAULT_BACKEND_RESIZE_RETRIES);
}

#[test]
fn review_config_defaults_match_library() {
    let config = ReviewConfig::default();
    assert_eq!(config.engine, EngineConfig::default());
    assert_eq!(config.backend, BackendConfig::default());
}
