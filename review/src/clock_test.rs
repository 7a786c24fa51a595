#![allow(clippy::float_cmp)]

use super::*;
use crate::fakes::FakeVideo;

#[test]
fn invalid_fps_falls_back() {
    assert_eq!(FrameClock::new(0.0).fps(), DEFAULT_FPS);
    assert_eq!(FrameClock::new(-24.0).fps(), DEFAULT_FPS);
    assert_eq!(FrameClock::new(f64::NAN).fps(), DEFAULT_FPS);
    assert_eq!(FrameClock::new(f64::INFINITY).fps(), DEFAULT_FPS);
    assert_eq!(FrameClock::new(24.0).fps(), 24.0);
}

#[test]
fn target_time_and_frame_at() {
    let clock = FrameClock::new(30.0);
    assert!((clock.target_time(12) - 0.4).abs() < 1e-12);
    assert_eq!(clock.frame_at(0.4), 12);
    assert_eq!(clock.frame_at(0.41), 12);
    assert_eq!(clock.frame_at(-1.0), 0);
    assert_eq!(clock.frame_at(f64::NAN), 0);
}

#[test]
fn tolerance_is_one_frame() {
    let clock = FrameClock::new(25.0);
    assert!((clock.tolerance() - 0.04).abs() < 1e-12);
    assert!(!clock.needs_seek(1.0, 1.03));
    assert!(clock.needs_seek(1.0, 1.05));
}

#[test]
fn seek_to_frame_skips_when_close() {
    let clock = FrameClock::new(30.0);
    let mut video = FakeVideo::at(0.39);
    assert!(!clock.seek_to_frame(&mut video, 12));
    assert!(video.seeks.is_empty());
}

#[test]
fn seek_to_frame_seeks_when_drifted() {
    let clock = FrameClock::new(30.0);
    let mut video = FakeVideo::at(10.0 / 30.0);
    assert!(clock.seek_to_frame(&mut video, 12));
    assert_eq!(video.seeks.len(), 1);
    assert!((video.time - 0.4).abs() < 1e-12);
}
