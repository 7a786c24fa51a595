#![allow(clippy::float_cmp)]

use super::*;
use crate::fakes::FakeVideo;

fn clock() -> FrameClock {
    FrameClock::new(30.0)
}

#[test]
fn side_other() {
    assert_eq!(Side::Primary.other(), Side::Comparison);
    assert_eq!(Side::Comparison.other(), Side::Primary);
}

#[test]
fn defaults() {
    let sync = SyncScheduler::default();
    assert!(!sync.is_playing());
    assert!(sync.is_synced());
    assert_eq!(sync.master(), Side::Primary);
    assert_eq!(sync.slave(), Side::Comparison);
}

#[test]
fn loop_runs_only_when_playing_and_ready() {
    let mut sync = SyncScheduler::default();
    assert!(!sync.should_run(true));
    sync.set_playing(true);
    assert!(sync.should_run(true));
    assert!(!sync.should_run(false));
}

#[test]
fn step_reports_master_frame() {
    let sync = SyncScheduler::default();
    let (mut p, mut c) = (FakeVideo::at(1.0), FakeVideo::at(1.05));
    let tick = sync.step(&mut p, &mut c, &clock());
    assert_eq!(tick.frame, 30);
    assert!((tick.time - 1.0).abs() < 1e-12);
    assert!(!tick.corrected);
    assert!(c.seeks.is_empty());
}

#[test]
fn step_corrects_slave_past_drift() {
    let sync = SyncScheduler::default();
    let (mut p, mut c) = (FakeVideo::at(2.0), FakeVideo::at(2.2));
    assert!(sync.step(&mut p, &mut c, &clock()).corrected);
    assert_eq!(c.seeks, vec![2.0]);
    assert!(p.seeks.is_empty());
}

#[test]
fn step_never_touches_master() {
    let mut sync = SyncScheduler::default();
    sync.set_master(Side::Comparison);
    let (mut p, mut c) = (FakeVideo::at(5.0), FakeVideo::at(3.0));
    let tick = sync.step(&mut p, &mut c, &clock());
    assert_eq!(tick.frame, 90);
    assert_eq!(p.seeks, vec![3.0]);
    assert!(c.seeks.is_empty());
}

#[test]
fn unsynced_step_does_not_correct() {
    let mut sync = SyncScheduler::default();
    sync.set_synced(false);
    let (mut p, mut c) = (FakeVideo::at(0.0), FakeVideo::at(9.0));
    assert!(!sync.step(&mut p, &mut c, &clock()).corrected);
    assert!(c.seeks.is_empty());
}

#[test]
fn align_uses_frame_tolerance() {
    let sync = SyncScheduler::default();
    let (mut p, mut c) = (FakeVideo::at(1.0), FakeVideo::at(1.02));
    assert!(!sync.align(&mut p, &mut c, &clock()));
    c.time = 1.05;
    assert!(sync.align(&mut p, &mut c, &clock()));
    assert_eq!(c.time, 1.0);
}
