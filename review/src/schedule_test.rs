#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn new_scheduler_is_empty() {
    let c: Coalescer<&str, u32> = Coalescer::new(16.0);
    assert!(c.is_empty());
    assert!(c.next_due().is_none());
    assert_eq!(c.window_ms(), 16.0);
}

#[test]
fn operation_fires_after_window() {
    let mut c = Coalescer::new(16.0);
    c.schedule("a", 1, 100.0);
    assert!(c.take_due(115.0).is_empty());
    assert_eq!(c.take_due(116.0), vec![("a", 1)]);
    assert!(c.is_empty());
}

#[test]
fn reschedule_replaces_and_extends_deadline() {
    let mut c = Coalescer::new(16.0);
    assert_eq!(c.schedule("a", 1, 100.0), None);
    assert_eq!(c.schedule("a", 2, 110.0), Some(1));
    assert!(c.take_due(120.0).is_empty());
    assert_eq!(c.take_due(126.0), vec![("a", 2)]);
}

#[test]
fn keys_are_independent() {
    let mut c = Coalescer::new(16.0);
    c.schedule("a", 1, 0.0);
    c.schedule("b", 2, 10.0);
    assert_eq!(c.take_due(20.0), vec![("a", 1)]);
    assert!(c.is_pending(&"b"));
    assert_eq!(c.next_due(), Some(26.0));
}

#[test]
fn take_due_orders_by_deadline() {
    let mut c = Coalescer::new(0.0);
    c.schedule_at("late", 3, 30.0);
    c.schedule_at("early", 1, 10.0);
    c.schedule_at("mid", 2, 20.0);
    assert_eq!(c.take_due(100.0), vec![("early", 1), ("mid", 2), ("late", 3)]);
}

#[test]
fn flush_takes_early() {
    let mut c = Coalescer::new(16.0);
    c.schedule("a", 7, 0.0);
    assert_eq!(c.flush(&"a"), Some(7));
    assert_eq!(c.flush(&"a"), None);
    assert!(c.take_due(1e9).is_empty());
}

#[test]
fn cancel_drops() {
    let mut c = Coalescer::new(16.0);
    c.schedule("a", 7, 0.0);
    assert_eq!(c.cancel(&"a"), Some(7));
    assert!(c.is_empty());
}

#[test]
fn flush_all_drains_in_order() {
    let mut c = Coalescer::new(16.0);
    c.schedule("b", 2, 5.0);
    c.schedule("a", 1, 0.0);
    assert_eq!(c.flush_all(), vec![("a", 1), ("b", 2)]);
    assert!(c.is_empty());
}

#[test]
fn clear_drops_everything() {
    let mut c = Coalescer::new(16.0);
    c.schedule("a", 1, 0.0);
    c.schedule("b", 2, 0.0);
    c.clear();
    assert_eq!(c.len(), 0);
}
