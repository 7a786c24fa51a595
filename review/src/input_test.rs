#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// CanvasMode
// =============================================================

#[test]
fn mode_default_is_select() {
    assert_eq!(CanvasMode::default(), CanvasMode::Select);
    assert!(CanvasMode::default().is_select());
}

#[test]
fn drawing_modes_are_not_select() {
    assert!(!CanvasMode::Annotate(AnnotationKind::Arrow).is_select());
    assert!(!CanvasMode::Comment.is_select());
    assert_ne!(CanvasMode::Annotate(AnnotationKind::Arrow), CanvasMode::Annotate(AnnotationKind::Circle));
}

// =============================================================
// Modifiers / Button / Key
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
}

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Primary, Button::Secondary);
    assert_ne!(Button::Primary, Button::Middle);
}

#[test]
fn key_compares_by_name() {
    assert_eq!(Key("Escape".into()), Key("Escape".into()));
    assert_ne!(Key("Escape".into()), Key("Delete".into()));
}

// =============================================================
// Corner
// =============================================================

#[test]
fn all_handles_are_valid_and_distinct() {
    for (i, a) in Corner::HANDLES.iter().enumerate() {
        assert!(a.is_valid(), "{a:?}");
        for (j, b) in Corner::HANDLES.iter().enumerate() {
            if i != j {
                assert_ne!(a, b);
            }
        }
    }
}

#[test]
fn opposing_edges_are_invalid() {
    assert!(!Corner::empty().is_valid());
    assert!(!(Corner::LEFT | Corner::RIGHT).is_valid());
    assert!(!(Corner::TOP | Corner::BOTTOM | Corner::LEFT).is_valid());
}

#[test]
fn axis_queries() {
    assert!(Corner::LEFT.moves_x());
    assert!(!Corner::LEFT.moves_y());
    assert!(Corner::BOTTOM.moves_y());
    assert!(!Corner::BOTTOM.moves_x());
    assert!(Corner::TOP_RIGHT.moves_x() && Corner::TOP_RIGHT.moves_y());
}

#[test]
fn handle_points_sit_on_bounds() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(Corner::TOP_LEFT.handle_point(r), Point::new(10.0, 20.0));
    assert_eq!(Corner::BOTTOM_RIGHT.handle_point(r), Point::new(110.0, 70.0));
    assert_eq!(Corner::TOP.handle_point(r), Point::new(60.0, 20.0));
    assert_eq!(Corner::LEFT.handle_point(r), Point::new(10.0, 45.0));
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn gesture_default_is_idle() {
    let g = Gesture::default();
    assert!(g.is_idle());
    assert!(g.translate_anchor().is_none());
    assert!(g.resize_bounds().is_none());
    assert!(g.participants().is_empty());
}

#[test]
fn translating_exposes_only_anchor() {
    let g = Gesture::Translating {
        collection: Collection::Annotations,
        ids: vec!["a".into(), "b".into()],
        anchor: Point::new(1.0, 2.0),
        total: Point::default(),
    };
    assert_eq!(g.translate_anchor(), Some(Point::new(1.0, 2.0)));
    assert!(g.resize_bounds().is_none());
    assert_eq!(g.participants(), ["a", "b"]);
    assert_eq!(g.translate_collection(), Some(Collection::Annotations));
}

#[test]
fn resizing_exposes_only_bounds() {
    let g = Gesture::Resizing {
        id: "a".into(),
        corner: Corner::TOP_LEFT,
        initial_bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
        start: Point::default(),
        changed: false,
    };
    assert!(g.translate_anchor().is_none());
    assert_eq!(g.resize_bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}
