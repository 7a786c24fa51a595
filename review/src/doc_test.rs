#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn rect_annotation(id: &str, x: f64, y: f64, w: f64, h: f64) -> Annotation {
    Annotation {
        id: id.to_owned(),
        kind: AnnotationKind::Rectangle,
        position: Point::new(x, y),
        drawing_data: DrawingData { bounds: Some(Rect::new(x, y, w, h)), ..Default::default() },
        frame_number: None,
        created_by: None,
        created_at: None,
        is_visible: true,
    }
}

fn comment(id: &str, x: f64, y: f64, frame: Option<u32>) -> Comment {
    Comment {
        id: id.to_owned(),
        position: Point::new(x, y),
        frame_number: frame,
        thread_id: None,
        status: CommentStatus::Open,
        content: String::new(),
        created_by: None,
        created_at: None,
    }
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn annotation_deserializes_from_camel_case() {
    let raw = json!({
        "id": "a1",
        "type": "rectangle",
        "position": { "x": 0.1, "y": 0.2 },
        "drawingData": {
            "bounds": { "x": 0.1, "y": 0.2, "width": 0.3, "height": 0.4 },
            "color": "#ff0000",
            "strokeWidth": 3
        },
        "frameNumber": 42,
        "createdBy": "user-1",
        "createdAt": 1_700_000_000_000.0_f64,
        "isVisible": false
    });
    let a: Annotation = serde_json::from_value(raw).unwrap();
    assert_eq!(a.kind, AnnotationKind::Rectangle);
    assert_eq!(a.frame_number, Some(42));
    assert!(!a.is_visible);
    assert_eq!(a.drawing_data.bounds, Some(Rect::new(0.1, 0.2, 0.3, 0.4)));
    assert_eq!(a.drawing_data.extra.get("color"), Some(&json!("#ff0000")));
}

#[test]
fn annotation_visibility_defaults_true() {
    let raw = json!({ "id": "a", "type": "text", "position": { "x": 0.0, "y": 0.0 } });
    let a: Annotation = serde_json::from_value(raw).unwrap();
    assert!(a.is_visible);
    assert!(a.drawing_data.points.is_empty());
}

#[test]
fn annotation_serialize_keeps_style_fields() {
    let mut a = rect_annotation("a", 0.0, 0.0, 0.1, 0.1);
    a.drawing_data.extra.insert("color".into(), json!("blue"));
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v["type"], json!("rectangle"));
    assert_eq!(v["drawingData"]["color"], json!("blue"));
    assert!(v.get("frameNumber").is_none());
}

#[test]
fn comment_status_defaults_open() {
    let raw = json!({ "id": "c", "position": { "x": 0.5, "y": 0.5 }, "threadId": "t1" });
    let c: Comment = serde_json::from_value(raw).unwrap();
    assert_eq!(c.status, CommentStatus::Open);
    assert_eq!(c.thread_id.as_deref(), Some("t1"));
}

// =============================================================
// Extent precedence
// =============================================================

#[test]
fn extent_prefers_bounds() {
    let mut a = rect_annotation("a", 0.1, 0.1, 0.2, 0.2);
    a.drawing_data.points = vec![Point::new(0.9, 0.9), Point::new(0.95, 0.95)];
    assert_eq!(a.extent(), Rect::new(0.1, 0.1, 0.2, 0.2));
    assert!(a.has_bounds());
}

#[test]
fn extent_falls_back_to_points() {
    let mut a = rect_annotation("a", 0.0, 0.0, 0.0, 0.0);
    a.kind = AnnotationKind::Freehand;
    a.drawing_data.bounds = None;
    a.drawing_data.points = vec![Point::new(0.2, 0.3), Point::new(0.4, 0.1)];
    let e = a.extent();
    assert!((e.x - 0.2).abs() < 1e-12);
    assert!((e.y - 0.1).abs() < 1e-12);
    assert!((e.width - 0.2).abs() < 1e-12);
    assert!((e.height - 0.2).abs() < 1e-12);
    assert!(!a.has_bounds());
}

#[test]
fn extent_synthesizes_default_box() {
    let mut a = rect_annotation("a", 0.5, 0.6, 0.0, 0.0);
    a.kind = AnnotationKind::Text;
    a.drawing_data.bounds = None;
    assert_eq!(a.extent(), Rect::new(0.5, 0.6, DEFAULT_EXTENT_NORM, DEFAULT_EXTENT_NORM));
}

// =============================================================
// Frame filtering
// =============================================================

#[test]
fn frame_filter_matches_and_whole_asset() {
    let mut a = rect_annotation("a", 0.0, 0.0, 0.1, 0.1);
    assert!(a.is_on_frame(Some(3)));
    assert!(a.is_on_frame(None));
    a.frame_number = Some(3);
    assert!(a.is_on_frame(Some(3)));
    assert!(!a.is_on_frame(Some(4)));
    assert!(a.is_on_frame(None));
}

// =============================================================
// ReviewDoc
// =============================================================

#[test]
fn load_snapshot_preserves_order() {
    let mut doc = ReviewDoc::new();
    doc.load_snapshot(
        vec![rect_annotation("b", 0.0, 0.0, 0.1, 0.1), rect_annotation("a", 0.0, 0.0, 0.1, 0.1)],
        vec![],
    );
    let ids: Vec<_> = doc.visible_annotations(None).map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn load_snapshot_replaces_previous() {
    let mut doc = ReviewDoc::new();
    doc.load_snapshot(vec![rect_annotation("a", 0.0, 0.0, 0.1, 0.1)], vec![comment("c", 0.5, 0.5, None)]);
    doc.load_snapshot(vec![], vec![]);
    assert!(doc.is_empty());
    assert!(doc.annotation("a").is_none());
}

#[test]
fn hidden_annotations_are_not_visible() {
    let mut hidden = rect_annotation("h", 0.0, 0.0, 0.1, 0.1);
    hidden.is_visible = false;
    let mut doc = ReviewDoc::new();
    doc.load_snapshot(vec![hidden, rect_annotation("v", 0.0, 0.0, 0.1, 0.1)], vec![]);
    let ids: Vec<_> = doc.visible_annotations(None).map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["v"]);
    assert_eq!(doc.annotation_count(), 2);
}

#[test]
fn visible_comments_filter_by_frame() {
    let mut doc = ReviewDoc::new();
    doc.load_snapshot(vec![], vec![comment("c1", 0.1, 0.1, Some(1)), comment("c2", 0.1, 0.1, Some(2))]);
    let ids: Vec<_> = doc.visible_comments(Some(2)).map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c2"]);
}

#[test]
fn position_and_contains_by_collection() {
    let mut doc = ReviewDoc::new();
    doc.load_snapshot(vec![rect_annotation("a", 0.1, 0.2, 0.1, 0.1)], vec![comment("c", 0.7, 0.8, None)]);
    assert_eq!(doc.position(Collection::Annotations, "a"), Some(Point::new(0.1, 0.2)));
    assert_eq!(doc.position(Collection::Comments, "c"), Some(Point::new(0.7, 0.8)));
    assert!(doc.contains(Collection::Comments, "c"));
    assert!(!doc.contains(Collection::Annotations, "c"));
    assert_eq!(doc.comment_count(), 1);
}
