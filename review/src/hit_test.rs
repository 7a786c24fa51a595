use super::*;
use crate::consts::{COMMENT_HIT_RADIUS_PX, HANDLE_RADIUS_PX};
use crate::coords::Rect;
use crate::doc::{AnnotationKind, Comment, CommentStatus, DrawingData};

// =============================================================
// Helpers
// =============================================================

fn shape(id: &str, bounds: Rect) -> Annotation {
    Annotation {
        id: id.to_owned(),
        kind: AnnotationKind::Rectangle,
        position: bounds.origin(),
        drawing_data: DrawingData { bounds: Some(bounds), ..Default::default() },
        frame_number: None,
        created_by: None,
        created_at: None,
        is_visible: true,
    }
}

fn pin(id: &str, x: f64, y: f64) -> Comment {
    Comment {
        id: id.to_owned(),
        position: Point::new(x, y),
        frame_number: None,
        thread_id: None,
        status: CommentStatus::Open,
        content: String::new(),
        created_by: None,
        created_at: None,
    }
}

struct Fixture {
    doc: ReviewDoc,
    overlay: OptimisticOverlayStore,
    mapper: CoordinateMapper,
    selection: SelectionModel,
}

impl Fixture {
    fn new(annotations: Vec<Annotation>, comments: Vec<Comment>) -> Self {
        let mut doc = ReviewDoc::new();
        doc.load_snapshot(annotations, comments);
        Self {
            doc,
            overlay: OptimisticOverlayStore::new(),
            mapper: CoordinateMapper::with_container(400.0, 300.0),
            selection: SelectionModel::new(),
        }
    }

    fn hit(&self, x: f64, y: f64) -> Option<Hit> {
        let scene = Scene {
            doc: &self.doc,
            overlay: &self.overlay,
            mapper: &self.mapper,
            selection: &self.selection,
            frame: None,
            handle_radius_px: HANDLE_RADIUS_PX,
            comment_radius_px: COMMENT_HIT_RADIUS_PX,
        };
        hit_test(Point::new(x, y), &scene)
    }
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchors_map_to_distinct_valid_corners() {
    for (i, a) in ResizeAnchor::ALL.iter().enumerate() {
        assert!(a.corner().is_valid());
        for b in &ResizeAnchor::ALL[i + 1..] {
            assert_ne!(a.corner(), b.corner());
        }
    }
}

#[test]
fn anchor_cursors() {
    assert_eq!(ResizeAnchor::N.cursor(), "ns-resize");
    assert_eq!(ResizeAnchor::W.cursor(), "ew-resize");
    assert_eq!(ResizeAnchor::Se.cursor(), "nwse-resize");
    assert_eq!(ResizeAnchor::Ne.cursor(), "nesw-resize");
}

#[test]
fn hit_cursor_for_body_is_move() {
    let hit = Hit { collection: Collection::Comments, id: "c".into(), part: HitPart::Body };
    assert_eq!(hit.cursor(), "move");
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_scene_hits_nothing() {
    let f = Fixture::new(vec![], vec![]);
    assert!(f.hit(100.0, 100.0).is_none());
}

#[test]
fn body_hit_inside_extent() {
    // 0.25..0.5 x 0.25..0.5 of 400x300 => 100..200 x 75..150
    let f = Fixture::new(vec![shape("a", Rect::new(0.25, 0.25, 0.25, 0.25))], vec![]);
    let hit = f.hit(150.0, 100.0).unwrap();
    assert_eq!(hit.id, "a");
    assert_eq!(hit.part, HitPart::Body);
    assert!(f.hit(300.0, 250.0).is_none());
}

#[test]
fn body_hit_includes_slop() {
    let f = Fixture::new(vec![shape("a", Rect::new(0.25, 0.25, 0.25, 0.25))], vec![]);
    assert!(f.hit(95.0, 100.0).is_some());
    assert!(f.hit(90.0, 100.0).is_none());
}

#[test]
fn topmost_annotation_wins() {
    let f = Fixture::new(
        vec![shape("under", Rect::new(0.0, 0.0, 0.5, 0.5)), shape("over", Rect::new(0.25, 0.25, 0.5, 0.5))],
        vec![],
    );
    assert_eq!(f.hit(150.0, 100.0).unwrap().id, "over");
    assert_eq!(f.hit(20.0, 20.0).unwrap().id, "under");
}

#[test]
fn comment_beats_annotation() {
    let f = Fixture::new(vec![shape("a", Rect::new(0.0, 0.0, 1.0, 1.0))], vec![pin("c", 0.5, 0.5)]);
    let hit = f.hit(205.0, 150.0).unwrap();
    assert_eq!(hit.collection, Collection::Comments);
    assert_eq!(hit.id, "c");
}

#[test]
fn handles_only_for_single_selection() {
    let mut f = Fixture::new(
        vec![shape("a", Rect::new(0.25, 0.25, 0.25, 0.25)), shape("b", Rect::new(0.6, 0.6, 0.1, 0.1))],
        vec![],
    );
    // Bottom-right corner of "a" at (200, 150).
    assert_eq!(f.hit(200.0, 150.0).unwrap().part, HitPart::Body);

    f.selection.annotations.select(vec!["a".to_owned()]);
    assert_eq!(f.hit(200.0, 150.0).unwrap().part, HitPart::ResizeHandle(ResizeAnchor::Se));
    assert_eq!(f.hit(150.0, 75.0).unwrap().part, HitPart::ResizeHandle(ResizeAnchor::N));

    f.selection.annotations.select(vec!["a".to_owned(), "b".to_owned()]);
    assert_eq!(f.hit(200.0, 150.0).unwrap().part, HitPart::Body);
}

#[test]
fn handles_beat_comment_pins() {
    let mut f = Fixture::new(vec![shape("a", Rect::new(0.25, 0.25, 0.25, 0.25))], vec![pin("c", 0.5, 0.5)]);
    f.selection.annotations.select(vec!["a".to_owned()]);
    let hit = f.hit(200.0, 150.0).unwrap();
    assert_eq!(hit.collection, Collection::Annotations);
    assert!(matches!(hit.part, HitPart::ResizeHandle(_)));
}

#[test]
fn freehand_without_bounds_has_no_handles() {
    let mut stroke = shape("s", Rect::new(0.0, 0.0, 0.0, 0.0));
    stroke.kind = AnnotationKind::Freehand;
    stroke.drawing_data.bounds = None;
    stroke.drawing_data.points = vec![Point::new(0.25, 0.25), Point::new(0.5, 0.5)];
    let mut f = Fixture::new(vec![stroke], vec![]);
    f.selection.annotations.select(vec!["s".to_owned()]);
    assert_eq!(f.hit(200.0, 150.0).unwrap().part, HitPart::Body);
}

#[test]
fn hidden_annotation_not_hit() {
    let mut a = shape("a", Rect::new(0.25, 0.25, 0.25, 0.25));
    a.is_visible = false;
    let f = Fixture::new(vec![a], vec![]);
    assert!(f.hit(150.0, 100.0).is_none());
}

#[test]
fn hit_uses_optimistic_position() {
    let mut f = Fixture::new(vec![shape("a", Rect::new(0.0, 0.0, 0.1, 0.1))], vec![]);
    f.overlay.shift(Collection::Annotations, "a", Point::default(), Point::new(0.5, 0.5));
    assert!(f.hit(20.0, 15.0).is_none());
    assert_eq!(f.hit(220.0, 165.0).unwrap().id, "a");
}
