//! Document model: annotations, comments, and the snapshot store.
//!
//! Records arrive from the reactive data layer as read-only snapshots and are
//! replaced wholesale on every refresh. The engine never edits a record in
//! place; moves and resizes live in the optimistic overlay until the backend
//! reports the authoritative result in a later snapshot.
//!
//! Wire field names follow the backend's camelCase JSON.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_EXTENT_NORM;
use crate::coords::{Point, Rect};

/// Opaque record identifier issued by the backend.
pub type ItemId = String;

/// Which record collection an id belongs to.
///
/// Annotations and comments have independent selections and separate
/// persistence calls even though they move through the same gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Annotations,
    Comments,
}

/// The kind of an annotation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Freehand stroke described by `drawing_data.points`.
    Freehand,
    /// Axis-aligned rectangle.
    Rectangle,
    /// Ellipse inscribed in its bounds.
    Circle,
    /// Arrow drawn across its bounds.
    Arrow,
    /// Text label anchored at `position`.
    Text,
}

/// Geometry payload of an annotation.
///
/// Style fields the engine does not interpret (colour, stroke width, text)
/// are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingData {
    /// Normalized bounds for shape kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
    /// Ordered normalized points for freehand strokes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A drawn shape or stroke attached to a frame (video) or to the whole asset (image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Normalized top-left point.
    pub position: Point,
    #[serde(default)]
    pub drawing_data: DrawingData,
    /// Frame index for video assets; absent for still images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Annotation {
    /// Normalized rendered extent.
    ///
    /// Bounds win over points, and points win over a synthetic
    /// `DEFAULT_EXTENT_NORM` square whose top-left corner is `position`.
    #[must_use]
    pub fn extent(&self) -> Rect {
        if let Some(bounds) = self.drawing_data.bounds {
            return bounds;
        }
        if let Some(bbox) = Rect::bounding(&self.drawing_data.points) {
            return bbox;
        }
        Rect::new(self.position.x, self.position.y, DEFAULT_EXTENT_NORM, DEFAULT_EXTENT_NORM)
    }

    /// Whether the extent comes from explicit bounds, which is what makes a
    /// shape resizable.
    #[must_use]
    pub fn has_bounds(&self) -> bool {
        self.drawing_data.bounds.is_some()
    }

    /// Whether the annotation shows on `frame`. Records without a frame
    /// number belong to the whole asset.
    #[must_use]
    pub fn is_on_frame(&self, frame: Option<u32>) -> bool {
        on_frame(self.frame_number, frame)
    }
}

/// Resolution state of a comment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Open,
    Resolved,
}

/// A point-anchored discussion thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: ItemId,
    /// Normalized anchor point.
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u32>,
    /// Groups replies under their root comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ItemId>,
    #[serde(default)]
    pub status: CommentStatus,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Comment {
    #[must_use]
    pub fn is_on_frame(&self, frame: Option<u32>) -> bool {
        on_frame(self.frame_number, frame)
    }
}

fn on_frame(record: Option<u32>, current: Option<u32>) -> bool {
    match (record, current) {
        (Some(n), Some(f)) => n == f,
        _ => true,
    }
}

/// Latest authoritative snapshot of annotations and comments, in render order.
#[derive(Debug, Default)]
pub struct ReviewDoc {
    annotations: IndexMap<ItemId, Annotation>,
    comments: IndexMap<ItemId, Comment>,
}

impl ReviewDoc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all records with a fresh snapshot. Order is preserved and
    /// later records render (and hit-test) on top.
    pub fn load_snapshot(&mut self, annotations: Vec<Annotation>, comments: Vec<Comment>) {
        self.annotations = annotations.into_iter().map(|a| (a.id.clone(), a)).collect();
        self.comments = comments.into_iter().map(|c| (c.id.clone(), c)).collect();
    }

    #[must_use]
    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    #[must_use]
    pub fn comment(&self, id: &str) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Whether `id` exists in `collection`.
    #[must_use]
    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        match collection {
            Collection::Annotations => self.annotations.contains_key(id),
            Collection::Comments => self.comments.contains_key(id),
        }
    }

    /// Authoritative normalized position of a record.
    #[must_use]
    pub fn position(&self, collection: Collection, id: &str) -> Option<Point> {
        match collection {
            Collection::Annotations => self.annotations.get(id).map(|a| a.position),
            Collection::Comments => self.comments.get(id).map(|c| c.position),
        }
    }

    /// Visible annotations on `frame`, bottom first.
    pub fn visible_annotations(&self, frame: Option<u32>) -> impl DoubleEndedIterator<Item = &Annotation> {
        self.annotations
            .values()
            .filter(move |a| a.is_visible && a.is_on_frame(frame))
    }

    /// Comments on `frame`, bottom first.
    pub fn visible_comments(&self, frame: Option<u32>) -> impl DoubleEndedIterator<Item = &Comment> {
        self.comments.values().filter(move |c| c.is_on_frame(frame))
    }

    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.comments.is_empty()
    }
}
