//! Input model: canvas mode, modifier keys, mouse buttons, resize corners,
//! and the gesture state.
//!
//! `CanvasMode` and `Modifiers` capture the user's intent at the time of a
//! pointer event. `Gesture` is the single active gesture tracked between
//! pointer-down and pointer-up, carrying everything needed to compute deltas
//! and emit the final mutation on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::ops::BitOr;

use crate::coords::{Point, Rect};
use crate::doc::{AnnotationKind, Collection, ItemId};

/// What pointer input on the review surface means.
///
/// One enum for every consumer; only `Select` is interpreted by the
/// interaction engine; the other modes belong to the host's drawing and
/// comment-placement tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasMode {
    /// Select, move, and resize existing records (default).
    #[default]
    Select,
    /// Draw a new annotation of the given kind.
    Annotate(AnnotationKind),
    /// Place a new comment pin.
    Comment,
}

impl CanvasMode {
    #[must_use]
    pub fn is_select(self) -> bool {
        matches!(self, Self::Select)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Which edges of a bounding box a resize handle controls, as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Corner(u8);

impl BitOr for Corner {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl Corner {
    pub const LEFT: Self = Self(0b0001);
    pub const RIGHT: Self = Self(0b0010);
    pub const TOP: Self = Self(0b0100);
    pub const BOTTOM: Self = Self(0b1000);

    pub const TOP_LEFT: Self = Self::TOP.union(Self::LEFT);
    pub const TOP_RIGHT: Self = Self::TOP.union(Self::RIGHT);
    pub const BOTTOM_LEFT: Self = Self::BOTTOM.union(Self::LEFT);
    pub const BOTTOM_RIGHT: Self = Self::BOTTOM.union(Self::RIGHT);

    /// The eight valid handle combinations: four corners and four edges.
    pub const HANDLES: [Self; 8] = [
        Self::TOP_LEFT,
        Self::TOP,
        Self::TOP_RIGHT,
        Self::RIGHT,
        Self::BOTTOM_RIGHT,
        Self::BOTTOM,
        Self::BOTTOM_LEFT,
        Self::LEFT,
    ];

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All of `other`'s edges are set.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any of `other`'s edges is set.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Non-empty and never holding both edges of the same axis.
    #[must_use]
    pub fn is_valid(self) -> bool {
        !self.is_empty() && !self.contains(Self::LEFT | Self::RIGHT) && !self.contains(Self::TOP | Self::BOTTOM)
    }

    /// Whether the handle moves a vertical edge (changes width).
    #[must_use]
    pub fn moves_x(self) -> bool {
        self.intersects(Self::LEFT | Self::RIGHT)
    }

    /// Whether the handle moves a horizontal edge (changes height).
    #[must_use]
    pub fn moves_y(self) -> bool {
        self.intersects(Self::TOP | Self::BOTTOM)
    }

    /// Where this handle sits on `bounds`. Edge handles sit at the midpoint
    /// of their edge.
    #[must_use]
    pub fn handle_point(self, bounds: Rect) -> Point {
        let x = if self.contains(Self::LEFT) {
            bounds.x
        } else if self.contains(Self::RIGHT) {
            bounds.right()
        } else {
            bounds.center().x
        };
        let y = if self.contains(Self::TOP) {
            bounds.y
        } else if self.contains(Self::BOTTOM) {
            bounds.bottom()
        } else {
            bounds.center().y
        };
        Point::new(x, y)
    }
}

/// The active gesture. Exactly one exists per engine; a resize must return
/// to `Idle` before a translate can start and vice versa.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving every selected record of one collection.
    Translating {
        /// Which selection is being moved.
        collection: Collection,
        /// Ids selected at pointer-down. The gesture moves and commits exactly
        /// these, whatever happens to the selection meanwhile.
        ids: Vec<ItemId>,
        /// CSS-pixel pointer position of the previous event. Re-anchored on
        /// every move so each event contributes only its own delta.
        anchor: Point,
        /// Sum of the normalized per-event deltas so far.
        total: Point,
    },
    /// Resizing the single selected annotation by one handle.
    Resizing {
        /// Id of the annotation being resized.
        id: ItemId,
        /// Which edges the grabbed handle controls.
        corner: Corner,
        /// CSS-pixel bounds at gesture start.
        initial_bounds: Rect,
        /// CSS-pixel pointer position at gesture start.
        start: Point,
        /// Whether any accepted bounds were produced.
        changed: bool,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The translate anchor, if translating.
    #[must_use]
    pub fn translate_anchor(&self) -> Option<Point> {
        match self {
            Self::Translating { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }

    /// The collection being moved, if translating.
    #[must_use]
    pub fn translate_collection(&self) -> Option<Collection> {
        match self {
            Self::Translating { collection, .. } => Some(*collection),
            _ => None,
        }
    }

    /// Records the gesture is acting on.
    #[must_use]
    pub fn participants(&self) -> &[ItemId] {
        match self {
            Self::Idle => &[],
            Self::Translating { ids, .. } => ids,
            Self::Resizing { id, .. } => std::slice::from_ref(id),
        }
    }

    /// The initial resize bounds, if resizing.
    #[must_use]
    pub fn resize_bounds(&self) -> Option<Rect> {
        match self {
            Self::Resizing { initial_bounds, .. } => Some(*initial_bounds),
            _ => None,
        }
    }
}
